//! Brush-side records.

use crate::bsp::bytes::{Cursor, put_i16, put_i32, put_u16, put_u32};
use crate::bsp::record::{ABSENT_INDEX, LumpRecord};
use crate::bsp::{BspError, Dialect, Endianness, Result};

/// Texture bits of the packed layout's second field.
const PACKED_TEXTURE_MASK: u32 = 0x00FF_FFFF;
/// Bevel flag bit of the packed layout's second field.
const PACKED_BEVEL_BIT: u32 = 1 << 24;

/// One brush side, normalized across every dialect layout.
///
/// `disp_info` and `texture` use [`ABSENT_INDEX`] where the layout does not
/// store them; `bevel` is `false` for layouts without the flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrushSide {
	/// Plane the side lies on.
	pub plane: i32,
	/// Texture info index.
	pub texture: i32,
	/// Displacement info index.
	pub disp_info: i32,
	/// Whether the side is a bevel plane used only for collision expansion.
	pub bevel: bool,
}

/// Field layout one dialect family uses for its brush sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideLayout {
	/// `plane:u16, texture:i16`, 4 bytes.
	NarrowPair,
	/// `plane:i32, texture:i32`, 8 bytes.
	WidePair,
	/// `texture:i32, plane:u32`, 8 bytes with the pair swapped.
	WideSwapped,
	/// `plane:u16, texture:i16, disp_info:i16, bevel:i16`, 8 bytes.
	NarrowDisp,
	/// `plane:u32, texture:i32, disp_info:i32, bevel:i32`, 16 bytes.
	WideDisp,
	/// `plane:i32` plus a packed field carrying texture bits and the bevel
	/// flag, 8 bytes.
	PackedFlags,
}

impl SideLayout {
	/// Layout a dialect stores, `None` where the dialect has no brush-side
	/// lump at all.
	pub fn for_dialect(dialect: Dialect) -> Option<Self> {
		match dialect {
			Dialect::Undetermined | Dialect::Quake1 => None,
			Dialect::Quake2 => Some(Self::NarrowPair),
			Dialect::Quake3 | Dialect::RavenQ3 => Some(Self::WidePair),
			Dialect::CoD4 => Some(Self::WideSwapped),
			Dialect::Source19 | Dialect::Source20 | Dialect::Source21 | Dialect::L4D2 | Dialect::TacticalIntervention => Some(Self::NarrowDisp),
			Dialect::Vindictus => Some(Self::WideDisp),
			Dialect::Titanfall => Some(Self::PackedFlags),
		}
	}

	/// Encoded record width in bytes.
	pub fn stride(self) -> usize {
		match self {
			Self::NarrowPair => 4,
			Self::WidePair | Self::WideSwapped | Self::NarrowDisp | Self::PackedFlags => 8,
			Self::WideDisp => 16,
		}
	}
}

impl LumpRecord for BrushSide {
	const KIND: &'static str = "brush side";

	fn lump_index(dialect: Dialect) -> Option<u32> {
		match dialect {
			Dialect::Undetermined | Dialect::Quake1 => None,
			Dialect::Quake2 => Some(15),
			Dialect::Quake3 | Dialect::RavenQ3 => Some(9),
			Dialect::CoD4 => Some(5),
			_ => Some(19),
		}
	}

	fn stride(dialect: Dialect) -> Option<usize> {
		SideLayout::for_dialect(dialect).map(SideLayout::stride)
	}

	fn decode_one(cursor: &mut Cursor<'_>, dialect: Dialect, endianness: Endianness) -> Result<Self> {
		let Some(layout) = SideLayout::for_dialect(dialect) else {
			return Err(BspError::UnsupportedRecordKind { kind: Self::KIND, dialect });
		};

		let side = match layout {
			SideLayout::NarrowPair => Self {
				plane: i32::from(cursor.read_u16(endianness)?),
				texture: i32::from(cursor.read_i16(endianness)?),
				disp_info: ABSENT_INDEX,
				bevel: false,
			},
			SideLayout::WidePair => Self {
				plane: cursor.read_i32(endianness)?,
				texture: cursor.read_i32(endianness)?,
				disp_info: ABSENT_INDEX,
				bevel: false,
			},
			SideLayout::WideSwapped => {
				let texture = cursor.read_i32(endianness)?;
				Self {
					plane: cursor.read_u32(endianness)? as i32,
					texture,
					disp_info: ABSENT_INDEX,
					bevel: false,
				}
			}
			SideLayout::NarrowDisp => Self {
				plane: i32::from(cursor.read_u16(endianness)?),
				texture: i32::from(cursor.read_i16(endianness)?),
				disp_info: i32::from(cursor.read_i16(endianness)?),
				bevel: cursor.read_i16(endianness)? != 0,
			},
			SideLayout::WideDisp => Self {
				plane: cursor.read_u32(endianness)? as i32,
				texture: cursor.read_i32(endianness)?,
				disp_info: cursor.read_i32(endianness)?,
				bevel: cursor.read_i32(endianness)? != 0,
			},
			SideLayout::PackedFlags => {
				let plane = cursor.read_i32(endianness)?;
				let packed = cursor.read_u32(endianness)?;
				let texture_bits = packed & PACKED_TEXTURE_MASK;
				Self {
					plane,
					texture: if texture_bits == PACKED_TEXTURE_MASK { ABSENT_INDEX } else { texture_bits as i32 },
					disp_info: ABSENT_INDEX,
					bevel: packed & PACKED_BEVEL_BIT != 0,
				}
			}
		};
		Ok(side)
	}

	fn encode_one(&self, out: &mut Vec<u8>, dialect: Dialect, endianness: Endianness) {
		let Some(layout) = SideLayout::for_dialect(dialect) else {
			return;
		};

		match layout {
			SideLayout::NarrowPair => {
				put_u16(out, self.plane as u16, endianness);
				put_i16(out, self.texture as i16, endianness);
			}
			SideLayout::WidePair => {
				put_i32(out, self.plane, endianness);
				put_i32(out, self.texture, endianness);
			}
			SideLayout::WideSwapped => {
				put_i32(out, self.texture, endianness);
				put_u32(out, self.plane as u32, endianness);
			}
			SideLayout::NarrowDisp => {
				put_u16(out, self.plane as u16, endianness);
				put_i16(out, self.texture as i16, endianness);
				put_i16(out, self.disp_info as i16, endianness);
				put_i16(out, i16::from(self.bevel), endianness);
			}
			SideLayout::WideDisp => {
				put_u32(out, self.plane as u32, endianness);
				put_i32(out, self.texture, endianness);
				put_i32(out, self.disp_info, endianness);
				put_i32(out, i32::from(self.bevel), endianness);
			}
			SideLayout::PackedFlags => {
				put_i32(out, self.plane, endianness);
				let texture_bits = if self.texture == ABSENT_INDEX {
					PACKED_TEXTURE_MASK
				} else {
					self.texture as u32 & PACKED_TEXTURE_MASK
				};
				let bevel_bit = if self.bevel { PACKED_BEVEL_BIT } else { 0 };
				put_u32(out, texture_bits | bevel_bit, endianness);
			}
		}
	}
}
