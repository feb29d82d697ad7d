//! Bounding-volume model records.

use crate::bsp::bytes::{Cursor, put_f32, put_i32};
use crate::bsp::record::{ABSENT_INDEX, LumpRecord};
use crate::bsp::{BspError, Dialect, Endianness, Result};

/// One model record, normalized across every dialect layout.
///
/// Fields a layout does not store decode to [`ABSENT_INDEX`] for indexes and
/// zeros for `origin`, and are ignored when encoding back to that layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
	/// Axis-aligned bounds, minimum corner.
	pub mins: [f32; 3],
	/// Axis-aligned bounds, maximum corner.
	pub maxs: [f32; 3],
	/// Local origin the engine translates the model by.
	pub origin: [f32; 3],
	/// Root node of the model's tree.
	pub head_node: i32,
	/// First leaf claimed by the model.
	pub first_leaf: i32,
	/// Number of claimed leaves.
	pub num_leaves: i32,
	/// First brush claimed by the model.
	pub first_brush: i32,
	/// Number of claimed brushes.
	pub num_brushes: i32,
	/// First face claimed by the model.
	pub first_face: i32,
	/// Number of claimed faces.
	pub num_faces: i32,
}

/// Field layout one dialect family uses for its model records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelShape {
	/// Face and brush ranges only, 40 bytes.
	FaceBrushRanges,
	/// Origin and tree root plus a face range, 48 bytes.
	OriginHeadNode,
	/// Tree root plus leaf, brush and face ranges, 52 bytes.
	AllRanges,
	/// Origin, tree root, leaf and face ranges, 56 bytes.
	OriginLeafRanges,
}

impl ModelShape {
	/// Shape a dialect stores, `None` for an undetermined session.
	pub fn for_dialect(dialect: Dialect) -> Option<Self> {
		match dialect {
			Dialect::Undetermined => None,
			Dialect::Quake3 | Dialect::RavenQ3 => Some(Self::FaceBrushRanges),
			Dialect::Quake2
			| Dialect::Source19
			| Dialect::Source20
			| Dialect::Source21
			| Dialect::L4D2
			| Dialect::Vindictus
			| Dialect::TacticalIntervention => Some(Self::OriginHeadNode),
			Dialect::CoD4 => Some(Self::AllRanges),
			Dialect::Quake1 | Dialect::Titanfall => Some(Self::OriginLeafRanges),
		}
	}

	/// Encoded record width in bytes.
	pub fn stride(self) -> usize {
		match self {
			Self::FaceBrushRanges => 40,
			Self::OriginHeadNode => 48,
			Self::AllRanges => 52,
			Self::OriginLeafRanges => 56,
		}
	}
}

impl LumpRecord for Model {
	const KIND: &'static str = "model";

	fn lump_index(dialect: Dialect) -> Option<u32> {
		match dialect {
			Dialect::Undetermined => None,
			Dialect::Quake2 => Some(13),
			Dialect::Quake3 | Dialect::RavenQ3 => Some(7),
			Dialect::CoD4 => Some(37),
			_ => Some(14),
		}
	}

	fn stride(dialect: Dialect) -> Option<usize> {
		ModelShape::for_dialect(dialect).map(ModelShape::stride)
	}

	fn decode_one(cursor: &mut Cursor<'_>, dialect: Dialect, endianness: Endianness) -> Result<Self> {
		let Some(shape) = ModelShape::for_dialect(dialect) else {
			return Err(BspError::UnsupportedRecordKind { kind: Self::KIND, dialect });
		};

		let mut model = Self {
			mins: cursor.read_vec3(endianness)?,
			maxs: cursor.read_vec3(endianness)?,
			origin: [0.0; 3],
			head_node: ABSENT_INDEX,
			first_leaf: ABSENT_INDEX,
			num_leaves: ABSENT_INDEX,
			first_brush: ABSENT_INDEX,
			num_brushes: ABSENT_INDEX,
			first_face: ABSENT_INDEX,
			num_faces: ABSENT_INDEX,
		};

		match shape {
			ModelShape::FaceBrushRanges => {
				model.first_face = cursor.read_i32(endianness)?;
				model.num_faces = cursor.read_i32(endianness)?;
				model.first_brush = cursor.read_i32(endianness)?;
				model.num_brushes = cursor.read_i32(endianness)?;
			}
			ModelShape::OriginHeadNode => {
				model.origin = cursor.read_vec3(endianness)?;
				model.head_node = cursor.read_i32(endianness)?;
				model.first_face = cursor.read_i32(endianness)?;
				model.num_faces = cursor.read_i32(endianness)?;
			}
			ModelShape::AllRanges => {
				model.head_node = cursor.read_i32(endianness)?;
				model.first_leaf = cursor.read_i32(endianness)?;
				model.num_leaves = cursor.read_i32(endianness)?;
				model.first_brush = cursor.read_i32(endianness)?;
				model.num_brushes = cursor.read_i32(endianness)?;
				model.first_face = cursor.read_i32(endianness)?;
				model.num_faces = cursor.read_i32(endianness)?;
			}
			ModelShape::OriginLeafRanges => {
				model.origin = cursor.read_vec3(endianness)?;
				model.head_node = cursor.read_i32(endianness)?;
				model.first_leaf = cursor.read_i32(endianness)?;
				model.num_leaves = cursor.read_i32(endianness)?;
				model.first_face = cursor.read_i32(endianness)?;
				model.num_faces = cursor.read_i32(endianness)?;
			}
		}
		Ok(model)
	}

	fn encode_one(&self, out: &mut Vec<u8>, dialect: Dialect, endianness: Endianness) {
		let Some(shape) = ModelShape::for_dialect(dialect) else {
			return;
		};

		for axis in self.mins.into_iter().chain(self.maxs) {
			put_f32(out, axis, endianness);
		}

		match shape {
			ModelShape::FaceBrushRanges => {
				put_i32(out, self.first_face, endianness);
				put_i32(out, self.num_faces, endianness);
				put_i32(out, self.first_brush, endianness);
				put_i32(out, self.num_brushes, endianness);
			}
			ModelShape::OriginHeadNode => {
				for axis in self.origin {
					put_f32(out, axis, endianness);
				}
				put_i32(out, self.head_node, endianness);
				put_i32(out, self.first_face, endianness);
				put_i32(out, self.num_faces, endianness);
			}
			ModelShape::AllRanges => {
				put_i32(out, self.head_node, endianness);
				put_i32(out, self.first_leaf, endianness);
				put_i32(out, self.num_leaves, endianness);
				put_i32(out, self.first_brush, endianness);
				put_i32(out, self.num_brushes, endianness);
				put_i32(out, self.first_face, endianness);
				put_i32(out, self.num_faces, endianness);
			}
			ModelShape::OriginLeafRanges => {
				for axis in self.origin {
					put_f32(out, axis, endianness);
				}
				put_i32(out, self.head_node, endianness);
				put_i32(out, self.first_leaf, endianness);
				put_i32(out, self.num_leaves, endianness);
				put_i32(out, self.first_face, endianness);
				put_i32(out, self.num_faces, endianness);
			}
		}
	}
}
