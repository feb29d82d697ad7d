use std::fmt;

/// `IBSP` signature as the little-endian integer engines compare against.
pub(crate) const SIG_IBSP: u32 = u32::from_le_bytes(*b"IBSP");
/// `RBSP` signature.
pub(crate) const SIG_RBSP: u32 = u32::from_le_bytes(*b"RBSP");
/// `rBSP` signature.
pub(crate) const SIG_RBSP_LOWER: u32 = u32::from_le_bytes(*b"rBSP");
/// `VBSP` signature.
pub(crate) const SIG_VBSP: u32 = u32::from_le_bytes(*b"VBSP");

/// Byte order resolved for an opened file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
	/// Little-endian byte order (the default for every dialect).
	Little,
	/// Big-endian byte order (console builds detected by the retry path).
	Big,
}

impl Endianness {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

/// One recognized engine/version binary layout.
///
/// The enumeration is closed: every component branches on it, and an
/// unrecognized file carries [`Dialect::Undetermined`] rather than absence of
/// a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
	/// Sniffing exhausted without a match.
	Undetermined,
	/// Quake (BSP version 29, no magic).
	Quake1,
	/// Quake II (`IBSP` 38).
	Quake2,
	/// Quake III Arena (`IBSP` 46).
	Quake3,
	/// Raven fork of Quake III (`RBSP` 1).
	RavenQ3,
	/// Call of Duty 4 (`IBSP` 22, scan directory).
	CoD4,
	/// Source engine, map version 19.
	Source19,
	/// Source engine, map version 20.
	Source20,
	/// Vindictus fork of Source 20 (widened structures).
	Vindictus,
	/// Source engine, map version 21.
	Source21,
	/// Left 4 Dead 2 fork of Source 21 (version-prefixed lump entries).
	L4D2,
	/// XOR-obfuscated twin of Source 20.
	TacticalIntervention,
	/// Titanfall (`rBSP` 29, 128 fixed lump slots).
	Titanfall,
}

impl Dialect {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Undetermined => "undetermined",
			Self::Quake1 => "quake1",
			Self::Quake2 => "quake2",
			Self::Quake3 => "quake3",
			Self::RavenQ3 => "ravenq3",
			Self::CoD4 => "cod4",
			Self::Source19 => "source19",
			Self::Source20 => "source20",
			Self::Vindictus => "vindictus",
			Self::Source21 => "source21",
			Self::L4D2 => "l4d2",
			Self::TacticalIntervention => "tactical_intervention",
			Self::Titanfall => "titanfall",
		}
	}

	/// Number of lump slots the dialect defines.
	pub fn lump_count(self) -> u32 {
		match self {
			Self::Undetermined => 0,
			Self::Quake1 => 15,
			Self::Quake2 => 19,
			Self::Quake3 => 17,
			Self::RavenQ3 => 18,
			Self::CoD4 => 64,
			Self::Source19 | Self::Source20 | Self::Vindictus | Self::Source21 | Self::L4D2 | Self::TacticalIntervention => 64,
			Self::Titanfall => 128,
		}
	}

	/// Directory table geometry, `None` for [`Dialect::Undetermined`].
	pub fn directory_shape(self) -> Option<DirectoryShape> {
		match self {
			Self::Undetermined => None,
			Self::Quake1 => Some(DirectoryShape::Pairs { start: 4 }),
			Self::Quake2 | Self::Quake3 | Self::RavenQ3 => Some(DirectoryShape::Pairs { start: 8 }),
			Self::CoD4 => Some(DirectoryShape::Scan { count_at: 8 }),
			Self::Source19 | Self::Source20 | Self::Vindictus | Self::Source21 | Self::TacticalIntervention => {
				Some(DirectoryShape::Versioned { start: 8, version_first: false })
			}
			Self::L4D2 => Some(DirectoryShape::Versioned { start: 8, version_first: true }),
			Self::Titanfall => Some(DirectoryShape::FixedStride { start: 16 }),
		}
	}

	/// Total header-plus-directory length, `None` where the scan computes it.
	pub fn header_len(self) -> Option<u64> {
		match self.directory_shape()? {
			DirectoryShape::Pairs { start } => Some(start + u64::from(self.lump_count()) * 8),
			// Versioned tables carry a trailing map-revision integer.
			DirectoryShape::Versioned { start, .. } => Some(start + u64::from(self.lump_count()) * 16 + 4),
			DirectoryShape::Scan { .. } => None,
			DirectoryShape::FixedStride { start } => Some(start + u64::from(self.lump_count()) * 16),
		}
	}

	/// Whether sibling side-car files may override this dialect's lumps.
	pub fn supports_sidecars(self) -> bool {
		matches!(self, Self::Source19 | Self::Source20 | Self::Vindictus | Self::Source21 | Self::L4D2)
	}

	/// Four-byte signature written at offset zero, `None` where the format
	/// version stands alone.
	pub fn signature(self) -> Option<u32> {
		match self {
			Self::Undetermined | Self::Quake1 => None,
			Self::Quake2 | Self::Quake3 | Self::CoD4 => Some(SIG_IBSP),
			Self::RavenQ3 => Some(SIG_RBSP),
			Self::Titanfall => Some(SIG_RBSP_LOWER),
			Self::Source19 | Self::Source20 | Self::Vindictus | Self::Source21 | Self::L4D2 | Self::TacticalIntervention => Some(SIG_VBSP),
		}
	}

	/// Format version integer following the signature (or standing in for it).
	pub fn format_version(self) -> Option<u32> {
		match self {
			Self::Undetermined => None,
			Self::Quake1 => Some(29),
			Self::Quake2 => Some(38),
			Self::Quake3 => Some(46),
			Self::RavenQ3 => Some(1),
			Self::CoD4 => Some(22),
			Self::Source19 => Some(19),
			Self::Source20 | Self::Vindictus | Self::TacticalIntervention => Some(20),
			Self::Source21 | Self::L4D2 => Some(21),
			Self::Titanfall => Some(29),
		}
	}
}

impl fmt::Display for Dialect {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Directory table geometry for one dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryShape {
	/// 8-byte `{offset, length}` pairs at a fixed start.
	Pairs {
		/// File offset of the first entry.
		start: u64,
	},
	/// 16-byte `{offset, length, version, ident}` entries; forks move the
	/// version field to the front.
	Versioned {
		/// File offset of the first entry.
		start: u64,
		/// Version field precedes the offset/length pair.
		version_first: bool,
	},
	/// `{id, length}` pairs with payloads following in scan order, each
	/// rounded up to a 4-byte boundary.
	Scan {
		/// File offset of the entry count.
		count_at: u64,
	},
	/// 16-byte entries addressed purely by index, no count field.
	FixedStride {
		/// File offset of entry zero.
		start: u64,
	},
}
