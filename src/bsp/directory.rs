use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

use crate::bsp::bytes::Cursor;
use crate::bsp::sidecar::SidecarIndex;
use crate::bsp::sniff::Session;
use crate::bsp::{BspError, DirectoryShape, Result};

/// Where one lump's location fields point.
///
/// Computed on demand from the directory and never persisted; resolving the
/// same index against an unmodified file always yields the same location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LumpLocation {
	/// Absolute payload offset in the source file.
	pub offset: u64,
	/// Payload length in bytes.
	pub length: u64,
	/// Per-lump format version, zero for dialects without versioned lumps.
	pub version: u32,
	/// Per-lump identifier tag, zero where the dialect lacks one.
	pub ident: u32,
}

impl LumpLocation {
	/// Location of a lump the file does not carry.
	pub const EMPTY: Self = Self {
		offset: 0,
		length: 0,
		version: 0,
		ident: 0,
	};

	/// Whether the location addresses no bytes.
	pub fn is_empty(&self) -> bool {
		self.length == 0
	}
}

/// File a resolved location reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LumpSource {
	/// The opened map file itself.
	Main,
	/// A sibling override file holding this lump's payload.
	Sidecar(PathBuf),
}

/// A resolved lump: its location plus the file that location is relative to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLump {
	/// Payload location fields.
	pub location: LumpLocation,
	/// Source file selector.
	pub source: LumpSource,
}

/// Round up to the next 4-byte boundary.
pub(crate) fn align4(value: u64) -> u64 {
	(value + 3) & !3
}

/// Resolve one lump index to its payload location.
///
/// Consults the side-car index first for dialects that support overrides,
/// then computes the location from the dialect's directory shape. A file too
/// short to hold the directory entry resolves to the empty location rather
/// than an error; only an out-of-range index or an undetermined dialect
/// fails.
pub fn resolve_lump<R: Read + Seek>(reader: &mut R, session: &Session, sidecars: &SidecarIndex, index: u32) -> Result<ResolvedLump> {
	let dialect = session.dialect;
	let Some(shape) = dialect.directory_shape() else {
		return Err(BspError::UndeterminedDialect);
	};

	let max = dialect.lump_count();
	if index >= max {
		return Err(BspError::LumpIndexOutOfRange { index, max });
	}

	if dialect.supports_sidecars() {
		if let Some(entry) = sidecars.get(index) {
			return Ok(ResolvedLump {
				location: LumpLocation {
					offset: entry.offset,
					length: entry.length,
					version: entry.version,
					ident: 0,
				},
				source: LumpSource::Sidecar(entry.source.clone()),
			});
		}
	}

	let location = match shape {
		DirectoryShape::Pairs { start } => resolve_pair(reader, session, start + u64::from(index) * 8)?,
		DirectoryShape::Versioned { start, version_first } => resolve_versioned(reader, session, start + u64::from(index) * 16, version_first)?,
		DirectoryShape::FixedStride { start } => resolve_versioned(reader, session, start + u64::from(index) * 16, false)?,
		DirectoryShape::Scan { count_at } => resolve_scan(reader, session, count_at, index)?,
	};

	Ok(ResolvedLump {
		location,
		source: LumpSource::Main,
	})
}

fn resolve_pair<R: Read + Seek>(reader: &mut R, session: &Session, entry_offset: u64) -> Result<LumpLocation> {
	let Some(raw) = read_entry_bytes(reader, session, entry_offset, 8)? else {
		return Ok(LumpLocation::EMPTY);
	};

	let mut cursor = Cursor::new(&raw);
	let offset = cursor.read_u32(session.endianness)?;
	let length = cursor.read_u32(session.endianness)?;
	Ok(LumpLocation {
		offset: u64::from(offset),
		length: u64::from(length),
		version: 0,
		ident: 0,
	})
}

fn resolve_versioned<R: Read + Seek>(reader: &mut R, session: &Session, entry_offset: u64, version_first: bool) -> Result<LumpLocation> {
	let Some(raw) = read_entry_bytes(reader, session, entry_offset, 16)? else {
		return Ok(LumpLocation::EMPTY);
	};

	let mut cursor = Cursor::new(&raw);
	let version_lead = if version_first { cursor.read_u32(session.endianness)? } else { 0 };
	let offset = cursor.read_u32(session.endianness)?;
	let length = cursor.read_u32(session.endianness)?;
	let version = if version_first { version_lead } else { cursor.read_u32(session.endianness)? };
	let ident = cursor.read_u32(session.endianness)?;
	Ok(LumpLocation {
		offset: u64::from(offset),
		length: u64::from(length),
		version,
		ident,
	})
}

/// Walk a scan directory of id/length pairs.
///
/// Payloads follow the entry table in scan order, each lump's end rounded up
/// to a 4-byte boundary before the next begins. The wanted index is matched
/// against entry ids; an absent id resolves empty.
fn resolve_scan<R: Read + Seek>(reader: &mut R, session: &Session, count_at: u64, index: u32) -> Result<LumpLocation> {
	let Some(raw) = read_entry_bytes(reader, session, count_at, 4)? else {
		return Ok(LumpLocation::EMPTY);
	};
	let count = Cursor::new(&raw).read_i32(session.endianness)?;
	if count <= 0 {
		return Ok(LumpLocation::EMPTY);
	}

	let entries_start = count_at + 4;
	let mut payload_offset = entries_start + count as u64 * 8;
	for slot in 0..count as u64 {
		let Some(raw) = read_entry_bytes(reader, session, entries_start + slot * 8, 8)? else {
			return Ok(LumpLocation::EMPTY);
		};
		let mut cursor = Cursor::new(&raw);
		let id = cursor.read_i32(session.endianness)?;
		let length = cursor.read_u32(session.endianness)?;

		if id == index as i32 {
			return Ok(LumpLocation {
				offset: payload_offset,
				length: u64::from(length),
				version: 0,
				ident: 0,
			});
		}
		payload_offset = align4(payload_offset + u64::from(length));
	}

	Ok(LumpLocation::EMPTY)
}

/// Read raw directory-entry bytes, deobfuscating when a key is active.
///
/// `None` when the file ends before the entry.
fn read_entry_bytes<R: Read + Seek>(reader: &mut R, session: &Session, offset: u64, len: usize) -> Result<Option<Vec<u8>>> {
	if offset + len as u64 > session.file_len {
		return Ok(None);
	}

	reader.seek(SeekFrom::Start(offset))?;
	let mut buf = vec![0_u8; len];
	reader.read_exact(&mut buf)?;
	if let Some(key) = &session.key {
		key.apply(&mut buf, offset);
	}
	Ok(Some(buf))
}
