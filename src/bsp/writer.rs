//! Map re-serialization.
//!
//! Output is staged fully in memory: header and directory are regenerated
//! from the container's current state, payloads are packed in slot order,
//! and the obfuscated dialect gets the whole image XORed before it hits
//! disk. IO errors abort mid-write; a partial output file is left behind.

use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;

use crate::bsp::bytes::{Cursor, put_i32, put_u32};
use crate::bsp::directory::{LumpLocation, LumpSource, ResolvedLump, align4, resolve_lump};
use crate::bsp::file::BspFile;
use crate::bsp::lumpio::{read_lump, read_main_region};
use crate::bsp::{BspError, DirectoryShape, Result};

/// Serialize the container's current state to a new map file.
///
/// Materialized lumps are re-encoded; everything else is carried verbatim
/// from its originally resolved location, which inlines side-car overrides
/// into the output. Offsets are reassigned densely in slot order; only the
/// scan directory pads payloads to 4-byte boundaries. Empty lumps get
/// all-zero directory entries.
pub fn write_map(file: &BspFile, out_path: impl AsRef<Path>) -> Result<()> {
	let out_path = out_path.as_ref();
	let session = file.session();
	let Some(shape) = session.dialect.directory_shape() else {
		return Err(BspError::UndeterminedDialect);
	};

	let mut output = match shape {
		DirectoryShape::Scan { count_at } => stage_scan(file, count_at)?,
		shape => stage_tabled(file, shape)?,
	};
	if let Some(key) = &session.key {
		key.apply(&mut output, 0);
	}

	let mut out = File::create(out_path)?;
	out.write_all(&output)?;
	info!("wrote {}: {} ({} bytes)", out_path.display(), session.dialect, output.len());
	Ok(())
}

struct StagedLump {
	bytes: Vec<u8>,
	version: u32,
	ident: u32,
}

/// Stage a map whose directory is a fixed table of per-index entries.
fn stage_tabled(file: &BspFile, shape: DirectoryShape) -> Result<Vec<u8>> {
	let session = file.session();
	let dialect = session.dialect;
	let endianness = session.endianness;
	let Some(header_len) = dialect.header_len() else {
		return Err(BspError::UndeterminedDialect);
	};

	let mut reader = File::open(file.path())?;
	let mut staged = Vec::with_capacity(dialect.lump_count() as usize);
	for index in 0..dialect.lump_count() {
		let resolved = resolve_lump(&mut reader, session, file.sidecars(), index)?;
		let bytes = match file.materialized_bytes(index)? {
			Some(bytes) => bytes,
			None => read_lump(file.path(), session, &resolved)?,
		};
		staged.push(StagedLump {
			bytes,
			version: resolved.location.version,
			ident: resolved.location.ident,
		});
	}

	let mut output = Vec::new();
	if let Some(signature) = dialect.signature() {
		put_u32(&mut output, signature, endianness);
	}
	if let Some(version) = dialect.format_version() {
		put_u32(&mut output, version, endianness);
	}
	if let DirectoryShape::FixedStride { start } = shape {
		// Bytes between the version field and the slot table carry over raw.
		let lead = output.len() as u64;
		output.extend_from_slice(&read_main_region(file.path(), session, lead, (start - lead) as usize)?);
	}

	let mut cursor = header_len;
	for lump in &staged {
		let length = lump.bytes.len() as u64;
		let (offset, version, ident) = if length == 0 {
			(0, 0, 0)
		} else {
			let offset = cursor;
			cursor += length;
			(offset, lump.version, lump.ident)
		};

		match shape {
			DirectoryShape::Pairs { .. } => {
				put_u32(&mut output, offset as u32, endianness);
				put_u32(&mut output, length as u32, endianness);
			}
			DirectoryShape::Versioned { version_first: true, .. } => {
				put_u32(&mut output, version, endianness);
				put_u32(&mut output, offset as u32, endianness);
				put_u32(&mut output, length as u32, endianness);
				put_u32(&mut output, ident, endianness);
			}
			DirectoryShape::Versioned { .. } | DirectoryShape::FixedStride { .. } => {
				put_u32(&mut output, offset as u32, endianness);
				put_u32(&mut output, length as u32, endianness);
				put_u32(&mut output, version, endianness);
				put_u32(&mut output, ident, endianness);
			}
			DirectoryShape::Scan { .. } => unreachable!("scan maps are staged separately"),
		}
	}

	if matches!(shape, DirectoryShape::Versioned { .. }) {
		// Trailing map revision, carried raw from the original file.
		let revision = read_main_region(file.path(), session, header_len - 4, 4)?;
		output.extend_from_slice(&revision);
	}
	debug_assert_eq!(output.len() as u64, header_len);

	for lump in &staged {
		output.extend_from_slice(&lump.bytes);
	}
	Ok(output)
}

/// Stage a scan map: the original entry order is preserved, lengths are
/// refreshed from current state, and materialized lumps missing from the
/// original scan are appended at the end.
fn stage_scan(file: &BspFile, count_at: u64) -> Result<Vec<u8>> {
	let session = file.session();
	let dialect = session.dialect;
	let endianness = session.endianness;

	let count_raw = read_main_region(file.path(), session, count_at, 4)?;
	let count = Cursor::new(&count_raw).read_i32(endianness)?.max(0) as u64;

	let entries_start = count_at + 4;
	let mut payload_offset = entries_start + count * 8;
	let mut staged: Vec<(i32, Vec<u8>)> = Vec::new();
	let mut seen = HashSet::new();
	for slot in 0..count {
		let raw = read_main_region(file.path(), session, entries_start + slot * 8, 8)?;
		let mut entry = Cursor::new(&raw);
		let id = entry.read_i32(endianness)?;
		let length = u64::from(entry.read_u32(endianness)?);

		// Duplicate ids keep their stored payloads; only the first
		// occurrence can speak from memory, matching the resolver's
		// first-match rule.
		let materialized = if seen.insert(id) && id >= 0 && (id as u32) < dialect.lump_count() {
			file.materialized_bytes(id as u32)?
		} else {
			None
		};
		let bytes = match materialized {
			Some(bytes) => bytes,
			None => {
				let resolved = ResolvedLump {
					location: LumpLocation {
						offset: payload_offset,
						length,
						version: 0,
						ident: 0,
					},
					source: LumpSource::Main,
				};
				read_lump(file.path(), session, &resolved)?
			}
		};
		staged.push((id, bytes));
		payload_offset = align4(payload_offset + length);
	}

	for index in 0..dialect.lump_count() {
		if seen.contains(&(index as i32)) {
			continue;
		}
		if let Some(bytes) = file.materialized_bytes(index)? {
			if !bytes.is_empty() {
				staged.push((index as i32, bytes));
			}
		}
	}

	let mut output = Vec::new();
	if let Some(signature) = dialect.signature() {
		put_u32(&mut output, signature, endianness);
	}
	if let Some(version) = dialect.format_version() {
		put_u32(&mut output, version, endianness);
	}
	put_i32(&mut output, staged.len() as i32, endianness);
	for (id, bytes) in &staged {
		put_i32(&mut output, *id, endianness);
		put_u32(&mut output, bytes.len() as u32, endianness);
	}
	for (_, bytes) in &staged {
		let aligned = align4(output.len() as u64) as usize;
		output.resize(aligned, 0);
		output.extend_from_slice(bytes);
	}
	Ok(output)
}
