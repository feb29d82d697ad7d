//! Lump payload reads.
//!
//! Payloads are fetched through short-lived file handles so a container can
//! stay open without pinning its backing files.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::bsp::directory::{LumpSource, ResolvedLump};
use crate::bsp::sniff::Session;
use crate::bsp::{BspError, Result};

/// Read one resolved lump's payload.
///
/// An empty location yields an empty buffer without touching any file. The
/// session's obfuscation key applies only to bytes of the map itself;
/// override files are stored plain.
pub fn read_lump(main_path: &Path, session: &Session, resolved: &ResolvedLump) -> Result<Vec<u8>> {
	let location = resolved.location;
	if location.is_empty() {
		return Ok(Vec::new());
	}

	let path = match &resolved.source {
		LumpSource::Main => main_path,
		LumpSource::Sidecar(path) => path.as_path(),
	};

	let mut file = File::open(path)?;
	let available = file.metadata()?.len();
	if location.offset + location.length > available {
		return Err(BspError::TruncatedSource {
			offset: location.offset,
			length: location.length,
			available,
		});
	}

	file.seek(SeekFrom::Start(location.offset))?;
	let mut buf = vec![0_u8; location.length as usize];
	file.read_exact(&mut buf)?;

	if matches!(resolved.source, LumpSource::Main) {
		if let Some(key) = &session.key {
			key.apply(&mut buf, location.offset);
		}
	}
	Ok(buf)
}

/// Read a fixed header region from the map file in plain form.
///
/// Regions past the end of the file come back as zeros; rewriting a file
/// that never carried the region emits it zeroed.
pub(crate) fn read_main_region(main_path: &Path, session: &Session, offset: u64, len: usize) -> Result<Vec<u8>> {
	if offset + len as u64 > session.file_len {
		return Ok(vec![0_u8; len]);
	}

	let mut file = File::open(main_path)?;
	file.seek(SeekFrom::Start(offset))?;
	let mut buf = vec![0_u8; len];
	file.read_exact(&mut buf)?;
	if let Some(key) = &session.key {
		key.apply(&mut buf, offset);
	}
	Ok(buf)
}

#[cfg(test)]
mod tests {
	use std::path::{Path, PathBuf};

	use super::{read_lump, read_main_region};
	use crate::bsp::directory::{LumpLocation, LumpSource, ResolvedLump};
	use crate::bsp::obfuscation::XorKey;
	use crate::bsp::sniff::Session;
	use crate::bsp::{BspError, Dialect, Endianness};

	fn plain_session(file_len: u64) -> Session {
		Session {
			dialect: Dialect::Source20,
			endianness: Endianness::Little,
			key: None,
			file_len,
		}
	}

	fn main_lump(offset: u64, length: u64) -> ResolvedLump {
		ResolvedLump {
			location: LumpLocation {
				offset,
				length,
				version: 0,
				ident: 0,
			},
			source: LumpSource::Main,
		}
	}

	#[test]
	fn reads_exact_payload_slice() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("map.bsp");
		std::fs::write(&path, b"prefix[payload]suffix").expect("write map");

		let bytes = read_lump(&path, &plain_session(21), &main_lump(7, 7)).expect("read succeeds");
		assert_eq!(bytes, b"payload");
	}

	#[test]
	fn empty_location_reads_nothing() {
		let resolved = ResolvedLump {
			location: LumpLocation::EMPTY,
			source: LumpSource::Main,
		};
		let bytes = read_lump(Path::new("/nonexistent/map.bsp"), &plain_session(0), &resolved).expect("no file access needed");
		assert!(bytes.is_empty());
	}

	#[test]
	fn truncated_payload_is_reported() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("map.bsp");
		std::fs::write(&path, [0_u8; 32]).expect("write map");

		let err = read_lump(&path, &plain_session(32), &main_lump(24, 16)).expect_err("payload runs past the end");
		assert!(matches!(err, BspError::TruncatedSource { offset: 24, length: 16, available: 32 }));
	}

	#[test]
	fn override_source_reads_its_own_file() {
		let dir = tempfile::tempdir().expect("tempdir");
		let main = dir.path().join("map.bsp");
		let patch = dir.path().join("map_0_1.lmp");
		std::fs::write(&main, [0_u8; 64]).expect("write map");
		std::fs::write(&patch, b"0123456789abcdef{\"classname\"}").expect("write override");

		let resolved = ResolvedLump {
			location: LumpLocation {
				offset: 16,
				length: 13,
				version: 0,
				ident: 0,
			},
			source: LumpSource::Sidecar(PathBuf::from(&patch)),
		};
		let bytes = read_lump(&main, &plain_session(64), &resolved).expect("read succeeds");
		assert_eq!(bytes, b"{\"classname\"}");
	}

	#[test]
	fn main_payload_is_deobfuscated_but_override_is_not() {
		let key_bytes: [u8; XorKey::LEN] = std::array::from_fn(|i| 0x40 ^ i as u8);
		let key = XorKey::from_bytes(key_bytes).expect("non-zero key");

		let dir = tempfile::tempdir().expect("tempdir");
		let main = dir.path().join("map.bsp");
		let mut stored = vec![0_u8; 64];
		stored[40..48].copy_from_slice(b"worldspn");
		key.apply(&mut stored, 0);
		std::fs::write(&main, &stored).expect("write map");

		let session = Session {
			dialect: Dialect::TacticalIntervention,
			endianness: Endianness::Little,
			key: Some(key),
			file_len: 64,
		};
		let bytes = read_lump(&main, &session, &main_lump(40, 8)).expect("read succeeds");
		assert_eq!(bytes, b"worldspn");

		let patch = dir.path().join("map_0_1.lmp");
		std::fs::write(&patch, b"plaintext").expect("write override");
		let resolved = ResolvedLump {
			location: LumpLocation {
				offset: 0,
				length: 9,
				version: 0,
				ident: 0,
			},
			source: LumpSource::Sidecar(patch),
		};
		let bytes = read_lump(&main, &session, &resolved).expect("read succeeds");
		assert_eq!(bytes, b"plaintext");
	}

	#[test]
	fn absent_header_region_reads_as_zeros() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("map.bsp");
		std::fs::write(&path, [0xAB_u8; 16]).expect("write map");

		let bytes = read_main_region(&path, &plain_session(16), 1032, 4).expect("read succeeds");
		assert_eq!(bytes, [0, 0, 0, 0]);

		let bytes = read_main_region(&path, &plain_session(16), 8, 4).expect("read succeeds");
		assert_eq!(bytes, [0xAB; 4]);
	}
}
