//! Synthetic map builders shared by the unit tests.

use crate::bsp::obfuscation::XorKey;

/// One lump staged into a synthetic map.
pub(crate) struct LumpSpec {
	pub(crate) index: u32,
	pub(crate) bytes: Vec<u8>,
	pub(crate) version: u32,
	pub(crate) ident: u32,
}

/// Shorthand for a lump with zero version and ident fields.
pub(crate) fn lump(index: u32, bytes: &[u8]) -> LumpSpec {
	LumpSpec {
		index,
		bytes: bytes.to_vec(),
		version: 0,
		ident: 0,
	}
}

/// Little-endian Source-branch map: signature, format version, 64 entries,
/// trailing revision, payloads packed densely in slot order.
///
/// Entries are `{offset, length, version, ident}`, or version-led when
/// `version_first` is set. Lumps must arrive in ascending index order.
pub(crate) fn versioned_map(format_version: u32, version_first: bool, revision: u32, lumps: &[LumpSpec]) -> Vec<u8> {
	let header_len = 8 + 64 * 16 + 4;
	let mut directory = vec![0_u8; 64 * 16];
	let mut payloads = Vec::new();

	for lump in lumps {
		let offset = (header_len + payloads.len()) as u32;
		let length = lump.bytes.len() as u32;
		let fields = if version_first {
			[lump.version, offset, length, lump.ident]
		} else {
			[offset, length, lump.version, lump.ident]
		};
		let entry = &mut directory[lump.index as usize * 16..][..16];
		for (slot, value) in fields.iter().enumerate() {
			entry[slot * 4..][..4].copy_from_slice(&value.to_le_bytes());
		}
		payloads.extend_from_slice(&lump.bytes);
	}

	let mut bytes = Vec::new();
	bytes.extend_from_slice(b"VBSP");
	bytes.extend_from_slice(&format_version.to_le_bytes());
	bytes.extend_from_slice(&directory);
	bytes.extend_from_slice(&revision.to_le_bytes());
	bytes.extend_from_slice(&payloads);
	bytes
}

/// Little-endian Source v20 map with a fixed revision.
pub(crate) fn source20_map(lumps: &[LumpSpec]) -> Vec<u8> {
	versioned_map(20, false, 7, lumps)
}

/// Obfuscated twin of [`source20_map`]: the plain image XORed whole with the
/// key, which leaves the key readable in the always-zero region at 384.
pub(crate) fn obfuscated_map(key: &XorKey, lumps: &[LumpSpec]) -> Vec<u8> {
	let mut bytes = source20_map(lumps);
	assert!(bytes[384..416].iter().all(|byte| *byte == 0), "key region must stay clear of directory entries");
	key.apply(&mut bytes, 0);
	bytes
}

/// Little-endian Quake2 map: IBSP 38, 19 offset/length pairs.
pub(crate) fn quake2_map(lumps: &[(u32, &[u8])]) -> Vec<u8> {
	let header_len = 8 + 19 * 8;
	let mut directory = vec![0_u8; 19 * 8];
	let mut payloads = Vec::new();

	for (index, payload) in lumps {
		let offset = (header_len + payloads.len()) as u32;
		let entry = &mut directory[*index as usize * 8..][..8];
		entry[0..4].copy_from_slice(&offset.to_le_bytes());
		entry[4..8].copy_from_slice(&(payload.len() as u32).to_le_bytes());
		payloads.extend_from_slice(payload);
	}

	let mut bytes = Vec::new();
	bytes.extend_from_slice(b"IBSP");
	bytes.extend_from_slice(&38_u32.to_le_bytes());
	bytes.extend_from_slice(&directory);
	bytes.extend_from_slice(&payloads);
	bytes
}

/// Little-endian scan map: IBSP 22, id/length entries, payloads in entry
/// order with 4-byte alignment between them.
pub(crate) fn scan_map(entries: &[(i32, &[u8])]) -> Vec<u8> {
	let mut bytes = Vec::new();
	bytes.extend_from_slice(b"IBSP");
	bytes.extend_from_slice(&22_u32.to_le_bytes());
	bytes.extend_from_slice(&(entries.len() as i32).to_le_bytes());
	for (id, payload) in entries {
		bytes.extend_from_slice(&id.to_le_bytes());
		bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
	}
	for (_, payload) in entries {
		while bytes.len() % 4 != 0 {
			bytes.push(0);
		}
		bytes.extend_from_slice(payload);
	}
	bytes
}

/// Little-endian Titanfall map: rBSP 29, carried bytes at 8..16, then 128
/// fixed `{offset, length, version, ident}` slots.
pub(crate) fn titanfall_map(carried: [u8; 8], lumps: &[LumpSpec]) -> Vec<u8> {
	let header_len = 16 + 128 * 16;
	let mut directory = vec![0_u8; 128 * 16];
	let mut payloads = Vec::new();

	for lump in lumps {
		let offset = (header_len + payloads.len()) as u32;
		let fields = [offset, lump.bytes.len() as u32, lump.version, lump.ident];
		let entry = &mut directory[lump.index as usize * 16..][..16];
		for (slot, value) in fields.iter().enumerate() {
			entry[slot * 4..][..4].copy_from_slice(&value.to_le_bytes());
		}
		payloads.extend_from_slice(&lump.bytes);
	}

	let mut bytes = Vec::new();
	bytes.extend_from_slice(b"rBSP");
	bytes.extend_from_slice(&29_u32.to_le_bytes());
	bytes.extend_from_slice(&carried);
	bytes.extend_from_slice(&directory);
	bytes.extend_from_slice(&payloads);
	bytes
}

/// One 48-byte origin/head-node model record.
pub(crate) fn model_48(head_node: i32, first_face: i32, num_faces: i32) -> Vec<u8> {
	let mut bytes = Vec::new();
	for value in [-8.0_f32, -8.0, 0.0, 8.0, 8.0, 16.0, 0.0, 0.0, 0.0] {
		bytes.extend_from_slice(&value.to_le_bytes());
	}
	for value in [head_node, first_face, num_faces] {
		bytes.extend_from_slice(&value.to_le_bytes());
	}
	bytes
}

/// Two 8-byte narrow brush sides, the second a bevel with displacement.
pub(crate) fn narrow_sides() -> Vec<u8> {
	let mut bytes = Vec::new();
	for half in [1_u16, 0, 0xFFFF, 0, 2, 5, 3, 1] {
		bytes.extend_from_slice(&half.to_le_bytes());
	}
	bytes
}

/// Sixteen-byte override header plus payload, little-endian.
pub(crate) fn sidecar_bytes(lump_index: i32, version: i32, payload: &[u8]) -> Vec<u8> {
	let mut bytes = Vec::new();
	bytes.extend_from_slice(&16_i32.to_le_bytes());
	bytes.extend_from_slice(&lump_index.to_le_bytes());
	bytes.extend_from_slice(&version.to_le_bytes());
	bytes.extend_from_slice(&(payload.len() as i32).to_le_bytes());
	bytes.extend_from_slice(payload);
	bytes
}
