#![allow(dead_code)]

use std::path::{Path, PathBuf};

pub const KEY_LEN: usize = 32;
pub const KEY_OFFSET: usize = 384;

/// Write a synthetic map under the given name and return its path.
pub fn write_temp(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
	let path = dir.join(name);
	std::fs::write(&path, bytes).expect("write map");
	path
}

/// Source-branch map: signature, format version, 64 sixteen-byte entries,
/// trailing revision, payloads packed densely in slot order.
pub fn versioned_map(format_version: u32, version_first: bool, revision: u32, lumps: &[(u32, &[u8])]) -> Vec<u8> {
	let header_len = 8 + 64 * 16 + 4;
	let mut directory = vec![0_u8; 64 * 16];
	let mut payloads = Vec::new();

	for (index, payload) in lumps {
		let offset = (header_len + payloads.len()) as u32;
		let length = payload.len() as u32;
		let fields = if version_first {
			[0, offset, length, 0]
		} else {
			[offset, length, 0, 0]
		};
		let entry = &mut directory[*index as usize * 16..][..16];
		for (slot, value) in fields.iter().enumerate() {
			entry[slot * 4..][..4].copy_from_slice(&value.to_le_bytes());
		}
		payloads.extend_from_slice(payload);
	}

	let mut bytes = Vec::new();
	bytes.extend_from_slice(b"VBSP");
	bytes.extend_from_slice(&format_version.to_le_bytes());
	bytes.extend_from_slice(&directory);
	bytes.extend_from_slice(&revision.to_le_bytes());
	bytes.extend_from_slice(&payloads);
	bytes
}

pub fn source19_map(lumps: &[(u32, &[u8])]) -> Vec<u8> {
	versioned_map(19, false, 1, lumps)
}

pub fn source20_map(lumps: &[(u32, &[u8])]) -> Vec<u8> {
	versioned_map(20, false, 7, lumps)
}

pub fn source21_map(lumps: &[(u32, &[u8])]) -> Vec<u8> {
	versioned_map(21, false, 3, lumps)
}

pub fn l4d2_map(lumps: &[(u32, &[u8])]) -> Vec<u8> {
	versioned_map(21, true, 3, lumps)
}

/// Pair-table map: optional signature, version, fixed count of
/// offset/length pairs, dense payloads.
pub fn pairs_map(signature: Option<[u8; 4]>, format_version: u32, lump_count: u32, lumps: &[(u32, &[u8])]) -> Vec<u8> {
	let start = if signature.is_some() { 8 } else { 4 };
	let header_len = start + lump_count as usize * 8;
	let mut directory = vec![0_u8; lump_count as usize * 8];
	let mut payloads = Vec::new();

	for (index, payload) in lumps {
		let offset = (header_len + payloads.len()) as u32;
		let entry = &mut directory[*index as usize * 8..][..8];
		entry[0..4].copy_from_slice(&offset.to_le_bytes());
		entry[4..8].copy_from_slice(&(payload.len() as u32).to_le_bytes());
		payloads.extend_from_slice(payload);
	}

	let mut bytes = Vec::new();
	if let Some(signature) = signature {
		bytes.extend_from_slice(&signature);
	}
	bytes.extend_from_slice(&format_version.to_le_bytes());
	bytes.extend_from_slice(&directory);
	bytes.extend_from_slice(&payloads);
	bytes
}

pub fn quake1_map(lumps: &[(u32, &[u8])]) -> Vec<u8> {
	pairs_map(None, 29, 15, lumps)
}

pub fn quake2_map(lumps: &[(u32, &[u8])]) -> Vec<u8> {
	pairs_map(Some(*b"IBSP"), 38, 19, lumps)
}

pub fn quake3_map(lumps: &[(u32, &[u8])]) -> Vec<u8> {
	pairs_map(Some(*b"IBSP"), 46, 17, lumps)
}

pub fn ravenq3_map(lumps: &[(u32, &[u8])]) -> Vec<u8> {
	pairs_map(Some(*b"RBSP"), 1, 18, lumps)
}

/// Big-endian Quake3 map: every integer byte-swapped, so the magic reads
/// back as `IBSP` only through a big-endian load.
pub fn quake3_map_big(lumps: &[(u32, &[u8])]) -> Vec<u8> {
	let header_len = 8 + 17 * 8;
	let mut directory = vec![0_u8; 17 * 8];
	let mut payloads = Vec::new();

	for (index, payload) in lumps {
		let offset = (header_len + payloads.len()) as u32;
		let entry = &mut directory[*index as usize * 8..][..8];
		entry[0..4].copy_from_slice(&offset.to_be_bytes());
		entry[4..8].copy_from_slice(&(payload.len() as u32).to_be_bytes());
		payloads.extend_from_slice(payload);
	}

	let mut bytes = Vec::new();
	bytes.extend_from_slice(&u32::from_le_bytes(*b"IBSP").to_be_bytes());
	bytes.extend_from_slice(&46_u32.to_be_bytes());
	bytes.extend_from_slice(&directory);
	bytes.extend_from_slice(&payloads);
	bytes
}

/// Scan map: IBSP 22, id/length entries, payloads in entry order with
/// 4-byte alignment between them.
pub fn scan_map(entries: &[(i32, &[u8])]) -> Vec<u8> {
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

/// Titanfall map: rBSP 29, eight carried bytes, 128 fixed slots.
pub fn titanfall_map(carried: [u8; 8], lumps: &[(u32, &[u8])]) -> Vec<u8> {
	let header_len = 16 + 128 * 16;
	let mut directory = vec![0_u8; 128 * 16];
	let mut payloads = Vec::new();

	for (index, payload) in lumps {
		let offset = (header_len + payloads.len()) as u32;
		let fields = [offset, payload.len() as u32, 0, 0];
		let entry = &mut directory[*index as usize * 16..][..16];
		for (slot, value) in fields.iter().enumerate() {
			entry[slot * 4..][..4].copy_from_slice(&value.to_le_bytes());
		}
		payloads.extend_from_slice(payload);
	}

	let mut bytes = Vec::new();
	bytes.extend_from_slice(b"rBSP");
	bytes.extend_from_slice(&29_u32.to_le_bytes());
	bytes.extend_from_slice(&carried);
	bytes.extend_from_slice(&directory);
	bytes.extend_from_slice(&payloads);
	bytes
}

/// XOR an image in place against a 32-byte key cycled by absolute offset.
pub fn xor_image(bytes: &mut [u8], key: &[u8; KEY_LEN]) {
	for (offset, byte) in bytes.iter_mut().enumerate() {
		*byte ^= key[offset % KEY_LEN];
	}
}

/// Obfuscated Source 20 twin: the plain image XORed whole, which leaves the
/// key readable in the always-zero directory region.
pub fn obfuscated_map(key: &[u8; KEY_LEN], lumps: &[(u32, &[u8])]) -> Vec<u8> {
	let mut bytes = source20_map(lumps);
	assert!(bytes[KEY_OFFSET..KEY_OFFSET + KEY_LEN].iter().all(|byte| *byte == 0), "key region must stay clear of directory entries");
	xor_image(&mut bytes, key);
	bytes
}

/// Game-lump payload whose widened sub-entries mark the Vindictus fork: the
/// i32 twelve bytes in is a small version, not a file offset.
pub fn widened_game_lump() -> Vec<u8> {
	let mut bytes = Vec::new();
	for value in [1_i32, 0x7370_7270, 0, 1, 2048, 16] {
		bytes.extend_from_slice(&value.to_le_bytes());
	}
	bytes
}

/// One 48-byte origin/head-node model record, little-endian.
pub fn model_48(head_node: i32, first_face: i32, num_faces: i32) -> Vec<u8> {
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
pub fn narrow_sides() -> Vec<u8> {
	let mut bytes = Vec::new();
	for half in [1_u16, 0, 0xFFFF, 0, 2, 5, 3, 1] {
		bytes.extend_from_slice(&half.to_le_bytes());
	}
	bytes
}

/// Sixteen-byte override header plus payload, little-endian.
pub fn sidecar_bytes(lump_index: i32, version: i32, payload: &[u8]) -> Vec<u8> {
	let mut bytes = Vec::new();
	bytes.extend_from_slice(&16_i32.to_le_bytes());
	bytes.extend_from_slice(&lump_index.to_le_bytes());
	bytes.extend_from_slice(&version.to_le_bytes());
	bytes.extend_from_slice(&(payload.len() as i32).to_le_bytes());
	bytes.extend_from_slice(payload);
	bytes
}
