use std::io::{Read, Seek, SeekFrom};

use log::debug;

use crate::bsp::dialect::{SIG_IBSP, SIG_RBSP, SIG_RBSP_LOWER, SIG_VBSP};
use crate::bsp::obfuscation::XorKey;
use crate::bsp::{Dialect, Endianness, Result};

/// Directory slot of the game lump probed to split the version-20 siblings.
const GAME_LUMP_INDEX: u64 = 35;
/// Smallest header-plus-directory length among the tabled Source revisions;
/// probe integers at or above it look like lump-table offsets.
const SOURCE_HEADER_LEN: i32 = 1036;

/// Per-open-file state resolved by sniffing.
///
/// Every later operation takes the session instead of consulting global
/// state, so independently opened files never interfere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
	/// Detected dialect, possibly [`Dialect::Undetermined`].
	pub dialect: Dialect,
	/// Byte order every subsequent multi-byte read of this file uses.
	pub endianness: Endianness,
	/// Obfuscation key, present only for the obfuscated dialect.
	pub key: Option<XorKey>,
	/// Source length in bytes at sniff time.
	pub file_len: u64,
}

/// Classify a compiled map stream.
///
/// Reads the four-byte signature, disambiguates shared signatures through a
/// secondary version integer and structural probes, retries the whole
/// procedure big-endian, and finally probes for an obfuscation key. Never
/// fails on unrecognized content: the result carries
/// [`Dialect::Undetermined`] instead. Only genuine IO failures are returned
/// as errors.
pub fn sniff<R: Read + Seek>(reader: &mut R) -> Result<Session> {
	let file_len = reader.seek(SeekFrom::End(0))?;

	for endianness in [Endianness::Little, Endianness::Big] {
		if let Some(dialect) = sniff_order(reader, file_len, endianness)? {
			debug!("sniffed dialect {} ({})", dialect, endianness.as_str());
			return Ok(Session {
				dialect,
				endianness,
				key: None,
				file_len,
			});
		}
	}

	if let Some(key) = probe_obfuscated(reader, file_len)? {
		debug!("sniffed obfuscated dialect, key recovered");
		return Ok(Session {
			dialect: Dialect::TacticalIntervention,
			endianness: Endianness::Little,
			key: Some(key),
			file_len,
		});
	}

	Ok(Session {
		dialect: Dialect::Undetermined,
		endianness: Endianness::Little,
		key: None,
		file_len,
	})
}

/// Run one full signature dispatch in the given byte order.
fn sniff_order<R: Read + Seek>(reader: &mut R, file_len: u64, endianness: Endianness) -> Result<Option<Dialect>> {
	let Some(signature) = read_u32_at(reader, 0, file_len, endianness)? else {
		return Ok(None);
	};

	if signature == 29 {
		return Ok(Some(Dialect::Quake1));
	}

	let version = read_u32_at(reader, 4, file_len, endianness)?;
	let dialect = match (signature, version) {
		(SIG_IBSP, Some(38)) => Some(Dialect::Quake2),
		(SIG_IBSP, Some(46)) => Some(Dialect::Quake3),
		(SIG_IBSP, Some(22)) => Some(Dialect::CoD4),
		(SIG_RBSP, Some(1)) => Some(Dialect::RavenQ3),
		(SIG_RBSP_LOWER, Some(29)) => Some(Dialect::Titanfall),
		(SIG_VBSP, Some(19)) => Some(Dialect::Source19),
		(SIG_VBSP, Some(20)) => Some(probe_v20(reader, file_len, endianness)?),
		(SIG_VBSP, Some(21)) => Some(probe_v21(reader, file_len, endianness)?),
		_ => None,
	};
	Ok(dialect)
}

/// Split the version-20 siblings through the game lump.
///
/// The forked revision widens the game lump's per-entry fields, so the slot
/// twelve bytes into the lump holds a small sub-lump version there while the
/// parent keeps a file offset in the same place. An absent game lump or any
/// probe read past the end of the file is inconclusive and falls back to the
/// parent.
fn probe_v20<R: Read + Seek>(reader: &mut R, file_len: u64, endianness: Endianness) -> Result<Dialect> {
	let entry_offset = 8 + GAME_LUMP_INDEX * 16;
	let Some(lump_offset) = read_u32_at(reader, entry_offset, file_len, endianness)? else {
		return Ok(Dialect::Source20);
	};
	let Some(lump_length) = read_u32_at(reader, entry_offset + 4, file_len, endianness)? else {
		return Ok(Dialect::Source20);
	};
	if lump_offset == 0 || lump_length == 0 {
		return Ok(Dialect::Source20);
	}

	let Some(count) = read_i32_at(reader, u64::from(lump_offset), file_len, endianness)? else {
		return Ok(Dialect::Source20);
	};
	if count <= 0 {
		return Ok(Dialect::Source20);
	}

	let Some(probed) = read_i32_at(reader, u64::from(lump_offset) + 12, file_len, endianness)? else {
		return Ok(Dialect::Source20);
	};
	if probed < 24 {
		debug!("game lump probe: sub-field {} reads as a version, widened fork", probed);
		Ok(Dialect::Vindictus)
	} else {
		Ok(Dialect::Source20)
	}
}

/// Split the version-21 siblings through the first directory entry's shape.
///
/// The fork prefixes each entry with its version field, shifting the offset
/// slot by four bytes. Whichever of the two candidate slots holds a value
/// that looks like a payload offset wins; neither looking plausible falls
/// back to the parent.
fn probe_v21<R: Read + Seek>(reader: &mut R, file_len: u64, endianness: Endianness) -> Result<Dialect> {
	let first = read_i32_at(reader, 8, file_len, endianness)?;
	let second = read_i32_at(reader, 12, file_len, endianness)?;

	if first.is_some_and(|value| plausible_offset(value, file_len)) {
		return Ok(Dialect::Source21);
	}
	if second.is_some_and(|value| plausible_offset(value, file_len)) {
		debug!("entry-shape probe: offset slot shifted, version-prefixed fork");
		return Ok(Dialect::L4D2);
	}
	Ok(Dialect::Source21)
}

fn plausible_offset(value: i32, file_len: u64) -> bool {
	value >= SOURCE_HEADER_LEN && value as u64 <= file_len
}

/// Attempt key recovery from the always-zero header region.
///
/// A non-zero region is taken as a candidate key; it is accepted when
/// deobfuscating the first eight bytes reveals the parent signature and
/// version.
fn probe_obfuscated<R: Read + Seek>(reader: &mut R, file_len: u64) -> Result<Option<XorKey>> {
	let Some(region) = read_bytes_at::<_, { XorKey::LEN }>(reader, XorKey::FILE_OFFSET, file_len)? else {
		return Ok(None);
	};
	let Some(key) = XorKey::from_bytes(region) else {
		return Ok(None);
	};

	let Some(mut head) = read_bytes_at::<_, 8>(reader, 0, file_len)? else {
		return Ok(None);
	};
	key.apply(&mut head, 0);

	let signature = u32::from_le_bytes([head[0], head[1], head[2], head[3]]);
	let version = u32::from_le_bytes([head[4], head[5], head[6], head[7]]);
	if signature == SIG_VBSP && version == 20 {
		Ok(Some(key))
	} else {
		Ok(None)
	}
}

/// Read a fixed-size array at an absolute offset, `None` past end of file.
fn read_bytes_at<R: Read + Seek, const N: usize>(reader: &mut R, offset: u64, file_len: u64) -> Result<Option<[u8; N]>> {
	if offset + N as u64 > file_len {
		return Ok(None);
	}

	reader.seek(SeekFrom::Start(offset))?;
	let mut buf = [0_u8; N];
	reader.read_exact(&mut buf)?;
	Ok(Some(buf))
}

fn read_u32_at<R: Read + Seek>(reader: &mut R, offset: u64, file_len: u64, endianness: Endianness) -> Result<Option<u32>> {
	let Some(buf) = read_bytes_at::<_, 4>(reader, offset, file_len)? else {
		return Ok(None);
	};
	Ok(Some(match endianness {
		Endianness::Little => u32::from_le_bytes(buf),
		Endianness::Big => u32::from_be_bytes(buf),
	}))
}

fn read_i32_at<R: Read + Seek>(reader: &mut R, offset: u64, file_len: u64, endianness: Endianness) -> Result<Option<i32>> {
	Ok(read_u32_at(reader, offset, file_len, endianness)?.map(|value| value as i32))
}
