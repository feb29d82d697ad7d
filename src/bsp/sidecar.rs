//! Side-car lump override discovery.
//!
//! Source-branch maps accept sibling `<stem>_<lump>_<seq>.lmp` files whose
//! payloads replace the lump stored in the map itself. The index is built
//! once when a container opens and consulted on every resolve.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;

use crate::bsp::bytes::Cursor;
use crate::bsp::{Dialect, Endianness};

/// Size of the override header preceding the payload.
const HEADER_LEN: usize = 16;

/// One accepted override file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarEntry {
	/// Lump index the override replaces, taken from the file header rather
	/// than the file name.
	pub lump_index: u32,
	/// Payload offset inside the override file.
	pub offset: u64,
	/// Payload length in bytes.
	pub length: u64,
	/// Per-lump format version carried by the override.
	pub version: u32,
	/// Path of the override file.
	pub source: PathBuf,
}

/// Override files keyed by the lump index they replace.
#[derive(Debug, Default)]
pub struct SidecarIndex {
	entries: HashMap<u32, SidecarEntry>,
}

impl SidecarIndex {
	/// An index with no overrides.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Scan the map's directory for override siblings.
	///
	/// File names must match `<stem>_<lump>_<seq>.lmp` with both numbers
	/// decimal. Candidates are processed in ascending `(seq, name)` order so
	/// the highest sequence for a lump wins. Unreadable or malformed
	/// candidates are skipped, never fatal; the sixteen-byte header is
	/// little-endian regardless of the map's byte order, and its lump index
	/// field overrides the one in the file name.
	pub fn build(main_path: &Path, dialect: Dialect) -> Self {
		let mut index = Self::empty();

		let Some(stem) = main_path.file_stem().and_then(|stem| stem.to_str()) else {
			return index;
		};
		let dir = match main_path.parent() {
			Some(parent) if !parent.as_os_str().is_empty() => parent,
			_ => Path::new("."),
		};
		let Ok(listing) = std::fs::read_dir(dir) else {
			return index;
		};

		let prefix = format!("{stem}_");
		let mut candidates = Vec::new();
		for entry in listing.flatten() {
			let name = entry.file_name();
			let Some(name) = name.to_str() else {
				continue;
			};
			if let Some(sequence) = parse_name(name, &prefix) {
				candidates.push((sequence, name.to_owned(), entry.path()));
			}
		}
		candidates.sort();

		for (_, name, path) in candidates {
			match read_header(&path) {
				Some(entry) if entry.lump_index < dialect.lump_count() => {
					debug!("override {name}: lump {} from sequence file", entry.lump_index);
					index.insert(entry);
				}
				Some(entry) => {
					debug!("override {name} skipped: lump {} out of range for {dialect}", entry.lump_index);
				}
				None => {
					debug!("override {name} skipped: unreadable header");
				}
			}
		}

		index
	}

	pub(crate) fn insert(&mut self, entry: SidecarEntry) {
		self.entries.insert(entry.lump_index, entry);
	}

	/// Override for one lump index, if any.
	pub fn get(&self, index: u32) -> Option<&SidecarEntry> {
		self.entries.get(&index)
	}

	/// Number of lumps with an active override.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether no overrides were found.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Active overrides in ascending lump order.
	pub fn entries(&self) -> Vec<&SidecarEntry> {
		let mut entries: Vec<_> = self.entries.values().collect();
		entries.sort_by_key(|entry| entry.lump_index);
		entries
	}
}

/// Extract the sequence number from a candidate file name.
///
/// The stem prefix is stripped first so map names containing underscores
/// still match; the remainder must be exactly `<lump>_<seq>.lmp`.
fn parse_name(name: &str, prefix: &str) -> Option<u32> {
	let rest = name.strip_prefix(prefix)?.strip_suffix(".lmp")?;
	let (lump, sequence) = rest.split_once('_')?;
	lump.parse::<u32>().ok()?;
	sequence.parse::<u32>().ok()
}

fn read_header(path: &Path) -> Option<SidecarEntry> {
	let mut file = File::open(path).ok()?;
	let mut raw = [0_u8; HEADER_LEN];
	file.read_exact(&mut raw).ok()?;

	let mut cursor = Cursor::new(&raw);
	let offset = cursor.read_i32(Endianness::Little).ok()?;
	let lump_index = cursor.read_i32(Endianness::Little).ok()?;
	let version = cursor.read_i32(Endianness::Little).ok()?;
	let length = cursor.read_i32(Endianness::Little).ok()?;
	if offset < 0 || lump_index < 0 || version < 0 || length < 0 {
		return None;
	}

	Some(SidecarEntry {
		lump_index: lump_index as u32,
		offset: offset as u64,
		length: length as u64,
		version: version as u32,
		source: path.to_path_buf(),
	})
}
