//! Opened map container.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use log::info;

use crate::bsp::brushside::BrushSide;
use crate::bsp::directory::{ResolvedLump, resolve_lump};
use crate::bsp::lumpio::read_lump;
use crate::bsp::model::Model;
use crate::bsp::record::LumpRecord;
use crate::bsp::sidecar::SidecarIndex;
use crate::bsp::sniff::{Session, sniff};
use crate::bsp::{BspError, Dialect, Endianness, Result};

/// An opened map file plus any decoded state layered over it.
///
/// Each lump is either fully materialized (a decoded collection or a raw
/// replacement buffer, which then speaks for the lump) or a pass-through
/// that rewrites byte-identically. Raw replacements take precedence over
/// decoded collections for the same lump. File handles are transient; the
/// container holds only the path.
pub struct BspFile {
	path: PathBuf,
	session: Session,
	sidecars: SidecarIndex,
	models: Option<Vec<Model>>,
	brush_sides: Option<Vec<BrushSide>>,
	replaced: HashMap<u32, Vec<u8>>,
}

impl BspFile {
	/// Open and classify a map file.
	///
	/// Succeeds even when no dialect matches; operations that need one fail
	/// later with [`BspError::UndeterminedDialect`]. Side-car overrides are
	/// discovered here, once, for dialects that support them.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref().to_path_buf();
		let mut file = File::open(&path)?;
		let session = sniff(&mut file)?;
		drop(file);

		let sidecars = if session.dialect.supports_sidecars() {
			SidecarIndex::build(&path, session.dialect)
		} else {
			SidecarIndex::empty()
		};
		info!(
			"opened {}: {} ({} endian), {} lump override(s)",
			path.display(),
			session.dialect,
			session.endianness.as_str(),
			sidecars.len()
		);

		Ok(Self {
			path,
			session,
			sidecars,
			models: None,
			brush_sides: None,
			replaced: HashMap::new(),
		})
	}

	/// Path the container was opened from.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Classification the sniffer settled on.
	pub fn session(&self) -> &Session {
		&self.session
	}

	/// Detected dialect.
	pub fn dialect(&self) -> Dialect {
		self.session.dialect
	}

	/// Byte order every multi-byte read uses.
	pub fn endianness(&self) -> Endianness {
		self.session.endianness
	}

	/// Number of lump slots the dialect defines.
	pub fn lump_count(&self) -> u32 {
		self.session.dialect.lump_count()
	}

	/// Discovered side-car overrides.
	pub fn sidecars(&self) -> &SidecarIndex {
		&self.sidecars
	}

	/// Resolve one lump's location without reading its payload.
	pub fn location(&self, index: u32) -> Result<ResolvedLump> {
		let mut file = File::open(&self.path)?;
		resolve_lump(&mut file, &self.session, &self.sidecars, index)
	}

	/// Current bytes of one lump.
	///
	/// Materialized state (raw replacement first, then a decoded collection)
	/// speaks for the lump; otherwise the original payload is read through
	/// its resolved location. Never materializes anything itself.
	pub fn lump_bytes(&self, index: u32) -> Result<Vec<u8>> {
		if let Some(bytes) = self.materialized_bytes(index)? {
			return Ok(bytes);
		}
		let resolved = self.location(index)?;
		read_lump(&self.path, &self.session, &resolved)
	}

	/// Decode one record kind from its well-known lump.
	///
	/// Reads whatever bytes currently speak for the lump; the decoded
	/// records are returned to the caller, not cached.
	pub fn decode_kind<T: LumpRecord>(&self) -> Result<Vec<T>> {
		let dialect = self.session.dialect;
		if dialect == Dialect::Undetermined {
			return Err(BspError::UndeterminedDialect);
		}
		let Some(index) = T::lump_index(dialect) else {
			return Err(BspError::UnsupportedRecordKind { kind: T::KIND, dialect });
		};

		let bytes = self.lump_bytes(index)?;
		T::decode_all(&bytes, dialect, self.session.endianness)
	}

	/// Model records, decoded on first access.
	pub fn models(&mut self) -> Result<&[Model]> {
		if self.models.is_none() {
			self.models = Some(self.decode_kind()?);
		}
		Ok(self.models.get_or_insert_with(Vec::new))
	}

	/// Mutable model records; edits show up in the next write.
	pub fn models_mut(&mut self) -> Result<&mut Vec<Model>> {
		if self.models.is_none() {
			self.models = Some(self.decode_kind()?);
		}
		Ok(self.models.get_or_insert_with(Vec::new))
	}

	/// Brush-side records, decoded on first access.
	pub fn brush_sides(&mut self) -> Result<&[BrushSide]> {
		if self.brush_sides.is_none() {
			self.brush_sides = Some(self.decode_kind()?);
		}
		Ok(self.brush_sides.get_or_insert_with(Vec::new))
	}

	/// Mutable brush-side records; edits show up in the next write.
	pub fn brush_sides_mut(&mut self) -> Result<&mut Vec<BrushSide>> {
		if self.brush_sides.is_none() {
			self.brush_sides = Some(self.decode_kind()?);
		}
		Ok(self.brush_sides.get_or_insert_with(Vec::new))
	}

	/// Replace one lump with raw bytes.
	///
	/// The replacement becomes the lump's authoritative content, superseding
	/// any collection decoded from it earlier.
	pub fn replace_lump(&mut self, index: u32, bytes: Vec<u8>) -> Result<()> {
		let dialect = self.session.dialect;
		if dialect == Dialect::Undetermined {
			return Err(BspError::UndeterminedDialect);
		}
		let max = dialect.lump_count();
		if index >= max {
			return Err(BspError::LumpIndexOutOfRange { index, max });
		}

		self.replaced.insert(index, bytes);
		Ok(())
	}

	/// Whether in-memory state speaks for this lump.
	pub fn is_materialized(&self, index: u32) -> bool {
		if self.replaced.contains_key(&index) {
			return true;
		}
		let dialect = self.session.dialect;
		if self.models.is_some() && Model::lump_index(dialect) == Some(index) {
			return true;
		}
		self.brush_sides.is_some() && BrushSide::lump_index(dialect) == Some(index)
	}

	/// Encode whatever in-memory state speaks for this lump.
	pub(crate) fn materialized_bytes(&self, index: u32) -> Result<Option<Vec<u8>>> {
		if let Some(bytes) = self.replaced.get(&index) {
			return Ok(Some(bytes.clone()));
		}

		let dialect = self.session.dialect;
		let endianness = self.session.endianness;
		if let Some(models) = &self.models {
			if Model::lump_index(dialect) == Some(index) {
				return Ok(Some(Model::encode_all(models, dialect, endianness)?));
			}
		}
		if let Some(sides) = &self.brush_sides {
			if BrushSide::lump_index(dialect) == Some(index) {
				return Ok(Some(BrushSide::encode_all(sides, dialect, endianness)?));
			}
		}
		Ok(None)
	}
}
