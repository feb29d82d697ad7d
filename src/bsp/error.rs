use thiserror::Error;

use crate::bsp::dialect::Dialect;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, BspError>;

/// Errors produced while sniffing, resolving, decoding, and rewriting
/// compiled map data.
#[derive(Debug, Error)]
pub enum BspError {
	/// Filesystem or stream IO failure, propagated unchanged.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// An operation that needs a concrete dialect ran against a file the
	/// sniffer could not classify.
	#[error("dialect could not be determined for this file")]
	UndeterminedDialect,
	/// The record kind has no defined layout for the file's dialect.
	#[error("record kind {kind} is not defined for dialect {dialect}")]
	UnsupportedRecordKind {
		/// Logical record kind name.
		kind: &'static str,
		/// Dialect the decode was attempted against.
		dialect: Dialect,
	},
	/// Requested lump index is at or beyond the dialect's lump count.
	#[error("lump index {index} out of range (dialect max {max})")]
	LumpIndexOutOfRange {
		/// Offending lump index.
		index: u32,
		/// Number of lump slots the dialect defines.
		max: u32,
	},
	/// A declared byte range extends past the end of the source.
	#[error("declared range at offset {offset} len {length} exceeds available {available} bytes")]
	TruncatedSource {
		/// Start of the declared range.
		offset: u64,
		/// Declared range length.
		length: u64,
		/// Bytes actually available.
		available: u64,
	},
	/// CLI lump index argument was not a valid number.
	#[error("invalid lump index: {value}")]
	InvalidLumpIndex {
		/// User-provided index string.
		value: String,
	},
}
