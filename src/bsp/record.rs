//! Typed record decoding over raw lump payloads.

use crate::bsp::bytes::Cursor;
use crate::bsp::{BspError, Dialect, Endianness, Result};

/// Sentinel for index fields a dialect's layout does not store.
///
/// Decoding fills absent fields with this value; encoding ignores whatever
/// an absent field holds, so the sentinel survives a round trip only in
/// memory, never on disk.
pub const ABSENT_INDEX: i32 = -1;

/// A fixed-stride record stored in one well-known lump.
///
/// Implementations map one logical record kind onto every dialect that
/// defines it: which lump holds the records, how wide one record is, and
/// how its fields are laid out.
pub trait LumpRecord: Sized {
	/// Kind name used in errors and listings.
	const KIND: &'static str;

	/// Lump index holding this kind, `None` where the dialect has no
	/// defined layout for it.
	fn lump_index(dialect: Dialect) -> Option<u32>;

	/// Encoded record width in bytes for the dialect.
	fn stride(dialect: Dialect) -> Option<usize>;

	/// Decode one record from a stride-sized chunk.
	fn decode_one(cursor: &mut Cursor<'_>, dialect: Dialect, endianness: Endianness) -> Result<Self>;

	/// Append one record's encoded bytes.
	fn encode_one(&self, out: &mut Vec<u8>, dialect: Dialect, endianness: Endianness);

	/// Decode a whole payload into records.
	///
	/// A trailing fragment shorter than the stride is dropped, matching how
	/// engines size their loads from `length / stride`.
	fn decode_all(bytes: &[u8], dialect: Dialect, endianness: Endianness) -> Result<Vec<Self>> {
		let Some(stride) = Self::stride(dialect) else {
			return Err(BspError::UnsupportedRecordKind { kind: Self::KIND, dialect });
		};

		let mut records = Vec::with_capacity(bytes.len() / stride);
		for chunk in bytes.chunks_exact(stride) {
			let mut cursor = Cursor::new(chunk);
			records.push(Self::decode_one(&mut cursor, dialect, endianness)?);
		}
		Ok(records)
	}

	/// Encode records back into one contiguous payload.
	fn encode_all(records: &[Self], dialect: Dialect, endianness: Endianness) -> Result<Vec<u8>> {
		let Some(stride) = Self::stride(dialect) else {
			return Err(BspError::UnsupportedRecordKind { kind: Self::KIND, dialect });
		};

		let mut out = Vec::with_capacity(records.len() * stride);
		for record in records {
			let before = out.len();
			record.encode_one(&mut out, dialect, endianness);
			debug_assert_eq!(out.len() - before, stride, "{} encode width drifted from its stride", Self::KIND);
		}
		Ok(out)
	}
}
