use crate::bsp::{BspError, Endianness, Result};

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, pos: 0 }
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(BspError::TruncatedSource {
				offset: self.pos as u64,
				length: n as u64,
				available: self.remaining() as u64,
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read a `u16` using the selected endianness.
	pub fn read_u16(&mut self, endianness: Endianness) -> Result<u16> {
		let raw = self.read_exact(2)?;
		let mut buf = [0_u8; 2];
		buf.copy_from_slice(raw);
		Ok(match endianness {
			Endianness::Little => u16::from_le_bytes(buf),
			Endianness::Big => u16::from_be_bytes(buf),
		})
	}

	/// Read an `i16` using the selected endianness.
	pub fn read_i16(&mut self, endianness: Endianness) -> Result<i16> {
		let raw = self.read_exact(2)?;
		let mut buf = [0_u8; 2];
		buf.copy_from_slice(raw);
		Ok(match endianness {
			Endianness::Little => i16::from_le_bytes(buf),
			Endianness::Big => i16::from_be_bytes(buf),
		})
	}

	/// Read a `u32` using the selected endianness.
	pub fn read_u32(&mut self, endianness: Endianness) -> Result<u32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(match endianness {
			Endianness::Little => u32::from_le_bytes(buf),
			Endianness::Big => u32::from_be_bytes(buf),
		})
	}

	/// Read an `i32` using the selected endianness.
	pub fn read_i32(&mut self, endianness: Endianness) -> Result<i32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(match endianness {
			Endianness::Little => i32::from_le_bytes(buf),
			Endianness::Big => i32::from_be_bytes(buf),
		})
	}

	/// Read an `f32` using the selected endianness.
	pub fn read_f32(&mut self, endianness: Endianness) -> Result<f32> {
		let raw = self.read_exact(4)?;
		let mut buf = [0_u8; 4];
		buf.copy_from_slice(raw);
		Ok(match endianness {
			Endianness::Little => f32::from_le_bytes(buf),
			Endianness::Big => f32::from_be_bytes(buf),
		})
	}

	/// Read a three-component `f32` vector.
	pub fn read_vec3(&mut self, endianness: Endianness) -> Result<[f32; 3]> {
		Ok([self.read_f32(endianness)?, self.read_f32(endianness)?, self.read_f32(endianness)?])
	}
}

/// Append a `u16` in the selected endianness.
pub fn put_u16(out: &mut Vec<u8>, value: u16, endianness: Endianness) {
	out.extend_from_slice(&match endianness {
		Endianness::Little => value.to_le_bytes(),
		Endianness::Big => value.to_be_bytes(),
	});
}

/// Append an `i16` in the selected endianness.
pub fn put_i16(out: &mut Vec<u8>, value: i16, endianness: Endianness) {
	out.extend_from_slice(&match endianness {
		Endianness::Little => value.to_le_bytes(),
		Endianness::Big => value.to_be_bytes(),
	});
}

/// Append a `u32` in the selected endianness.
pub fn put_u32(out: &mut Vec<u8>, value: u32, endianness: Endianness) {
	out.extend_from_slice(&match endianness {
		Endianness::Little => value.to_le_bytes(),
		Endianness::Big => value.to_be_bytes(),
	});
}

/// Append an `i32` in the selected endianness.
pub fn put_i32(out: &mut Vec<u8>, value: i32, endianness: Endianness) {
	out.extend_from_slice(&match endianness {
		Endianness::Little => value.to_le_bytes(),
		Endianness::Big => value.to_be_bytes(),
	});
}

/// Append an `f32` in the selected endianness.
pub fn put_f32(out: &mut Vec<u8>, value: f32, endianness: Endianness) {
	out.extend_from_slice(&match endianness {
		Endianness::Little => value.to_le_bytes(),
		Endianness::Big => value.to_be_bytes(),
	});
}
