/// 32-byte XOR key cycled over absolute file offsets.
///
/// One dialect ships every directory entry and lump payload XORed against
/// this key. The key itself is readable at a fixed header offset because the
/// covered region is always zero in the parent dialect, and zero XOR key
/// reproduces the key bytes verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorKey {
	bytes: [u8; Self::LEN],
}

impl XorKey {
	/// Key length in bytes.
	pub const LEN: usize = 32;
	/// File offset of the always-zero header region that exposes the key.
	pub const FILE_OFFSET: u64 = 384;

	/// Wrap candidate key bytes, rejecting the all-zero region of a plain file.
	pub fn from_bytes(bytes: [u8; Self::LEN]) -> Option<Self> {
		if bytes.iter().all(|byte| *byte == 0) {
			return None;
		}
		Some(Self { bytes })
	}

	/// XOR `buf` in place against the key cycled from absolute offset `start`.
	///
	/// The cycle index depends only on each byte's absolute file offset, so
	/// re-applying to any range restores it and reads stay idempotent no
	/// matter how earlier calls were sliced.
	pub fn apply(&self, buf: &mut [u8], start: u64) {
		for (i, byte) in buf.iter_mut().enumerate() {
			let idx = ((start + i as u64) % Self::LEN as u64) as usize;
			*byte ^= self.bytes[idx];
		}
	}
}
