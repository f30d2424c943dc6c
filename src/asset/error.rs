use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Errors produced while unpacking containers and decoding textures or animations.
#[derive(Debug, Error)]
pub enum AssetError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("truncated data at offset {at}, need {need} bytes, remaining {rem}")]
	TruncatedData {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Seek target fell outside the buffer.
	#[error("seek to {target} outside buffer of {len} bytes")]
	SeekOutOfRange {
		/// Requested absolute position.
		target: i64,
		/// Buffer length.
		len: usize,
	},
	/// A back-reference, offset, or compressed stream was internally inconsistent.
	#[error("corrupt stream at offset {at}: {reason}")]
	CorruptStream {
		/// Offset (input or output, depending on the decoder) where corruption was detected.
		at: usize,
		/// Short description of the inconsistency.
		reason: String,
	},
	/// A format, tile mode, or sub-format byte outside the known enumerations.
	#[error("unsupported {kind}: 0x{value:x}")]
	UnsupportedFormat {
		/// Which enumeration was being matched.
		kind: &'static str,
		/// Offending raw value.
		value: u32,
	},
	/// Top-level magic did not identify the expected container.
	#[error("not a {expected} container (magic={got:?})")]
	NotAContainer {
		/// Container family that was expected.
		expected: &'static str,
		/// First up-to-4 bytes of the stream.
		got: [u8; 4],
	},
	/// Nested section tag mismatch.
	#[error("section tag mismatch at {at}: expected {expected:?}, got {got:?}")]
	BadTag {
		/// Expected section tag.
		expected: [u8; 4],
		/// Actual section tag.
		got: [u8; 4],
		/// Cursor offset of the tag read.
		at: usize,
	},
	/// Entry count stayed outside the sane range even after decryption.
	#[error("implausible entry count {count}")]
	ImplausibleEntryCount {
		/// Parsed entry count.
		count: u32,
	},
	/// Animation node hash had no matching skeleton bone.
	#[error("unresolved bone hash 0x{hash:08X}")]
	UnresolvedBoneHash {
		/// Hash that failed to resolve.
		hash: i32,
	},
}

pub(crate) fn first4(bytes: &[u8]) -> [u8; 4] {
	let mut magic = [0_u8; 4];
	let take = bytes.len().min(4);
	magic[..take].copy_from_slice(&bytes[..take]);
	magic
}
