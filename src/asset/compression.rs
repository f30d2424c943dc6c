use std::io::Read;

use flate2::read::ZlibDecoder;
use tracing::debug;

use crate::asset::lz11::{decompress_lz11, is_lz11};
use crate::asset::{AssetError, Result};

const MAX_DECOMPRESSED_BYTES: usize = 512 * 1024 * 1024;

/// Compression mode detected for a blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Raw uncompressed bytes.
	None,
	/// LZ11 stream (leading `0x11`).
	Lz11,
	/// zlib stream.
	Zlib,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Lz11 => "lz11",
			Self::Zlib => "zlib",
		}
	}

	/// Sniff the compression mode from leading bytes.
	pub fn detect(raw: &[u8]) -> Self {
		if is_lz11(raw) {
			Self::Lz11
		} else if is_zlib(raw) {
			Self::Zlib
		} else {
			Self::None
		}
	}
}

/// Detect and decode compression, returning `(mode, decoded_bytes)`.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	let mode = Compression::detect(&raw);
	let out = match mode {
		Compression::None => raw,
		Compression::Lz11 => decompress_lz11(&raw)?,
		Compression::Zlib => decode_zlib(&raw)?,
	};
	debug!(mode = mode.as_str(), len = out.len(), "blob decoded");
	Ok((mode, out))
}

fn is_zlib(raw: &[u8]) -> bool {
	matches!(raw, [0x78, 0x01 | 0x5E | 0x9C | 0xDA, ..])
}

fn decode_zlib(raw: &[u8]) -> Result<Vec<u8>> {
	let mut decoder = ZlibDecoder::new(raw);
	let mut out = Vec::new();
	let mut buf = [0_u8; 8192];

	loop {
		let read = decoder.read(&mut buf).map_err(|err| AssetError::CorruptStream {
			at: out.len(),
			reason: format!("zlib: {err}"),
		})?;
		if read == 0 {
			break;
		}

		if out.len() + read > MAX_DECOMPRESSED_BYTES {
			return Err(AssetError::CorruptStream {
				at: out.len(),
				reason: format!("zlib output exceeded {MAX_DECOMPRESSED_BYTES} bytes"),
			});
		}

		out.extend_from_slice(&buf[..read]);
	}

	Ok(out)
}
