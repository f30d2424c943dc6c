use tracing::debug;

use crate::asset::{AssetError, Cursor, Endianness, Result};

/// Leading tag byte of an LZ11 stream.
pub const LZ11_TAG: u8 = 0x11;

/// Return whether `raw` starts with the LZ11 tag byte.
pub fn is_lz11(raw: &[u8]) -> bool {
	raw.first() == Some(&LZ11_TAG)
}

/// Read the declared decompressed length and payload start of an LZ11 stream.
pub fn lz11_header(raw: &[u8]) -> Result<(usize, usize)> {
	let mut cursor = Cursor::new(raw, Endianness::Little);
	let tag = cursor.read_u8()?;
	if tag != LZ11_TAG {
		return Err(AssetError::UnsupportedFormat {
			kind: "compression tag",
			value: u32::from(tag),
		});
	}

	let short = cursor.read_exact(3)?;
	let len = u32::from(short[0]) | u32::from(short[1]) << 8 | u32::from(short[2]) << 16;
	if len != 0 {
		return Ok((len as usize, 4));
	}

	let extended = cursor.read_u32()?;
	Ok((extended as usize, 8))
}

/// Decompress an LZ11 stream into exactly its declared length.
pub fn decompress_lz11(raw: &[u8]) -> Result<Vec<u8>> {
	let (declared, start) = lz11_header(raw)?;
	let mut cursor = Cursor::new(raw, Endianness::Little);
	cursor.seek_to(start)?;

	let mut out = Vec::with_capacity(declared);
	let mut flags = 0_u8;
	let mut mask = 0_u8;

	while out.len() < declared {
		if mask == 0 {
			flags = cursor.read_u8()?;
			mask = 0x80;
		}

		let is_ref = flags & mask != 0;
		mask >>= 1;

		if !is_ref {
			out.push(cursor.read_u8()?);
			continue;
		}

		let at = cursor.pos();
		let (length, distance) = read_back_reference(&mut cursor)?;
		if distance > out.len() {
			return Err(AssetError::CorruptStream {
				at,
				reason: format!("back-reference distance {distance} exceeds output {}", out.len()),
			});
		}
		if out.len() + length > declared {
			return Err(AssetError::CorruptStream {
				at,
				reason: format!("copy of {length} bytes overruns declared length {declared}"),
			});
		}

		// Byte-at-a-time so overlapping runs see their own output.
		for _ in 0..length {
			let byte = out[out.len() - distance];
			out.push(byte);
		}
	}

	debug!(declared, consumed = cursor.pos(), "lz11 stream decompressed");
	Ok(out)
}

fn read_back_reference(cursor: &mut Cursor<'_>) -> Result<(usize, usize)> {
	let b0 = usize::from(cursor.read_u8()?);
	let (length, distance) = match b0 >> 4 {
		0 => {
			let b1 = usize::from(cursor.read_u8()?);
			let b2 = usize::from(cursor.read_u8()?);
			((((b0 & 0xF) << 4) | (b1 >> 4)) + 0x11, ((b1 & 0xF) << 8) | b2)
		}
		1 => {
			let b1 = usize::from(cursor.read_u8()?);
			let b2 = usize::from(cursor.read_u8()?);
			let b3 = usize::from(cursor.read_u8()?);
			((((b0 & 0xF) << 12) | (b1 << 4) | (b2 >> 4)) + 0x111, ((b2 & 0xF) << 8) | b3)
		}
		nibble => {
			let b1 = usize::from(cursor.read_u8()?);
			(nibble + 1, ((b0 & 0xF) << 8) | b1)
		}
	};
	Ok((length, distance + 1))
}
