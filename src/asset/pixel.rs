//! Per-pixel expansion of uncompressed formats.

use crate::asset::TextureFormat;

/// Expand 5:6:5 to RGB8 by replicating the high bits into the low bits.
pub(crate) fn rgb565_to_rgb888(c: u16) -> [u8; 3] {
	let r5 = ((c >> 11) & 0x1F) as u8;
	let g6 = ((c >> 5) & 0x3F) as u8;
	let b5 = (c & 0x1F) as u8;
	[expand5(r5), (g6 << 2) | (g6 >> 4), expand5(b5)]
}

fn expand5(v: u8) -> u8 {
	(v << 3) | (v >> 2)
}

/// Decode `width * height` uncompressed pixels; `bytes` is already length-checked.
pub(crate) fn decode_raw(bytes: &[u8], width: u32, height: u32, format: TextureFormat, out: &mut [u8]) {
	let count = width as usize * height as usize;
	let stride = format.unit_bytes();

	for (texel, dst) in bytes.chunks_exact(stride).take(count).zip(out.chunks_exact_mut(4)) {
		let rgba = match format {
			TextureFormat::Rgb565 => {
				let [r, g, b] = rgb565_to_rgb888(u16::from_le_bytes([texel[0], texel[1]]));
				[r, g, b, 0xFF]
			}
			TextureFormat::Rgba16 => {
				let c = u16::from_le_bytes([texel[0], texel[1]]);
				let a = ((c >> 15) & 1) as u8 * 0xFF;
				[expand5(((c >> 10) & 0x1F) as u8), expand5(((c >> 5) & 0x1F) as u8), expand5((c & 0x1F) as u8), a]
			}
			TextureFormat::Abgr32 => [texel[3], texel[2], texel[1], texel[0]],
			_ => [texel[0], texel[1], texel[2], texel[3]],
		};
		dst.copy_from_slice(&rgba);
	}
}

/// Rotate each 4-byte texel one channel left (`ARGB -> RGBA`).
pub(crate) fn argb_to_rgba(bytes: &mut [u8]) {
	for texel in bytes.chunks_exact_mut(4) {
		texel.rotate_left(1);
	}
}
