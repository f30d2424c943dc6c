//! 4x4 block decoders for DXT1/3/5 and BC4/5.
//!
//! Blocks are walked in raster order. Edge blocks are decoded whole and any pixel that
//! falls outside the image is dropped.

use crate::asset::pixel::rgb565_to_rgb888;
use crate::asset::{AssetError, Result, TextureFormat};

/// Decode every block of `bytes` into `out`.
pub(crate) fn decode_block_compressed(bytes: &[u8], width: u32, height: u32, format: TextureFormat, out: &mut [u8]) -> Result<()> {
	let blocks_x = width.div_ceil(4);
	let blocks_y = height.div_ceil(4);
	let stride = format.unit_bytes();

	for by in 0..blocks_y {
		for bx in 0..blocks_x {
			let offset = (by * blocks_x + bx) as usize * stride;
			let block = bytes.get(offset..).unwrap_or_default();
			let texels = decode_block(block, format)?;
			write_block(out, width, height, bx * 4, by * 4, &texels);
		}
	}
	Ok(())
}

/// Decode one block into 16 RGBA texels in row-major order.
///
/// `block` must hold at least one whole block of `format`; raw formats are rejected.
pub fn decode_block(block: &[u8], format: TextureFormat) -> Result<[[u8; 4]; 16]> {
	let unsupported = || AssetError::UnsupportedFormat {
		kind: "block format",
		value: u32::from(format.code()),
	};
	if !format.is_block_compressed() {
		return Err(unsupported());
	}
	let need = format.unit_bytes();
	if block.len() < need {
		return Err(AssetError::TruncatedData {
			at: 0,
			need,
			rem: block.len(),
		});
	}

	Ok(match format {
		TextureFormat::Dxt1 => color_block(&block[0..8], [0xFF; 16]),
		TextureFormat::Dxt3 => color_block(&block[8..16], explicit_alpha(&block[0..8])),
		TextureFormat::Dxt5 => color_block(&block[8..16], ramp_channel(&block[0..8])),
		TextureFormat::Bc4 => {
			let r = ramp_channel(&block[0..8]);
			std::array::from_fn(|i| [r[i], r[i], r[i], 0xFF])
		}
		TextureFormat::Bc5 => {
			let r = ramp_channel(&block[0..8]);
			let g = ramp_channel(&block[8..16]);
			std::array::from_fn(|i| [r[i], g[i], 0xFF, 0xFF])
		}
		TextureFormat::Rgb565 | TextureFormat::Rgba16 | TextureFormat::Rgba32 | TextureFormat::Abgr32 | TextureFormat::Rgba32Alt => return Err(unsupported()),
	})
}

/// Build the 8-entry interpolation ramp shared by DXT5 alpha and BC4/BC5.
pub fn ramp_palette(v0: u8, v1: u8) -> [u8; 8] {
	let (a, b) = (u32::from(v0), u32::from(v1));
	let mut ramp = [0_u8; 8];
	ramp[0] = v0;
	ramp[1] = v1;
	if v0 > v1 {
		for k in 2..8 {
			ramp[k] = (((8 - k as u32) * a + (k as u32 - 1) * b) / 7) as u8;
		}
	} else {
		for k in 2..6 {
			ramp[k] = (((6 - k as u32) * a + (k as u32 - 1) * b) / 5) as u8;
		}
		ramp[6] = 0;
		ramp[7] = 0xFF;
	}
	ramp
}

fn ramp_channel(block: &[u8]) -> [u8; 16] {
	let ramp = ramp_palette(block[0], block[1]);
	let mut bits = 0_u64;
	for (i, byte) in block[2..8].iter().enumerate() {
		bits |= u64::from(*byte) << (i * 8);
	}
	std::array::from_fn(|i| ramp[((bits >> (3 * i)) & 0x7) as usize])
}

fn explicit_alpha(block: &[u8]) -> [u8; 16] {
	std::array::from_fn(|i| {
		let byte = block[i / 2];
		let nibble = if i % 2 == 0 { byte & 0x0F } else { byte >> 4 };
		nibble * 17
	})
}

/// Four-color opaque palette; DXT1 punch-through alpha is not used by this format family.
fn color_palette(c0: u16, c1: u16) -> [[u8; 3]; 4] {
	let p0 = rgb565_to_rgb888(c0);
	let p1 = rgb565_to_rgb888(c1);
	let third = |a: [u8; 3], b: [u8; 3]| -> [u8; 3] { std::array::from_fn(|i| ((2 * u32::from(a[i]) + u32::from(b[i])) / 3) as u8) };
	[p0, p1, third(p0, p1), third(p1, p0)]
}

fn color_block(block: &[u8], alpha: [u8; 16]) -> [[u8; 4]; 16] {
	let c0 = u16::from_le_bytes([block[0], block[1]]);
	let c1 = u16::from_le_bytes([block[2], block[3]]);
	let palette = color_palette(c0, c1);
	std::array::from_fn(|i| {
		let index = (block[4 + i / 4] >> (2 * (i % 4))) & 0x3;
		let [r, g, b] = palette[index as usize];
		[r, g, b, alpha[i]]
	})
}

fn write_block(out: &mut [u8], width: u32, height: u32, x0: u32, y0: u32, texels: &[[u8; 4]; 16]) {
	for (i, texel) in texels.iter().enumerate() {
		let x = x0 + (i % 4) as u32;
		let y = y0 + (i / 4) as u32;
		if x >= width || y >= height {
			continue;
		}
		let at = (y as usize * width as usize + x as usize) * 4;
		out[at..at + 4].copy_from_slice(texel);
	}
}
