use tracing::debug;

use crate::asset::bc::decode_block_compressed;
use crate::asset::gtx::{Gx2Layout, deswizzle_surface};
use crate::asset::pixel::decode_raw;
use crate::asset::{AssetError, Result};

/// Pixel formats carried by NUT textures, keyed by their on-disk code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
	/// BC1, 8 bytes per 4x4 block.
	Dxt1,
	/// BC2, explicit 4-bit alpha.
	Dxt3,
	/// BC3, interpolated alpha.
	Dxt5,
	/// 16-bit 5:6:5.
	Rgb565,
	/// 16-bit 1:5:5:5.
	Rgba16,
	/// 32-bit RGBA.
	Rgba32,
	/// 32-bit ABGR.
	Abgr32,
	/// 32-bit RGBA stored under the alternate code.
	Rgba32Alt,
	/// Single-channel BC4.
	Bc4,
	/// Two-channel BC5.
	Bc5,
}

impl TextureFormat {
	/// Map a NUT format byte.
	pub fn from_code(code: u8) -> Result<Self> {
		Ok(match code {
			0x00 => Self::Dxt1,
			0x01 => Self::Dxt3,
			0x02 => Self::Dxt5,
			0x08 => Self::Rgb565,
			0x0C => Self::Rgba16,
			0x0E => Self::Rgba32,
			0x10 => Self::Abgr32,
			0x11 => Self::Rgba32Alt,
			0x15 => Self::Bc4,
			0x16 => Self::Bc5,
			_ => {
				return Err(AssetError::UnsupportedFormat {
					kind: "texture format",
					value: u32::from(code),
				});
			}
		})
	}

	/// Return the NUT format byte.
	pub fn code(self) -> u8 {
		match self {
			Self::Dxt1 => 0x00,
			Self::Dxt3 => 0x01,
			Self::Dxt5 => 0x02,
			Self::Rgb565 => 0x08,
			Self::Rgba16 => 0x0C,
			Self::Rgba32 => 0x0E,
			Self::Abgr32 => 0x10,
			Self::Rgba32Alt => 0x11,
			Self::Bc4 => 0x15,
			Self::Bc5 => 0x16,
		}
	}

	/// Render format as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Dxt1 => "dxt1",
			Self::Dxt3 => "dxt3",
			Self::Dxt5 => "dxt5",
			Self::Rgb565 => "rgb565",
			Self::Rgba16 => "rgba16",
			Self::Rgba32 => "rgba32",
			Self::Abgr32 => "abgr32",
			Self::Rgba32Alt => "rgba32_alt",
			Self::Bc4 => "bc4",
			Self::Bc5 => "bc5",
		}
	}

	/// Whether the format is stored as 4x4 blocks.
	pub fn is_block_compressed(self) -> bool {
		matches!(self, Self::Dxt1 | Self::Dxt3 | Self::Dxt5 | Self::Bc4 | Self::Bc5)
	}

	/// Bytes per 4x4 block for block formats, bytes per pixel otherwise.
	pub fn unit_bytes(self) -> usize {
		match self {
			Self::Dxt1 | Self::Bc4 => 8,
			Self::Dxt3 | Self::Dxt5 | Self::Bc5 => 16,
			Self::Rgb565 | Self::Rgba16 => 2,
			Self::Rgba32 | Self::Abgr32 | Self::Rgba32Alt => 4,
		}
	}

	/// Minimum byte length of a linear `width x height` image.
	pub fn surface_size(self, width: u32, height: u32) -> usize {
		let (w, h) = (width as usize, height as usize);
		if self.is_block_compressed() {
			w.div_ceil(4) * h.div_ceil(4) * self.unit_bytes()
		} else {
			w * h * self.unit_bytes()
		}
	}
}

/// How surface bytes are laid out in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tiling {
	/// Linear raster order.
	Linear,
	/// GX2 tiled layout that must be deswizzled before decoding.
	Gx2(Gx2Layout),
}

/// One texture face holding its mip chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Surface {
	/// Raw bytes for each mip level, largest first.
	pub mipmaps: Vec<Vec<u8>>,
}

/// Texture metadata and raw mip data produced by container parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDescriptor {
	/// Mip 0 width in pixels.
	pub width: u32,
	/// Mip 0 height in pixels.
	pub height: u32,
	/// Pixel format.
	pub format: TextureFormat,
	/// Declared mip count.
	pub mip_count: u32,
	/// Whether the texture carries six cube faces.
	pub is_cubemap: bool,
	/// Texture hash id from the container.
	pub hash_id: u32,
	/// Memory layout of every mip in `surfaces`.
	pub tiling: Tiling,
	/// Six faces for cubemaps, one otherwise.
	pub surfaces: Vec<Surface>,
}

impl TextureDescriptor {
	/// Width and height of `mip`, clamped to at least one pixel.
	pub fn mip_dimensions(&self, mip: usize) -> (u32, u32) {
		let shift = mip.min(31) as u32;
		((self.width >> shift).max(1), (self.height >> shift).max(1))
	}
}

/// Linear, top-left-origin RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTexture {
	/// Width in pixels.
	pub width: u32,
	/// Height in pixels.
	pub height: u32,
	/// `width * height * 4` bytes.
	pub rgba: Vec<u8>,
}

/// Decode mip 0 of the first surface.
pub fn decode_texture(descriptor: &TextureDescriptor) -> Result<DecodedTexture> {
	decode_surface(descriptor, 0, 0)
}

/// Decode one mip of one surface.
pub fn decode_surface(descriptor: &TextureDescriptor, surface: usize, mip: usize) -> Result<DecodedTexture> {
	let bytes = descriptor
		.surfaces
		.get(surface)
		.and_then(|item| item.mipmaps.get(mip))
		.ok_or_else(|| AssetError::CorruptStream {
			at: 0,
			reason: format!("texture has no surface {surface} mip {mip}"),
		})?;
	let (width, height) = descriptor.mip_dimensions(mip);

	let linear;
	let source = match descriptor.tiling {
		Tiling::Linear => bytes.as_slice(),
		Tiling::Gx2(layout) => {
			linear = deswizzle_surface(bytes, width, height, &layout)?;
			linear.as_slice()
		}
	};

	debug!(format = descriptor.format.as_str(), width, height, surface, mip, "decoding texture surface");
	decode_pixels(source, width, height, descriptor.format)
}

/// Decode a linear buffer of `format` pixels into RGBA8.
pub fn decode_pixels(bytes: &[u8], width: u32, height: u32, format: TextureFormat) -> Result<DecodedTexture> {
	let need = format.surface_size(width, height);
	if bytes.len() < need {
		return Err(AssetError::TruncatedData {
			at: 0,
			need,
			rem: bytes.len(),
		});
	}

	let mut rgba = vec![0_u8; width as usize * height as usize * 4];
	if format.is_block_compressed() {
		decode_block_compressed(bytes, width, height, format, &mut rgba)?;
	} else {
		decode_raw(bytes, width, height, format, &mut rgba);
	}

	Ok(DecodedTexture { width, height, rgba })
}

#[cfg(test)]
mod tests;
