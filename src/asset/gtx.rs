//! GX2 surface tiling.
//!
//! Only the 2D thin1 macro-tiled mode is reversed; linear modes pass through untouched.

use crate::asset::{AssetError, Result};

/// GX2 tile modes recognized by the deswizzler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMode {
	/// `ADDR_TM_LINEAR_GENERAL`.
	LinearGeneral,
	/// `ADDR_TM_LINEAR_ALIGNED`.
	LinearAligned,
	/// `ADDR_TM_2D_TILED_THIN1`.
	Tiled2dThin1,
}

impl TileMode {
	/// Map a raw GX2 tile mode.
	pub fn from_raw(raw: u32) -> Result<Self> {
		match raw {
			0 => Ok(Self::LinearGeneral),
			1 => Ok(Self::LinearAligned),
			4 => Ok(Self::Tiled2dThin1),
			_ => Err(AssetError::UnsupportedFormat { kind: "tile mode", value: raw }),
		}
	}

	/// Return the raw GX2 value.
	pub fn raw(self) -> u32 {
		match self {
			Self::LinearGeneral => 0,
			Self::LinearAligned => 1,
			Self::Tiled2dThin1 => 4,
		}
	}
}

/// Element geometry of a GX2 surface format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gx2Format {
	/// Raw GX2 surface format value.
	pub raw: u32,
	/// Bits per element (one 4x4 block for compressed formats).
	pub bpp: u32,
	/// Whether elements are 4x4 blocks.
	pub compressed: bool,
}

impl Gx2Format {
	/// Map a raw GX2 surface format.
	pub fn from_raw(raw: u32) -> Result<Self> {
		let (bpp, compressed) = match raw {
			0x31 | 0x431 | 0x34 | 0x234 => (64, true),
			0x32 | 0x432 | 0x33 | 0x433 | 0x35 | 0x235 => (128, true),
			0x1A | 0x41A => (32, false),
			_ => return Err(AssetError::UnsupportedFormat { kind: "gx2 surface format", value: raw }),
		};
		Ok(Self { raw, bpp, compressed })
	}

	/// Bytes copied per element.
	pub fn element_bytes(self) -> usize {
		(self.bpp / 8) as usize
	}
}

/// Tiling parameters of one GX2 texture, as read from its surface header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gx2Layout {
	/// Surface format.
	pub format: Gx2Format,
	/// Tile mode.
	pub tile_mode: TileMode,
	/// Raw swizzle word.
	pub swizzle: u32,
	/// Pitch of mip 0, in elements.
	pub pitch: u32,
	/// Width of mip 0 in pixels, used to scale the pitch for smaller mips.
	pub base_width: u32,
}

impl Gx2Layout {
	/// Pitch of a mip that is `width` pixels wide.
	pub fn mip_pitch(&self, width: u32) -> u32 {
		let ratio = (self.base_width / width.max(1)).max(1);
		self.pitch / ratio
	}
}

/// Deswizzle one mip of one surface into linear element order.
pub fn deswizzle_surface(src: &[u8], width: u32, height: u32, layout: &Gx2Layout) -> Result<Vec<u8>> {
	match layout.tile_mode {
		TileMode::LinearGeneral | TileMode::LinearAligned => Ok(src.to_vec()),
		TileMode::Tiled2dThin1 => Ok(deswizzle_macro_tiled(src, width, height, layout.format, layout.mip_pitch(width), layout.swizzle)),
	}
}

/// Reorder 2D-thin1 macro-tiled bytes into raster order.
///
/// The output has the same length as `src`. Elements whose source or destination fall
/// outside that length are left zeroed.
pub fn deswizzle_macro_tiled(src: &[u8], width: u32, height: u32, format: Gx2Format, pitch: u32, swizzle: u32) -> Vec<u8> {
	let mut out = vec![0_u8; src.len()];
	for_each_element(width, height, format, pitch, swizzle, |tiled, linear, size| {
		copy_clamped(src, tiled, &mut out, linear, size);
	});
	out
}

/// Inverse of [`deswizzle_macro_tiled`]: scatter raster-order bytes into tiled order.
pub fn swizzle_macro_tiled(src: &[u8], width: u32, height: u32, format: Gx2Format, pitch: u32, swizzle: u32) -> Vec<u8> {
	let mut out = vec![0_u8; src.len()];
	for_each_element(width, height, format, pitch, swizzle, |tiled, linear, size| {
		copy_clamped(src, linear, &mut out, tiled, size);
	});
	out
}

fn copy_clamped(src: &[u8], from: usize, dst: &mut [u8], to: usize, size: usize) {
	for k in 0..size {
		let (Some(&byte), Some(slot)) = (src.get(from.saturating_add(k)), dst.get_mut(to.saturating_add(k))) else {
			break;
		};
		*slot = byte;
	}
}

fn for_each_element(width: u32, height: u32, format: Gx2Format, pitch: u32, swizzle: u32, mut visit: impl FnMut(usize, usize, usize)) {
	let swizzle_bits = ((swizzle >> 8) & 1) + (((swizzle >> 9) & 3) << 1);
	let (w, h) = if format.compressed { (width / 4, height / 4) } else { (width, height) };
	let size = format.element_bytes();

	for y in 0..h {
		for x in 0..w {
			// Addresses past the address space cannot land in any buffer.
			let Some(tiled) = surface_addr_macro_tiled(x, y, format.bpp, pitch, swizzle_bits).and_then(|addr| usize::try_from(addr).ok()) else {
				continue;
			};
			let linear = (y as usize * w as usize + x as usize) * size;
			visit(tiled, linear, size);
		}
	}
}

/// Source byte address of element `(x, y)` in a 2D-thin1 macro-tiled surface.
///
/// Returns `None` when a hostile pitch pushes the address past `u64`.
pub fn surface_addr_macro_tiled(x: u32, y: u32, bpp: u32, pitch: u32, swizzle_bits: u32) -> Option<u64> {
	let (x64, y64, bpp64) = (u64::from(x), u64::from(y), u64::from(bpp));
	let pixel_index = u64::from(pixel_index_within_micro_tile(x, y, bpp));
	let elem_offset = (bpp64 * pixel_index) >> 3;

	let pipe = ((y >> 3) ^ (x >> 3)) & 1;
	let bank = (((y / 32) ^ (x >> 3)) & 1) | (2 * (((y / 16) ^ (x >> 4)) & 1));
	let bank_pipe = ((pipe + 2 * bank) ^ swizzle_bits) % 9;
	let pipe = u64::from(bank_pipe % 2);
	let bank = u64::from(bank_pipe / 2);

	let macro_tile_bytes = (bpp64 * 512 + 7) >> 3;
	let macro_tile_offset = (x64 / 32 + u64::from(pitch / 32) * (y64 / 16)).checked_mul(macro_tile_bytes)?;

	let unk1 = elem_offset + (macro_tile_offset >> 3);
	Some((unk1 & !0xFF).checked_mul(8)? | (unk1 & 0xFF) | (pipe << 8) | (bank << 9))
}

fn pixel_index_within_micro_tile(x: u32, y: u32, bpp: u32) -> u32 {
	let bits = ((x & 4) << 1) | ((y & 2) << 3) | ((y & 4) << 3);
	match bpp {
		32 | 96 => bits | (x & 1) | (x & 2) | ((y & 1) << 2),
		64 => bits | (x & 1) | ((y & 1) << 1) | ((x & 2) << 1),
		128 => bits | (y & 1) | ((x & 1) << 1) | ((x & 2) << 1),
		_ => bits,
	}
}
