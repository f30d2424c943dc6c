use tracing::debug;

use crate::asset::error::first4;
use crate::asset::gtx::{Gx2Format, Gx2Layout, TileMode};
use crate::asset::pixel::argb_to_rgba;
use crate::asset::{AssetError, Cursor, Endianness, Result, Surface, TextureDescriptor, TextureFormat, Tiling};

const FIRST_HEADER: usize = 0x10;
const VERSION_RELATIVE_OFFSETS: u16 = 0x0200;

/// On-disk NUT container variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutVariant {
	/// `NTP3`, big-endian, linear surfaces.
	Ntp3,
	/// `NTWD`, little-endian, linear surfaces.
	Ntwd,
	/// `NTWU`, big-endian, GX2-tiled surfaces.
	Ntwu,
}

impl NutVariant {
	/// Render variant as its magic.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Ntp3 => "NTP3",
			Self::Ntwd => "NTWD",
			Self::Ntwu => "NTWU",
		}
	}
}

/// Parsed NUT texture container.
#[derive(Debug, Clone)]
pub struct NutFile {
	/// Container variant.
	pub variant: NutVariant,
	/// Container version.
	pub version: u16,
	/// Textures in header order.
	pub textures: Vec<TextureDescriptor>,
}

/// Fields shared by every per-texture header.
struct CommonHeader {
	total_size: i32,
	data_size: i32,
	header_size: u16,
	mip_count: u8,
	format_code: u8,
	format: TextureFormat,
	width: u16,
	height: u16,
	is_cubemap: bool,
}

impl CommonHeader {
	fn surface_count(&self) -> usize {
		if self.is_cubemap { 6 } else { 1 }
	}
}

impl NutFile {
	/// Return whether `raw` starts with a NUT magic.
	pub fn sniff(raw: &[u8]) -> bool {
		matches!(&first4(raw), b"NTP3" | b"NTWD" | b"NTWU")
	}

	/// Parse every texture header and slice out its surfaces.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let mut cursor = Cursor::new(bytes, Endianness::Big);
		let magic = cursor.read_code4().map_err(|_| AssetError::NotAContainer {
			expected: "NUT",
			got: first4(bytes),
		})?;
		let variant = match &magic {
			b"NTP3" => NutVariant::Ntp3,
			b"NTWU" => NutVariant::Ntwu,
			b"NTWD" => NutVariant::Ntwd,
			_ => return Err(AssetError::NotAContainer { expected: "NUT", got: magic }),
		};

		// Version is big-endian in every variant; the rest follows the variant.
		let version = cursor.read_u16()?;
		if variant == NutVariant::Ntwd {
			cursor.set_endianness(Endianness::Little);
		}
		let count = cursor.read_u16()?;

		let mut textures = Vec::with_capacity(usize::from(count));
		let mut header_ptr = FIRST_HEADER;
		for _ in 0..count {
			cursor.seek_to(header_ptr)?;
			let (texture, advance) = match variant {
				NutVariant::Ntp3 | NutVariant::Ntwd => read_linear_texture(&mut cursor, header_ptr, version)?,
				NutVariant::Ntwu => read_gx2_texture(&mut cursor, header_ptr)?,
			};
			textures.push(texture);
			header_ptr = offset(header_ptr, i64::from(advance), cursor.pos())?;
		}

		debug!(variant = variant.as_str(), version, textures = textures.len(), "nut container parsed");
		Ok(Self { variant, version, textures })
	}
}

fn read_common(cursor: &mut Cursor<'_>) -> Result<CommonHeader> {
	let total_size = cursor.read_i32()?;
	cursor.skip(4)?;
	let data_size = cursor.read_i32()?;
	let header_size = cursor.read_u16()?;
	cursor.skip(3)?;
	let mip_count = cursor.read_u8()?;
	cursor.skip(1)?;
	let format_code = cursor.read_u8()?;
	let format = TextureFormat::from_code(format_code)?;
	let width = cursor.read_u16()?;
	let height = cursor.read_u16()?;
	cursor.skip(4)?;
	let caps2 = cursor.read_u32()?;
	let is_cubemap = caps2 & 0x200 == 0x200 && caps2 & 0xFC00 == 0xFC00;

	if mip_count == 0 {
		return Err(AssetError::CorruptStream {
			at: cursor.pos(),
			reason: "texture declares zero mip levels".to_owned(),
		});
	}

	Ok(CommonHeader {
		total_size,
		data_size,
		header_size,
		mip_count,
		format_code,
		format,
		width,
		height,
		is_cubemap,
	})
}

/// Read the cubemap size block when present, returning the per-face size.
fn read_cubemap_sizes(cursor: &mut Cursor<'_>, header: &CommonHeader) -> Result<i32> {
	if !header.is_cubemap {
		return Ok(0);
	}
	let face_size = cursor.read_i32()?;
	cursor.read_i32()?;
	cursor.skip(8)?;
	Ok(face_size)
}

/// Skip the trailing `eXt`/`GIDX` block and return the texture hash id.
fn read_hash_tail(cursor: &mut Cursor<'_>) -> Result<u32> {
	cursor.skip(0x10)?;
	cursor.skip(4)?;
	cursor.read_i32()?;
	let hash_id = cursor.read_u32()?;
	cursor.skip(4)?;
	Ok(hash_id)
}

fn read_linear_texture(cursor: &mut Cursor<'_>, header_ptr: usize, version: u16) -> Result<(TextureDescriptor, i32)> {
	let header = read_common(cursor)?;

	let mut data_offset = if version < VERSION_RELATIVE_OFFSETS {
		cursor.read_i32()?;
		header_ptr + usize::from(header.header_size)
	} else {
		let rel = cursor.read_i32()?;
		offset(header_ptr, i64::from(rel), cursor.pos())?
	};
	for _ in 0..3 {
		cursor.read_i32()?;
	}

	let face_size = read_cubemap_sizes(cursor, &header)?;

	let mip_sizes = if header.mip_count == 1 {
		vec![if header.is_cubemap { face_size } else { header.data_size }]
	} else {
		let sizes = (0..header.mip_count).map(|_| cursor.read_i32()).collect::<Result<Vec<_>>>()?;
		cursor.align(0x10)?;
		sizes
	};

	let hash_id = read_hash_tail(cursor)?;

	let source = cursor.bytes();
	let mut surfaces = Vec::with_capacity(header.surface_count());
	for _ in 0..header.surface_count() {
		let mut surface = Surface::default();
		for size in &mip_sizes {
			let size = to_len(*size, cursor.pos())?;
			let mut mip = section(source, data_offset, size)?;
			if matches!(header.format, TextureFormat::Rgba32 | TextureFormat::Rgba32Alt) {
				argb_to_rgba(&mut mip);
			}
			surface.mipmaps.push(mip);
			data_offset += size;
		}
		surfaces.push(surface);
	}

	debug!(format = header.format_code, width = header.width, height = header.height, mips = header.mip_count, "linear texture parsed");

	let advance = if version < VERSION_RELATIVE_OFFSETS {
		header.total_size
	} else {
		i32::from(header.header_size)
	};

	Ok((
		TextureDescriptor {
			width: u32::from(header.width),
			height: u32::from(header.height),
			format: header.format,
			mip_count: u32::from(header.mip_count),
			is_cubemap: header.is_cubemap,
			hash_id,
			tiling: Tiling::Linear,
			surfaces,
		},
		advance,
	))
}

fn read_gx2_texture(cursor: &mut Cursor<'_>, header_ptr: usize) -> Result<(TextureDescriptor, i32)> {
	let header = read_common(cursor)?;

	let data_offset = offset(header_ptr, i64::from(cursor.read_i32()?), cursor.pos())?;
	cursor.read_i32()?;
	let gtx_offset = offset(header_ptr, i64::from(cursor.read_i32()?), cursor.pos())?;
	cursor.read_i32()?;

	let face_size = read_cubemap_sizes(cursor, &header)?;

	let (image_size, mip_size) = if header.mip_count == 1 {
		(if header.is_cubemap { face_size } else { header.data_size }, 0)
	} else {
		let image_size = cursor.read_i32()?;
		let mip_size = cursor.read_i32()?;
		cursor.skip((usize::from(header.mip_count) - 2) * 4)?;
		cursor.align(0x10)?;
		(image_size, mip_size)
	};

	let hash_id = read_hash_tail(cursor)?;

	let (layout, mip_offsets) = {
		let mut gtx = cursor.temp_seek(gtx_offset)?;
		let _dim = gtx.read_i32()?;
		let gtx_width = gtx.read_u32()?;
		let _height = gtx.read_i32()?;
		let _depth = gtx.read_i32()?;
		let _mips = gtx.read_i32()?;
		let gtx_format = gtx.read_u32()?;
		gtx.skip(12)?;
		let _image_size = gtx.read_i32()?;
		let _image_ptr = gtx.read_i32()?;
		let _mip_size = gtx.read_i32()?;
		let _mip_ptr = gtx.read_i32()?;
		let tile_mode = gtx.read_u32()?;
		let swizzle = gtx.read_u32()?;
		gtx.read_i32()?;
		let pitch = gtx.read_u32()?;

		let mut mip_offsets = vec![0_i64; usize::from(header.mip_count)];
		for level in 1..mip_offsets.len() {
			mip_offsets[level] = mip_offsets[1] + i64::from(gtx.read_i32()?);
		}

		let layout = Gx2Layout {
			format: Gx2Format::from_raw(gtx_format)?,
			tile_mode: TileMode::from_raw(tile_mode)?,
			swizzle,
			pitch,
			base_width: gtx_width,
		};
		(layout, mip_offsets)
	};

	let surface_count = header.surface_count();
	let mut surfaces = vec![Surface::default(); surface_count];
	let min_size = layout.format.element_bytes() as i64;
	let source = cursor.bytes();

	for level in 0..mip_offsets.len() {
		let span = if mip_offsets.len() == 1 {
			i64::from(image_size)
		} else if level + 1 == mip_offsets.len() {
			i64::from(mip_size) + mip_offsets[1] - mip_offsets[level]
		} else {
			mip_offsets[level + 1] - mip_offsets[level]
		};
		let size = (span / surface_count as i64).max(min_size);
		let size = to_len_i64(size, cursor.pos())?;

		for (face, surface) in surfaces.iter_mut().enumerate() {
			let start = offset(data_offset, mip_offsets[level] + (size * face) as i64, cursor.pos())?;
			surface.mipmaps.push(section(source, start, size)?);
		}
	}

	debug!(
		format = header.format_code,
		gx2_format = layout.format.raw,
		tile_mode = layout.tile_mode.raw(),
		width = header.width,
		height = header.height,
		"gx2 texture parsed"
	);

	Ok((
		TextureDescriptor {
			width: u32::from(header.width),
			height: u32::from(header.height),
			format: header.format,
			mip_count: u32::from(header.mip_count),
			is_cubemap: header.is_cubemap,
			hash_id,
			tiling: Tiling::Gx2(layout),
			surfaces,
		},
		i32::from(header.header_size),
	))
}

fn section(source: &[u8], start: usize, len: usize) -> Result<Vec<u8>> {
	source.get(start..start + len).map(<[u8]>::to_vec).ok_or(AssetError::TruncatedData {
		at: start,
		need: len,
		rem: source.len().saturating_sub(start),
	})
}

fn offset(base: usize, rel: i64, at: usize) -> Result<usize> {
	to_len_i64(base as i64 + rel, at)
}

fn to_len(value: i32, at: usize) -> Result<usize> {
	to_len_i64(i64::from(value), at)
}

fn to_len_i64(value: i64, at: usize) -> Result<usize> {
	usize::try_from(value).map_err(|_| AssetError::CorruptStream {
		at,
		reason: format!("negative offset or size {value}"),
	})
}
