use std::fs;
use std::path::PathBuf;

use assetdoc::asset::{AssetError, NutFile, Result, TextureDescriptor, Tiling, decode_surface};

use crate::cmd::util::{emit_json, read_decoded};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Texture index inside the container.
	#[arg(long, default_value_t = 0)]
	pub index: usize,
	#[arg(long, default_value_t = 0)]
	pub mip: usize,
	/// Cubemap face.
	#[arg(long, default_value_t = 0)]
	pub surface: usize,
	/// Write decoded RGBA8 bytes here.
	#[arg(long)]
	pub raw_out: Option<PathBuf>,
	#[arg(long)]
	pub json: bool,
}

/// Describe one texture of a NUT file and decode the selected mip.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		index,
		mip,
		surface,
		raw_out,
		json,
	} = args;

	let bytes = read_decoded(&path)?;
	let nut = NutFile::parse(&bytes)?;
	let texture_count = nut.textures.len();
	let descriptor = nut.textures.get(index).ok_or_else(|| AssetError::CorruptStream {
		at: 0,
		reason: format!("texture index {index} out of range ({texture_count} textures)"),
	})?;

	let decoded = decode_surface(descriptor, surface, mip)?;
	if let Some(target) = &raw_out {
		fs::write(target, &decoded.rgba)?;
	}

	if json {
		return emit_json(&TextureJson {
			path: path.display().to_string(),
			variant: nut.variant.as_str(),
			version: nut.version,
			texture_count,
			index,
			descriptor: DescriptorJson::from(descriptor),
			decoded: DecodedJson {
				mip,
				surface,
				width: decoded.width,
				height: decoded.height,
				rgba_len: decoded.rgba.len(),
				first_pixel: decoded.rgba.get(..4).map(<[u8]>::to_vec),
				raw_out: raw_out.map(|target| target.display().to_string()),
			},
		});
	}

	let view = DescriptorJson::from(descriptor);
	println!("path: {}", path.display());
	println!("variant: {}", nut.variant.as_str());
	println!("textures: {texture_count}");
	println!("index: {index}");
	println!("size: {}x{}", view.width, view.height);
	println!("format: {}", view.format);
	println!("mips: {}", view.mip_count);
	println!("cubemap: {}", view.is_cubemap);
	println!("hash_id: 0x{:08X}", descriptor.hash_id);
	println!("tiling: {}", view.tiling);
	println!("decoded: mip {mip} surface {surface} -> {}x{} ({} bytes)", decoded.width, decoded.height, decoded.rgba.len());
	if let Some(target) = raw_out {
		println!("raw_out: {}", target.display());
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct DescriptorJson {
	width: u32,
	height: u32,
	format: &'static str,
	mip_count: u32,
	is_cubemap: bool,
	hash_id: u32,
	tiling: String,
	surfaces: usize,
}

impl From<&TextureDescriptor> for DescriptorJson {
	fn from(descriptor: &TextureDescriptor) -> Self {
		let tiling = match descriptor.tiling {
			Tiling::Linear => "linear".to_owned(),
			Tiling::Gx2(layout) => format!(
				"gx2(format=0x{:x}, tile_mode={}, swizzle=0x{:x}, pitch={})",
				layout.format.raw,
				layout.tile_mode.raw(),
				layout.swizzle,
				layout.pitch
			),
		};
		Self {
			width: descriptor.width,
			height: descriptor.height,
			format: descriptor.format.as_str(),
			mip_count: descriptor.mip_count,
			is_cubemap: descriptor.is_cubemap,
			hash_id: descriptor.hash_id,
			tiling,
			surfaces: descriptor.surfaces.len(),
		}
	}
}

#[derive(serde::Serialize)]
struct DecodedJson {
	mip: usize,
	surface: usize,
	width: u32,
	height: u32,
	rgba_len: usize,
	first_pixel: Option<Vec<u8>>,
	raw_out: Option<String>,
}

#[derive(serde::Serialize)]
struct TextureJson {
	path: String,
	variant: &'static str,
	version: u16,
	texture_count: usize,
	index: usize,
	descriptor: DescriptorJson,
	decoded: DecodedJson,
}
