use crate::asset::{AssetError, Surface, TextureDescriptor, TextureFormat, Tiling, decode_pixels, decode_surface, decode_texture};

#[test]
fn unknown_format_code_is_rejected() {
	let err = TextureFormat::from_code(0x03).expect_err("0x03 is not a known format");
	assert!(matches!(err, AssetError::UnsupportedFormat { value: 0x03, .. }));
	assert_eq!(TextureFormat::from_code(0x16).expect("bc5").code(), 0x16);
}

#[test]
fn rgb565_expands_by_bit_replication() {
	let bytes = [0x1F, 0x00, 0xE0, 0x07];
	let decoded = decode_pixels(&bytes, 2, 1, TextureFormat::Rgb565).expect("decodes");
	assert_eq!(decoded.rgba, vec![0, 0, 255, 255, 0, 255, 0, 255]);
}

#[test]
fn rgba16_alpha_is_single_bit() {
	// a=1, r=0x1F, g=0, b=0x01
	let pixel: u16 = 0x8000 | (0x1F << 10) | 0x01;
	let decoded = decode_pixels(&pixel.to_le_bytes(), 1, 1, TextureFormat::Rgba16).expect("decodes");
	assert_eq!(decoded.rgba, vec![255, 0, 8, 255]);
}

#[test]
fn abgr32_is_reversed() {
	let decoded = decode_pixels(&[1, 2, 3, 4], 1, 1, TextureFormat::Abgr32).expect("decodes");
	assert_eq!(decoded.rgba, vec![4, 3, 2, 1]);
	let decoded = decode_pixels(&[1, 2, 3, 4], 1, 1, TextureFormat::Rgba32Alt).expect("decodes");
	assert_eq!(decoded.rgba, vec![1, 2, 3, 4]);
}

#[test]
fn short_source_is_truncated() {
	let err = decode_pixels(&[0_u8; 8], 8, 4, TextureFormat::Dxt1).expect_err("needs two blocks");
	assert!(matches!(err, AssetError::TruncatedData { need: 16, rem: 8, .. }));
}

#[test]
fn partial_edge_blocks_are_clipped() {
	let bytes = vec![0xFF_u8; TextureFormat::Dxt1.surface_size(6, 5)];
	assert_eq!(bytes.len(), 4 * 8);
	let decoded = decode_pixels(&bytes, 6, 5, TextureFormat::Dxt1).expect("decodes");
	assert_eq!(decoded.rgba.len(), 6 * 5 * 4);
}

fn descriptor(mips: Vec<Vec<u8>>) -> TextureDescriptor {
	TextureDescriptor {
		width: 4,
		height: 2,
		format: TextureFormat::Rgba32,
		mip_count: mips.len() as u32,
		is_cubemap: false,
		hash_id: 0,
		tiling: Tiling::Linear,
		surfaces: vec![Surface { mipmaps: mips }],
	}
}

#[test]
fn decode_surface_uses_clamped_mip_dimensions() {
	let texture = descriptor(vec![vec![7; 4 * 2 * 4], vec![9; 2 * 1 * 4], vec![5; 4]]);
	assert_eq!(decode_texture(&texture).expect("mip 0").rgba.len(), 32);

	let mip1 = decode_surface(&texture, 0, 1).expect("mip 1");
	assert_eq!((mip1.width, mip1.height), (2, 1));
	let mip2 = decode_surface(&texture, 0, 2).expect("mip 2");
	assert_eq!((mip2.width, mip2.height), (1, 1));
	assert_eq!(mip2.rgba, vec![5; 4]);
}

#[test]
fn missing_surface_is_an_error() {
	let texture = descriptor(vec![vec![0; 32]]);
	assert!(decode_surface(&texture, 1, 0).is_err());
	assert!(decode_surface(&texture, 0, 1).is_err());
}
