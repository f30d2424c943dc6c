use crate::asset::{AssetError, decode_compressed_quat, quat_from_xyz_normalized, rot6_w};

fn pack(f1: u32, f2: u32, f3: u32, selector: u8) -> [u8; 8] {
	[
		(f1 >> 12) as u8,
		(f1 >> 4) as u8,
		(((f1 & 0xF) << 4) | (f2 >> 16)) as u8,
		(f2 >> 8) as u8,
		f2 as u8,
		(f3 >> 12) as u8,
		(f3 >> 4) as u8,
		(((f3 & 0xF) << 4) as u8) | selector,
	]
}

#[test]
fn compressed_quaternion_has_unit_norm_for_every_selector() {
	// Components near 0.3, -0.2, 0.1 after mapping.
	let fields = [0x8_0000 + 0x3_6505, 0x8_0000 - 0x2_4358, 0x8_0000 + 0x1_21AC];
	for selector in 0..4 {
		let q = decode_compressed_quat(pack(fields[0], fields[1], fields[2], selector)).expect("valid selector");
		assert!((q.length() - 1.0).abs() < 1e-4, "selector {selector}: |q| = {}", q.length());
	}
}

#[test]
fn selector_places_rebuilt_component() {
	let mid = 0x8_0000 - 1;
	let q = decode_compressed_quat(pack(mid, mid, mid, 3)).expect("valid selector");
	assert!(q.x.abs() < 1e-5 && q.y.abs() < 1e-5 && q.z.abs() < 1e-5);
	assert!((q.w - 1.0).abs() < 1e-4);

	let q = decode_compressed_quat(pack(mid, mid, mid, 0)).expect("valid selector");
	assert!((q.x - 1.0).abs() < 1e-4);
}

#[test]
fn unknown_selector_is_rejected() {
	let err = decode_compressed_quat(pack(0, 0, 0, 7)).expect_err("selector 7");
	assert!(matches!(err, AssetError::UnsupportedFormat { value: 7, .. }));
}

#[test]
fn rot6_w_tracks_sqrt_of_residual() {
	let (x, y, z) = (0.1_f32, 0.2, 0.3);
	let w = rot6_w(x, y, z);
	let direct = (1.0 - (x * x + y * y + z * z)).sqrt();
	assert!((w - direct).abs() < 1e-5, "w={w} direct={direct}");
}

#[test]
fn rot6_w_is_zero_past_unit_sphere() {
	assert_eq!(rot6_w(0.8, 0.8, 0.0), 0.0);
	assert_eq!(rot6_w(1.0, 0.0, 0.0), 0.0);
}

#[test]
fn derived_w_quaternion_is_normalized() {
	let q = quat_from_xyz_normalized(0.9, 0.9, 0.0);
	assert!((q.length() - 1.0).abs() < 1e-5);
	assert!(q.w >= 0.0);
}
