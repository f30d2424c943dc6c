//! Quaternion reconstruction helpers shared by the animation decoders.

use glam::Quat;

use crate::asset::{AssetError, Result};

const EPSILON: f32 = 1.0e-12;
const SCALE1: f32 = std::f32::consts::FRAC_1_SQRT_2;
const SCALE2: f32 = (SCALE1 * 2.0) / 1_048_575.0;

/// Size in bytes of one packed quaternion.
pub const COMPRESSED_QUAT_SIZE: usize = 8;

/// Map a 20-bit field onto `[-1/sqrt(2), 1/sqrt(2)]`.
fn component(field: u32) -> f32 {
	field as f32 * SCALE2 - SCALE1
}

/// Unpack an 8-byte smallest-three quaternion.
///
/// Three 20-bit fields hold the stored components in order; the low nibble of the last
/// byte names which of X/Y/Z/W was dropped and is rebuilt from the unit-length constraint.
/// The result is not renormalized.
pub fn decode_compressed_quat(raw: [u8; COMPRESSED_QUAT_SIZE]) -> Result<Quat> {
	let b = raw.map(u32::from);
	let f1 = (b[0] << 12) | (b[1] << 4) | (b[2] >> 4);
	let f2 = ((b[2] & 0xF) << 16) | (b[3] << 8) | b[4];
	let f3 = (b[5] << 12) | (b[6] << 4) | (b[7] >> 4);
	let selector = b[7] & 0xF;

	let c1 = component(f1);
	let c2 = component(f2);
	let c3 = component(f3);
	let missing = (1.0 - (c1 * c1 + c2 * c2 + c3 * c3)).abs().sqrt();

	Ok(match selector {
		0 => Quat::from_xyzw(missing, c1, c2, c3),
		1 => Quat::from_xyzw(c1, missing, c2, c3),
		2 => Quat::from_xyzw(c1, c2, missing, c3),
		3 => Quat::from_xyzw(c1, c2, c3, missing),
		_ => {
			return Err(AssetError::UnsupportedFormat {
				kind: "quaternion selector",
				value: selector,
			});
		}
	})
}

/// Rebuild W for a keyframed rotation.
///
/// Three Newton steps of an inverse square root seeded from `1/sqrt`, then scaled back by
/// the residual.
pub fn rot6_w(x: f32, y: f32, z: f32) -> f32 {
	let cumulative = 1.0 - (x * x + y * y + z * z);
	let seed = (1.0 / f64::from(cumulative).sqrt()) as f32;
	let inv = if cumulative - EPSILON < 0.0 { 0.0 } else { seed };
	let half = 0.5 * cumulative;

	let f7 = half * inv;
	let f8 = 1.5 - f7 * inv;
	let mut f0 = f8 * inv;

	let f9 = half * f0;
	let f10 = 1.5 - f9 * f0;
	f0 *= f10;

	let f11 = half * f0;
	let f13 = 1.5 - f11 * f0;
	f0 *= f13;

	cumulative * f0
}

/// Derive W from the unit-length constraint and normalize.
pub fn quat_from_xyz_normalized(x: f32, y: f32, z: f32) -> Quat {
	let w = (1.0 - (x * x + y * y + z * z)).abs().sqrt();
	Quat::from_xyzw(x, y, z, w).normalize()
}

#[cfg(test)]
mod tests;
