//! Flag-driven per-bone animation decoder.
//!
//! Each node header selects a sub-format per channel. Base records are read once from the
//! base region; per-frame payloads live at `key_offset + frame_size * frame + node_key`.

use glam::Quat;
use tracing::debug;

use crate::asset::error::first4;
use crate::asset::rotation::{COMPRESSED_QUAT_SIZE, decode_compressed_quat, quat_from_xyz_normalized, rot6_w};
use crate::asset::{AnimationData, AssetError, Cursor, Endianness, KeyNode, Result};

const NODE_SIZE: usize = 0x10;
const HAS_TRANSLATION: u8 = 0x01;
const HAS_ROTATION: u8 = 0x02;
const HAS_SCALE: u8 = 0x04;

/// Fixed header of a flag-driven animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OmoHeader {
	/// Declared node count before clamping.
	pub bone_count: u16,
	/// Number of frames.
	pub frame_count: u16,
	/// Byte stride between consecutive frames in the key region.
	pub frame_size: u16,
	/// Offset of the node table.
	pub node_offset: usize,
	/// Offset of the base-record region.
	pub base_offset: usize,
	/// Offset of the per-frame key region.
	pub key_offset: usize,
}

/// Translation or scale channel encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
enum VectorTrack {
	Interpolated { base: [f32; 3], range: [f32; 3] },
	Constant([f32; 3]),
	Keyframe,
}

/// Rotation channel encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RotationTrack {
	Compressed,
	Interpolated { base: [f32; 3], range: [f32; 3] },
	Keyframe { anchor: [f32; 3], step: f32 },
	Constant(Quat),
}

/// One decoded node header with its base records resolved.
#[derive(Debug, Clone, PartialEq)]
struct NodeTracks {
	hash: i32,
	key_offset: usize,
	translation: Option<VectorTrack>,
	rotation: Option<RotationTrack>,
	scale: Option<VectorTrack>,
}

/// Name given to every decoded flag-driven animation.
pub const OMO_ANIMATION_NAME: &str = "Anim";

/// Decode a flag-driven animation buffer.
///
/// Nodes are named `Bone_{hash:X}` until [`resolve_bone_names`](crate::asset::resolve_bone_names)
/// maps them onto a skeleton.
pub fn decode_omo(bytes: &[u8]) -> Result<AnimationData> {
	let mut cursor = Cursor::new(bytes, Endianness::Big);
	let header = read_header(&mut cursor)?;

	// A node table running into the base region is truncated to what fits.
	let bone_count = usize::from(header.bone_count).min(header.base_offset / NODE_SIZE);

	cursor.seek_to(header.node_offset)?;
	let mut nodes = Vec::with_capacity(bone_count);
	for _ in 0..bone_count {
		nodes.push(read_node(&mut cursor, header.base_offset)?);
	}

	let mut anim = AnimationData::new(OMO_ANIMATION_NAME, u32::from(header.frame_count));
	for (index, tracks) in nodes.iter().enumerate() {
		let mut node = KeyNode::new(format!("Bone_{:X}", tracks.hash as u32));
		node.hash = tracks.hash;
		node.bone_index = index as i32;

		for frame in 0..usize::from(header.frame_count) {
			let at = header.key_offset + usize::from(header.frame_size) * frame + tracks.key_offset;
			cursor.seek_to(at)?;
			decode_frame(&mut cursor, tracks, frame as f32, &mut node)?;
		}
		anim.bones.push(node);
	}

	debug!(bones = anim.bones.len(), frames = header.frame_count, "flag animation decoded");
	Ok(anim)
}

/// Parse only the fixed header.
pub fn read_omo_header(bytes: &[u8]) -> Result<OmoHeader> {
	read_header(&mut Cursor::new(bytes, Endianness::Big))
}

fn read_header(cursor: &mut Cursor<'_>) -> Result<OmoHeader> {
	let magic = first4(cursor.bytes());
	if &magic != b"OMO " {
		return Err(AssetError::NotAContainer { expected: "OMO", got: magic });
	}
	cursor.seek_to(4)?;
	cursor.skip(4 + 4 + 2)?;

	let bone_count = cursor.read_u16()?;
	let frame_count = cursor.read_u16()?;
	let frame_size = cursor.read_u16()?;
	let node_offset = read_offset(cursor)?;
	let base_offset = read_offset(cursor)?;
	let key_offset = read_offset(cursor)?;

	Ok(OmoHeader {
		bone_count,
		frame_count,
		frame_size,
		node_offset,
		base_offset,
		key_offset,
	})
}

fn read_offset(cursor: &mut Cursor<'_>) -> Result<usize> {
	let at = cursor.pos();
	let raw = cursor.read_i32()?;
	usize::try_from(raw).map_err(|_| AssetError::CorruptStream {
		at,
		reason: format!("negative offset {raw}"),
	})
}

fn read_node(cursor: &mut Cursor<'_>, base_offset: usize) -> Result<NodeTracks> {
	let flags = cursor.read_u8()?;
	let t_flag = cursor.read_u8()?;
	let r_flag = cursor.read_u8()?;
	let s_flag = cursor.read_u8()?;
	let hash = cursor.read_i32()?;
	let base_rel = cursor.read_i32()?;
	let key_rel = cursor.read_i32()?;

	let record_at = usize::try_from(base_offset as i64 + i64::from(base_rel)).map_err(|_| AssetError::CorruptStream {
		at: cursor.pos(),
		reason: format!("negative base record offset {base_rel}"),
	})?;
	let key_offset = usize::try_from(key_rel).map_err(|_| AssetError::CorruptStream {
		at: cursor.pos(),
		reason: format!("negative frame key offset {key_rel}"),
	})?;

	let mut record = cursor.temp_seek(record_at)?;

	let translation = if flags & HAS_TRANSLATION != 0 {
		Some(match t_flag {
			0x08 => VectorTrack::Interpolated {
				base: record.read_vec3()?,
				range: record.read_vec3()?,
			},
			0x20 => VectorTrack::Constant(record.read_vec3()?),
			0x04 => VectorTrack::Keyframe,
			other => return Err(unsupported("translation sub-format", other)),
		})
	} else {
		None
	};

	let rotation = if flags & HAS_ROTATION != 0 {
		Some(match r_flag & 0xF0 {
			0xA0 => RotationTrack::Compressed,
			0x50 => RotationTrack::Interpolated {
				base: record.read_vec3()?,
				range: record.read_vec3()?,
			},
			0x60 => RotationTrack::Keyframe {
				anchor: record.read_vec3()?,
				step: record.read_f32()? / 65535.0,
			},
			0x70 => {
				let [x, y, z] = record.read_vec3()?;
				RotationTrack::Constant(quat_from_xyz_normalized(x, y, z))
			}
			_ => return Err(unsupported("rotation sub-format", r_flag)),
		})
	} else {
		None
	};

	let scale = if flags & HAS_SCALE != 0 {
		let mut track = None;
		if s_flag & 0xF0 == 0x80 {
			track = Some(VectorTrack::Interpolated {
				base: record.read_vec3()?,
				range: record.read_vec3()?,
			});
		}
		// A constant marker in the rotation byte wins over an interpolated scale record.
		if matches!(r_flag & 0x0F, 0x02 | 0x03) {
			track = Some(VectorTrack::Constant(record.read_vec3()?));
		}
		Some(track.ok_or_else(|| unsupported("scale sub-format", s_flag))?)
	} else {
		None
	};

	Ok(NodeTracks {
		hash,
		key_offset,
		translation,
		rotation,
		scale,
	})
}

fn unsupported(kind: &'static str, value: u8) -> AssetError {
	AssetError::UnsupportedFormat {
		kind,
		value: u32::from(value),
	}
}

fn read_fraction(cursor: &mut Cursor<'_>) -> Result<f32> {
	Ok(f32::from(cursor.read_u16()?) / 65535.0)
}

fn read_vector(cursor: &mut Cursor<'_>, track: VectorTrack) -> Result<[f32; 3]> {
	Ok(match track {
		VectorTrack::Interpolated { base, range } => {
			let mut out = [0.0; 3];
			for axis in 0..3 {
				out[axis] = base[axis] + range[axis] * read_fraction(cursor)?;
			}
			out
		}
		VectorTrack::Constant(value) => value,
		VectorTrack::Keyframe => cursor.read_vec3()?,
	})
}

fn read_rotation(cursor: &mut Cursor<'_>, track: RotationTrack) -> Result<Quat> {
	Ok(match track {
		RotationTrack::Compressed => {
			let mut raw = [0_u8; COMPRESSED_QUAT_SIZE];
			raw.copy_from_slice(cursor.read_exact(COMPRESSED_QUAT_SIZE)?);
			decode_compressed_quat(raw)?
		}
		RotationTrack::Interpolated { base, range } => {
			let x = base[0] + range[0] * read_fraction(cursor)?;
			let y = base[1] + range[1] * read_fraction(cursor)?;
			let z = base[2] + range[2] * read_fraction(cursor)?;
			quat_from_xyz_normalized(x, y, z)
		}
		RotationTrack::Keyframe { anchor, step } => {
			let [x, y, anchor_z] = anchor;
			let z = anchor_z + f32::from(cursor.read_u16()?) * step;
			Quat::from_xyzw(x, y, z, rot6_w(x, y, z))
		}
		RotationTrack::Constant(value) => value,
	})
}

fn decode_frame(cursor: &mut Cursor<'_>, tracks: &NodeTracks, frame: f32, node: &mut KeyNode) -> Result<()> {
	if let Some(track) = tracks.translation {
		node.push_position(frame, read_vector(cursor, track)?);
	}
	if let Some(track) = tracks.rotation {
		node.push_rotation(frame, read_rotation(cursor, track)?);
	}
	if let Some(track) = tracks.scale {
		node.push_scale(frame, read_vector(cursor, track)?);
	}
	Ok(())
}
