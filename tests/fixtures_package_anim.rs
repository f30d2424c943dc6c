#![allow(missing_docs)]

use assetdoc::asset::{ArchiveFile, BlobKind, BlobRegistry, Compression, OMO_ANIMATION_NAME, RotationType, Skeleton, XorCipher, decode_omo, resolve_bone_names};
use assetdoc_testkit::{OmoNode, VbnBone, be_floats, lz11_compress, omo, package, vbn, xor_in_place, zlib};
use glam::{Quat, Vec3};

const KEY: &[u8] = &[0x3C, 0xC3, 0x5A];
const HIPS: i32 = 0x0BAD_F00D;

fn skeleton_bytes() -> Vec<u8> {
	vbn(&[
		VbnBone {
			name: "Hips".to_owned(),
			parent: -1,
			id: HIPS as u32,
			position: [0.0, 1.0, 0.0],
			rotation: [0.0; 3],
			scale: [1.0; 3],
		},
		VbnBone {
			name: "Spine".to_owned(),
			parent: 0,
			id: 0x1234,
			position: [0.0, 0.5, 0.0],
			rotation: [0.0; 3],
			scale: [1.0; 3],
		},
	])
}

fn animation_bytes() -> Vec<u8> {
	let nodes = [
		// Constant translation on the hips.
		OmoNode {
			flags: [0x01, 0x20, 0x00, 0x00],
			hash: HIPS,
			base: be_floats(&[1.0, 2.0, 3.0]),
			frame_key: 0,
		},
		// Keyframed translation plus a constant identity rotation on a bone the skeleton lacks.
		OmoNode {
			flags: [0x03, 0x04, 0x70, 0x00],
			hash: 0x77,
			base: be_floats(&[0.0, 0.0, 0.0]),
			frame_key: 0,
		},
	];
	let frames: Vec<Vec<u8>> = (0..4).map(|frame| be_floats(&[frame as f32, 0.5, -1.0])).collect();
	omo(&nodes, 12, &frames)
}

fn encrypted_package() -> Vec<u8> {
	let mut raw = package(&[("fighter/model.vbn", zlib(&skeleton_bytes())), ("fighter/wait.omo", lz11_compress(&animation_bytes()))]);
	xor_in_place(&mut raw, KEY);
	raw
}

#[test]
fn encrypted_package_yields_named_animation_and_skeleton() {
	let archive = ArchiveFile::from_bytes(encrypted_package(), &XorCipher::new(KEY)).expect("package parses");
	assert_eq!(archive.kind_label(), "package");
	assert_eq!(archive.entry_count(), 2);

	let blobs = archive.blobs().expect("blobs decompress");
	let registry = BlobRegistry::default();
	assert_eq!(blobs[0].name, "fighter/model.vbn");
	assert_eq!(blobs[0].compression, Compression::Zlib);
	assert_eq!(registry.kind_of(&blobs[0].blob), BlobKind::Skeleton);
	assert_eq!(blobs[1].name, "fighter/wait.omo");
	assert_eq!(blobs[1].compression, Compression::Lz11);
	assert_eq!(registry.kind_of(&blobs[1].blob), BlobKind::FlagAnimation);

	let skeleton = Skeleton::parse(&blobs[0].blob.bytes).expect("skeleton parses");
	let mut anim = decode_omo(&blobs[1].blob.bytes).expect("animation decodes");
	assert_eq!(anim.name, OMO_ANIMATION_NAME);
	assert_eq!(anim.frame_count, 4);
	assert_eq!(anim.bones.len(), 2);
	assert_eq!(anim.bones[1].name, "Bone_77");

	let unresolved = resolve_bone_names(&mut anim, &skeleton);
	assert_eq!(unresolved, 1);

	let hips = anim.bone_by_name("Hips").expect("hips renamed");
	assert_eq!(hips.bone_index, 0);
	assert_eq!(hips.x_pos.keys().len(), 4);
	assert_eq!(hips.position_at(2.0), Vec3::new(1.0, 2.0, 3.0));
	assert!(!hips.has_rotation_animation());

	let stray = anim.bone_by_hash(0x77).expect("stray node kept");
	assert_eq!(stray.name, "Bone_77");
	assert_eq!(stray.rotation_type, RotationType::Quaternion);
	assert_eq!(stray.position_at(3.0), Vec3::new(3.0, 0.5, -1.0));
	assert!(stray.rotation_at(1.0).abs_diff_eq(Quat::IDENTITY, 1e-6));
}

#[test]
fn package_without_key_is_rejected() {
	let result = ArchiveFile::from_bytes(encrypted_package(), &assetdoc::asset::NoCipher);
	assert!(result.is_err());
}
