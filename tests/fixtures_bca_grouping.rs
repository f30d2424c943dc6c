#![allow(missing_docs)]

use assetdoc::asset::{BCA_ANIMATION_NAME, RotationType, Skeleton, TrackGroupingOptions, decode_track_index};
use assetdoc_testkit::{BcaTrack, VbnBone, bca, bcl, vbn};

fn bone(name: &str, parent: i32, id: u32) -> VbnBone {
	VbnBone {
		name: name.to_owned(),
		parent,
		id,
		position: [0.0; 3],
		rotation: [0.0; 3],
		scale: [1.0; 3],
	}
}

fn track(hash: u32, flags: u32, value: f32, keys: u32) -> BcaTrack {
	BcaTrack { hash, value, keys, flags }
}

fn index() -> Vec<u8> {
	bca(
		30,
		&[
			track(0xAAA1, 0x0E, 1.5, 1),
			track(0xAAA2, 0x02, 0.25, 1),
			track(0xBBB1, 0x1A, 2.0, 0),
			// Never referenced by the curve data.
			track(0xCCC1, 0x12, 7.0, 3),
			track(0xDDD1, 0x99, 9.0, 2),
		],
	)
}

fn curves() -> Vec<u8> {
	bcl(&[(4, 0xAAA1), (8, 0xAAA2), (1200, 0xBBB1)])
}

fn skeleton() -> Skeleton {
	Skeleton::parse(&vbn(&[bone("Root", -1, 0x100), bone("Arm", 0, 0x200)])).expect("skeleton parses")
}

#[test]
fn clusters_map_onto_skeleton_bones_in_order() {
	let skeleton = skeleton();
	let anim = decode_track_index(&index(), &curves(), Some(&skeleton), &TrackGroupingOptions::default()).expect("decode");

	assert_eq!(anim.name, BCA_ANIMATION_NAME);
	assert_eq!(anim.frame_count, 30);
	let names: Vec<_> = anim.bones.iter().map(|node| node.name.as_str()).collect();
	assert_eq!(names, ["Root", "Arm", "Unmapped_0"]);

	let root = &anim.bones[0];
	assert_eq!(root.hash, 0x100);
	assert_eq!(root.bone_index, 0);
	assert_eq!(root.rotation_type, RotationType::Euler);
	assert_eq!(root.x_pos.keys()[0].value, 1.5);
	assert_eq!(root.x_rot.keys()[0].value, 0.25);
	assert!(!root.has_scale_animation());

	let arm = &anim.bones[1];
	assert_eq!(arm.hash, 0x200);
	assert_eq!(arm.x_scale.keys()[0].value, 2.0);

	let stray = &anim.bones[2];
	assert_eq!(stray.hash, 0xCCC1);
	assert_eq!(stray.bone_index, -1);
	assert_eq!(stray.y_pos.keys()[0].value, 7.0);
}

#[test]
fn wider_gap_threshold_merges_clusters() {
	let options = TrackGroupingOptions { gap_threshold: 2000 };
	let anim = decode_track_index(&index(), &curves(), None, &options).expect("decode");

	let names: Vec<_> = anim.bones.iter().map(|node| node.name.as_str()).collect();
	assert_eq!(names, ["Bone_0", "Unmapped_0"]);
	let merged = &anim.bones[0];
	assert_eq!(merged.hash, 0);
	assert!(merged.has_position_animation());
	assert!(merged.has_rotation_animation());
	assert!(merged.has_scale_animation());
}

#[test]
fn swapped_inputs_are_rejected() {
	let options = TrackGroupingOptions::default();
	assert!(decode_track_index(&curves(), &index(), None, &options).is_err());
}
