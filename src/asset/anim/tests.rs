use glam::Quat;

use crate::asset::{AnimationData, Interpolation, KeyGroup, KeyNode, RotationType};

#[test]
fn inserts_stay_sorted_and_overwrite_duplicates() {
	let mut group = KeyGroup::default();
	group.insert(4.0, 40.0);
	group.insert(0.0, 0.0);
	group.insert(2.0, 20.0);
	group.insert(2.0, 22.0);

	let frames: Vec<f32> = group.keys().iter().map(|key| key.frame).collect();
	assert_eq!(frames, vec![0.0, 2.0, 4.0]);
	assert_eq!(group.keys()[1].value, 22.0);
	assert_eq!(group.frame_count(), 4.0);
}

#[test]
fn linear_sampling_between_keys() {
	let mut group = KeyGroup::default();
	group.insert(0.0, 0.0);
	group.insert(10.0, 100.0);
	assert_eq!(group.value_at(2.5), 25.0);
	assert_eq!(group.value_at(10.0), 100.0);
	assert_eq!(group.value_at(-5.0), 0.0);
	assert_eq!(group.value_at(50.0), 100.0);
}

#[test]
fn step_keys_hold_value() {
	let mut group = KeyGroup::default();
	group.key_frame_mut(0.0).value = 1.0;
	group.key_frame_mut(0.0).interpolation = Interpolation::Step;
	group.insert(10.0, 5.0);
	assert_eq!(group.value_at(9.0), 1.0);
}

#[test]
fn empty_group_samples_zero() {
	assert_eq!(KeyGroup::default().value_at(3.0), 0.0);
	assert!(!KeyGroup::default().has_animation());
}

#[test]
fn node_defaults_and_fallbacks() {
	let node = KeyNode::new("root");
	assert_eq!(node.hash, -1);
	assert_eq!(node.bone_index, -1);
	assert!(!node.has_animation());
	assert_eq!(node.scale_at(0.0).to_array(), [1.0, 1.0, 1.0]);
	assert_eq!(node.rotation_at(0.0), Quat::IDENTITY);
}

#[test]
fn quaternion_rotation_slerps_between_keys() {
	let mut node = KeyNode::new("spin");
	let end = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
	node.push_rotation(0.0, Quat::IDENTITY);
	node.push_rotation(10.0, end);

	let mid = node.rotation_at(5.0);
	let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
	assert!(mid.abs_diff_eq(expected, 1e-5) || mid.abs_diff_eq(-expected, 1e-5));
	assert_eq!(node.rotation_at(10.0), end);
}

#[test]
fn euler_rotation_composes_axes() {
	let mut node = KeyNode::new("euler");
	node.rotation_type = RotationType::Euler;
	node.z_rot.insert(0.0, std::f32::consts::FRAC_PI_2);
	let q = node.rotation_at(0.0);
	assert!(q.abs_diff_eq(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2), 1e-6));
}

#[test]
fn animation_lookups() {
	let mut anim = AnimationData::new("Anim", 3);
	let mut node = KeyNode::new("hip");
	node.hash = 0x1234;
	node.bone_index = 2;
	anim.bones.push(node);

	assert!(anim.bone_by_name("hip").is_some());
	assert!(anim.bone_by_hash(0x1234).is_some());
	assert!(anim.bone_by_index(2).is_some());
	assert!(anim.bone_by_index(0).is_none());
}
