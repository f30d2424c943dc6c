use glam::{Quat, Vec3};

use crate::asset::{AnimationData, AssetError, Endianness, KeyNode, Skeleton, Writer, euler_to_rest_rotation, resolve_bone_names};

struct BoneSpec {
	name: &'static str,
	parent: i32,
	id: u32,
	pos: [f32; 3],
	rot: [f32; 3],
}

fn vbn(endianness: Endianness, bones: &[BoneSpec]) -> Vec<u8> {
	let mut w = Writer::new(endianness);
	let magic = match endianness {
		Endianness::Big => b"VBN ",
		Endianness::Little => b" NBV",
	};
	w.write_bytes(magic).write_i16(2).write_i16(0).write_u32(bones.len() as u32);
	w.write_u32(bones.len() as u32).write_u32(0).write_u32(0).write_u32(0);
	for bone in bones {
		w.write_fixed_string(bone.name, 64).write_u32(0).write_i32(bone.parent).write_u32(bone.id);
	}
	for bone in bones {
		for v in bone.pos.iter().chain(&bone.rot).chain(&[1.0, 1.0, 1.0]) {
			w.write_f32(*v);
		}
	}
	w.into_bytes()
}

fn chain() -> Vec<BoneSpec> {
	vec![
		BoneSpec {
			name: "Root",
			parent: -1,
			id: 0x100,
			pos: [0.0, 1.0, 0.0],
			rot: [0.0, 0.0, 0.0],
		},
		BoneSpec {
			name: "Hip",
			parent: 0,
			id: 0x200,
			pos: [1.0, 0.0, 0.0],
			rot: [0.0, 0.0, std::f32::consts::FRAC_PI_2],
		},
		BoneSpec {
			name: "Knee",
			parent: 1,
			id: 0x300,
			pos: [1.0, 0.0, 0.0],
			rot: [0.0, 0.0, 0.0],
		},
	]
}

#[test]
fn parses_both_byte_orders() {
	for endianness in [Endianness::Big, Endianness::Little] {
		let skeleton = Skeleton::parse(&vbn(endianness, &chain())).expect("parse");
		let names: Vec<_> = skeleton.bones().iter().map(|bone| bone.name.as_str()).collect();
		assert_eq!(names, ["Root", "Hip", "Knee"], "{}", endianness.as_str());
		assert_eq!(skeleton.bones()[2].parent_index, 1);
		assert_eq!(skeleton.name_for_id(0x200), Some("Hip"));
		assert_eq!(skeleton.bones()[0].rest_position, Vec3::new(0.0, 1.0, 0.0));
	}
}

#[test]
fn world_transforms_compose_parent_first() {
	let skeleton = Skeleton::parse(&vbn(Endianness::Big, &chain())).expect("parse");
	let world = skeleton.world_transforms();
	let knee = world[2].transform_point3(Vec3::ZERO);
	// Hip sits at (1,1,0) and turns +X into +Y, so the knee lands one unit above it.
	assert!((knee - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-5, "knee at {knee}");
}

#[test]
fn tree_order_visits_parents_before_children() {
	let mut bones = chain();
	bones.swap(0, 2);
	bones[0].parent = 1;
	bones[1].parent = 2;
	bones[2].parent = -1;
	let skeleton = Skeleton::parse(&vbn(Endianness::Little, &bones)).expect("parse");
	assert_eq!(skeleton.tree_order(), [2, 1, 0]);
	assert_eq!(skeleton.children(2), [1]);
}

#[test]
fn rest_rotation_keeps_w_non_negative() {
	let q = euler_to_rest_rotation(Vec3::new(0.0, 0.0, 1.5 * std::f32::consts::PI));
	assert!(q.w >= 0.0);
	assert!((q.length() - 1.0).abs() < 1e-5);
	let expected = Quat::from_rotation_z(1.5 * std::f32::consts::PI);
	assert!(q.dot(expected).abs() > 0.9999);
}

#[test]
fn short_bone_table_is_truncated_data() {
	let mut bytes = vbn(Endianness::Big, &chain());
	bytes.truncate(bytes.len() - 4);
	let err = Skeleton::parse(&bytes).expect_err("short");
	assert!(matches!(err, AssetError::TruncatedData { .. }));
}

#[test]
fn unknown_magic_is_rejected() {
	let err = Skeleton::parse(b"NUT3....").expect_err("magic");
	assert!(matches!(err, AssetError::NotAContainer { expected: "VBN", .. }));
}

#[test]
fn resolves_node_names_by_hash() {
	let skeleton = Skeleton::parse(&vbn(Endianness::Big, &chain())).expect("parse");
	let mut anim = AnimationData::new("Anim", 1);
	for hash in [0x300, 0x999, -1] {
		let mut node = KeyNode::new(format!("Bone_{hash:X}"));
		node.hash = hash;
		anim.bones.push(node);
	}

	let unresolved = resolve_bone_names(&mut anim, &skeleton);
	assert_eq!(unresolved, 1);
	assert_eq!(anim.bones[0].name, "Knee");
	assert_eq!(anim.bones[1].name, "Bone_999");
	assert_eq!(anim.bones[2].name, "Bone_FFFFFFFF");
}
