use std::collections::VecDeque;

use glam::{Mat4, Quat, Vec3};
use tracing::{debug, warn};

use crate::asset::error::first4;
use crate::asset::{AnimationData, AssetError, Cursor, Endianness, Result};

const NAME_WIDTH: usize = 64;

/// One skeleton joint and its rest pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
	/// Joint name.
	pub name: String,
	/// Hash that animation nodes refer to.
	pub bone_id: u32,
	/// Joint category as stored.
	pub bone_type: u32,
	/// Parent joint index; negative for roots.
	pub parent_index: i32,
	/// Rest translation.
	pub rest_position: Vec3,
	/// Rest rotation as stored (X/Y/Z radians).
	pub rest_euler: Vec3,
	/// Rest rotation as a normalized quaternion with non-negative W.
	pub rest_rotation: Quat,
	/// Rest scale.
	pub rest_scale: Vec3,
}

impl Bone {
	/// Local rest transform (`T * R * S`).
	pub fn local_transform(&self) -> Mat4 {
		Mat4::from_scale_rotation_translation(self.rest_scale, self.rest_rotation, self.rest_position)
	}
}

/// Compose `Z * Y * X` axis rotations and force W non-negative.
pub fn euler_to_rest_rotation(euler: Vec3) -> Quat {
	let q = (Quat::from_rotation_z(euler.z) * Quat::from_rotation_y(euler.y) * Quat::from_rotation_x(euler.x)).normalize();
	if q.w < 0.0 { -q } else { q }
}

/// Bone table used to name and place animation curves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
	bones: Vec<Bone>,
}

impl Skeleton {
	/// Build a skeleton from bones already in index order.
	pub fn from_bones(bones: Vec<Bone>) -> Self {
		Self { bones }
	}

	/// Parse a VBN skeleton; `VBN ` is big-endian, ` NBV` little-endian.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		let endianness = match &first4(bytes) {
			b"VBN " => Endianness::Big,
			b" NBV" => Endianness::Little,
			other => {
				return Err(AssetError::NotAContainer {
					expected: "VBN",
					got: *other,
				});
			}
		};

		let mut cursor = Cursor::new(bytes, endianness);
		cursor.seek_to(4)?;
		let _unk1 = cursor.read_i16()?;
		let _unk2 = cursor.read_i16()?;
		let total = cursor.read_u32()?;
		let mut per_type = [0_u32; 4];
		for slot in &mut per_type {
			*slot = cursor.read_u32()?;
		}

		// Each bone needs at least its 76-byte record and 36-byte pose.
		let need = total as usize * (NAME_WIDTH + 12 + 36);
		if need > cursor.remaining() {
			return Err(AssetError::TruncatedData {
				at: cursor.pos(),
				need,
				rem: cursor.remaining(),
			});
		}

		let mut bones = Vec::with_capacity(total as usize);
		for _ in 0..total {
			let name = cursor.read_fixed_string(NAME_WIDTH)?;
			let bone_type = cursor.read_u32()?;
			let parent_index = cursor.read_i32()?;
			let bone_id = cursor.read_u32()?;
			bones.push(Bone {
				name,
				bone_id,
				bone_type,
				parent_index,
				rest_position: Vec3::ZERO,
				rest_euler: Vec3::ZERO,
				rest_rotation: Quat::IDENTITY,
				rest_scale: Vec3::ONE,
			});
		}

		for bone in &mut bones {
			bone.rest_position = Vec3::from_array(cursor.read_vec3()?);
			bone.rest_euler = Vec3::from_array(cursor.read_vec3()?);
			bone.rest_scale = Vec3::from_array(cursor.read_vec3()?);
			bone.rest_rotation = euler_to_rest_rotation(bone.rest_euler);
		}

		debug!(bones = bones.len(), endianness = endianness.as_str(), ?per_type, "skeleton parsed");
		Ok(Self { bones })
	}

	/// Return bones in index order.
	pub fn bones(&self) -> &[Bone] {
		&self.bones
	}

	/// Find a bone by its id hash.
	pub fn bone_by_id(&self, bone_id: u32) -> Option<&Bone> {
		self.bones.iter().find(|bone| bone.bone_id == bone_id)
	}

	/// Name of the bone whose id equals `bone_id`.
	pub fn name_for_id(&self, bone_id: u32) -> Option<&str> {
		self.bone_by_id(bone_id).map(|bone| bone.name.as_str())
	}

	/// Index of the bone called `name`.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.bones.iter().position(|bone| bone.name == name)
	}

	/// Indices of bones whose parent is `index`.
	pub fn children(&self, index: usize) -> Vec<usize> {
		self.bones
			.iter()
			.enumerate()
			.filter(|(child, bone)| *child != index && usize::try_from(bone.parent_index).is_ok_and(|parent| parent == index))
			.map(|(child, _)| child)
			.collect()
	}

	/// Breadth-first bone order starting from every root.
	pub fn tree_order(&self) -> Vec<usize> {
		let mut queue: VecDeque<usize> = (0..self.bones.len()).filter(|index| self.parent_of(*index).is_none()).collect();
		let mut out = Vec::with_capacity(self.bones.len());
		while let Some(index) = queue.pop_front() {
			out.push(index);
			queue.extend(self.children(index));
		}
		out
	}

	/// World-space rest transforms in index order.
	pub fn world_transforms(&self) -> Vec<Mat4> {
		let mut world = vec![Mat4::IDENTITY; self.bones.len()];
		for index in self.tree_order() {
			let local = self.bones[index].local_transform();
			world[index] = match self.parent_of(index) {
				Some(parent) => world[parent] * local,
				None => local,
			};
		}
		world
	}

	fn parent_of(&self, index: usize) -> Option<usize> {
		let parent = usize::try_from(self.bones.get(index)?.parent_index).ok()?;
		(parent < self.bones.len() && parent != index).then_some(parent)
	}
}

/// Rename animation nodes whose hash matches a bone id; returns how many stayed unresolved.
///
/// Nodes with hash -1 are skipped. Unresolved nodes keep their placeholder name.
pub fn resolve_bone_names(anim: &mut AnimationData, skeleton: &Skeleton) -> usize {
	let mut unresolved = 0;
	for node in &mut anim.bones {
		if node.hash == -1 {
			continue;
		}
		match skeleton.name_for_id(node.hash as u32) {
			Some(name) => node.name = name.to_owned(),
			None => {
				unresolved += 1;
				warn!(node = %node.name, "{}", AssetError::UnresolvedBoneHash { hash: node.hash });
			}
		}
	}
	unresolved
}

#[cfg(test)]
mod tests;
