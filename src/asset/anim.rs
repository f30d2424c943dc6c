use glam::{Quat, Vec3};

/// How a key blends toward the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
	/// Linear blend.
	#[default]
	Linear,
	/// Hold until the next key.
	Constant,
	/// Tangent-driven curve; sampled as a hold.
	Hermite,
	/// Hold until the next key.
	Step,
}

/// Whether a node's rotation groups hold Euler angles or quaternion components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationType {
	/// X/Y/Z radians; W is unused.
	Euler,
	/// X/Y/Z/W quaternion components.
	#[default]
	Quaternion,
}

impl RotationType {
	/// Render rotation type as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Euler => "euler",
			Self::Quaternion => "quaternion",
		}
	}
}

/// One sample of a scalar channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyFrame {
	/// Frame number.
	pub frame: f32,
	/// Channel value.
	pub value: f32,
	/// Incoming tangent.
	pub tangent_in: f32,
	/// Outgoing tangent.
	pub tangent_out: f32,
	/// Blend mode toward the next key.
	pub interpolation: Interpolation,
}

impl KeyFrame {
	/// Linear key with default tangents.
	pub fn new(frame: f32, value: f32) -> Self {
		Self {
			frame,
			value,
			tangent_in: 0.0,
			tangent_out: -1.0,
			interpolation: Interpolation::Linear,
		}
	}
}

/// Frame-sorted key list for one scalar channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyGroup {
	keys: Vec<KeyFrame>,
}

impl KeyGroup {
	/// Return keys in ascending frame order.
	pub fn keys(&self) -> &[KeyFrame] {
		&self.keys
	}

	/// Whether the channel carries any key.
	pub fn has_animation(&self) -> bool {
		!self.keys.is_empty()
	}

	/// Highest frame number present, or 0.
	pub fn frame_count(&self) -> f32 {
		self.keys.iter().fold(0.0, |acc, key| acc.max(key.frame))
	}

	/// Return the key at `frame`, inserting a default one in order when absent.
	pub fn key_frame_mut(&mut self, frame: f32) -> &mut KeyFrame {
		let at = self.keys.partition_point(|key| key.frame < frame);
		if self.keys.get(at).is_none_or(|key| key.frame != frame) {
			self.keys.insert(at, KeyFrame::new(frame, 0.0));
		}
		&mut self.keys[at]
	}

	/// Set the value at `frame`, overwriting any key already there.
	pub fn insert(&mut self, frame: f32, value: f32) {
		self.key_frame_mut(frame).value = value;
	}

	/// Keys surrounding `frame`: the last at-or-before and the first after.
	///
	/// Before the first key both sides are the first key; past the last both are the last key.
	pub fn bracket(&self, frame: f32) -> Option<(KeyFrame, KeyFrame)> {
		let first = *self.keys.first()?;
		let after = self.keys.partition_point(|key| key.frame <= frame);
		let left = if after == 0 { first } else { self.keys[after - 1] };
		let right = self.keys.get(after).copied().unwrap_or(left);
		Some((left, right))
	}

	/// Sample the channel at `frame`; an empty channel samples as 0.
	pub fn value_at(&self, frame: f32) -> f32 {
		let Some((left, right)) = self.bracket(frame) else {
			return 0.0;
		};
		match left.interpolation {
			Interpolation::Linear => lerp(left, right, frame),
			Interpolation::Constant | Interpolation::Step | Interpolation::Hermite => left.value,
		}
	}
}

fn lerp(left: KeyFrame, right: KeyFrame, frame: f32) -> f32 {
	if left.frame == right.frame || frame == left.frame {
		return left.value;
	}
	if frame == right.frame {
		return right.value;
	}
	let mu = (frame - left.frame) / (right.frame - left.frame);
	left.value * (1.0 - mu) + right.value * mu
}

/// One bone's full curve set.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyNode {
	/// Bone name, or a placeholder derived from the hash.
	pub name: String,
	/// Bone hash; -1 means none.
	pub hash: i32,
	/// Skeleton bone index; -1 means unmapped.
	pub bone_index: i32,
	/// Position X.
	pub x_pos: KeyGroup,
	/// Position Y.
	pub y_pos: KeyGroup,
	/// Position Z.
	pub z_pos: KeyGroup,
	/// Meaning of the rotation groups.
	pub rotation_type: RotationType,
	/// Rotation X.
	pub x_rot: KeyGroup,
	/// Rotation Y.
	pub y_rot: KeyGroup,
	/// Rotation Z.
	pub z_rot: KeyGroup,
	/// Rotation W (quaternion only).
	pub w_rot: KeyGroup,
	/// Scale X.
	pub x_scale: KeyGroup,
	/// Scale Y.
	pub y_scale: KeyGroup,
	/// Scale Z.
	pub z_scale: KeyGroup,
}

impl KeyNode {
	/// Empty node with no hash and no bone index.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			hash: -1,
			bone_index: -1,
			x_pos: KeyGroup::default(),
			y_pos: KeyGroup::default(),
			z_pos: KeyGroup::default(),
			rotation_type: RotationType::Quaternion,
			x_rot: KeyGroup::default(),
			y_rot: KeyGroup::default(),
			z_rot: KeyGroup::default(),
			w_rot: KeyGroup::default(),
			x_scale: KeyGroup::default(),
			y_scale: KeyGroup::default(),
			z_scale: KeyGroup::default(),
		}
	}

	/// Whether any position channel has keys.
	pub fn has_position_animation(&self) -> bool {
		self.x_pos.has_animation() || self.y_pos.has_animation() || self.z_pos.has_animation()
	}

	/// Whether any rotation channel has keys.
	pub fn has_rotation_animation(&self) -> bool {
		self.x_rot.has_animation() || self.y_rot.has_animation() || self.z_rot.has_animation()
	}

	/// Whether any scale channel has keys.
	pub fn has_scale_animation(&self) -> bool {
		self.x_scale.has_animation() || self.y_scale.has_animation() || self.z_scale.has_animation()
	}

	/// Whether the node carries any channel at all.
	pub fn has_animation(&self) -> bool {
		self.has_position_animation() || self.has_rotation_animation() || self.has_scale_animation()
	}

	/// Append one position sample.
	pub fn push_position(&mut self, frame: f32, value: [f32; 3]) {
		self.x_pos.insert(frame, value[0]);
		self.y_pos.insert(frame, value[1]);
		self.z_pos.insert(frame, value[2]);
	}

	/// Append one quaternion sample.
	pub fn push_rotation(&mut self, frame: f32, value: Quat) {
		self.rotation_type = RotationType::Quaternion;
		self.x_rot.insert(frame, value.x);
		self.y_rot.insert(frame, value.y);
		self.z_rot.insert(frame, value.z);
		self.w_rot.insert(frame, value.w);
	}

	/// Append one scale sample.
	pub fn push_scale(&mut self, frame: f32, value: [f32; 3]) {
		self.x_scale.insert(frame, value[0]);
		self.y_scale.insert(frame, value[1]);
		self.z_scale.insert(frame, value[2]);
	}

	/// Sample position; missing channels are 0.
	pub fn position_at(&self, frame: f32) -> Vec3 {
		Vec3::new(sample_or(&self.x_pos, frame, 0.0), sample_or(&self.y_pos, frame, 0.0), sample_or(&self.z_pos, frame, 0.0))
	}

	/// Sample scale; missing channels are 1.
	pub fn scale_at(&self, frame: f32) -> Vec3 {
		Vec3::new(sample_or(&self.x_scale, frame, 1.0), sample_or(&self.y_scale, frame, 1.0), sample_or(&self.z_scale, frame, 1.0))
	}

	/// Sample rotation as a quaternion.
	///
	/// Quaternion channels slerp between the bracketing keys; Euler channels compose `Z * Y * X`.
	pub fn rotation_at(&self, frame: f32) -> Quat {
		match self.rotation_type {
			RotationType::Euler => {
				let x = sample_or(&self.x_rot, frame, 0.0);
				let y = sample_or(&self.y_rot, frame, 0.0);
				let z = sample_or(&self.z_rot, frame, 0.0);
				Quat::from_rotation_z(z) * Quat::from_rotation_y(y) * Quat::from_rotation_x(x)
			}
			RotationType::Quaternion => {
				let Some((left, right)) = self.x_rot.bracket(frame) else {
					return Quat::IDENTITY;
				};
				let q1 = self.quat_at_key(left.frame);
				let q2 = self.quat_at_key(right.frame);
				if (left.frame - frame).abs() < 0.001 {
					return q1;
				}
				if (right.frame - frame).abs() < 0.001 {
					return q2;
				}
				let t = (frame - left.frame) / (right.frame - left.frame);
				q1.slerp(q2, t)
			}
		}
	}

	fn quat_at_key(&self, frame: f32) -> Quat {
		let component = |group: &KeyGroup| group.bracket(frame).map_or(0.0, |(left, _)| left.value);
		Quat::from_xyzw(component(&self.x_rot), component(&self.y_rot), component(&self.z_rot), component(&self.w_rot))
	}
}

fn sample_or(group: &KeyGroup, frame: f32, fallback: f32) -> f32 {
	if group.has_animation() { group.value_at(frame) } else { fallback }
}

/// Decoded animation handed to exporters.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationData {
	/// Animation name.
	pub name: String,
	/// Number of frames.
	pub frame_count: u32,
	/// Per-bone curve sets.
	pub bones: Vec<KeyNode>,
}

impl AnimationData {
	/// Empty animation.
	pub fn new(name: impl Into<String>, frame_count: u32) -> Self {
		Self {
			name: name.into(),
			frame_count,
			bones: Vec::new(),
		}
	}

	/// Find a node by name.
	pub fn bone_by_name(&self, name: &str) -> Option<&KeyNode> {
		self.bones.iter().find(|bone| bone.name == name)
	}

	/// Find a node by hash.
	pub fn bone_by_hash(&self, hash: i32) -> Option<&KeyNode> {
		self.bones.iter().find(|bone| bone.hash == hash)
	}

	/// Find a node by skeleton bone index.
	pub fn bone_by_index(&self, index: i32) -> Option<&KeyNode> {
		self.bones.iter().find(|bone| bone.bone_index == index)
	}
}

#[cfg(test)]
mod tests;
