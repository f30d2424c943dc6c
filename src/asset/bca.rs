//! Global-track-index decoder.
//!
//! The index buffer lists tracks by hash; the curve buffer embeds those hashes somewhere
//! inside per-bone entries. Hash occurrences are clustered by proximity and each cluster is
//! assigned to the skeleton bone with the same sequential index. Only the default pose is
//! reconstructed: every emitted channel carries a single key at frame 0.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::asset::error::first4;
use crate::asset::{AnimationData, AssetError, Cursor, Endianness, KeyNode, Result, RotationType, Skeleton};

const TRACK_TABLE_OFFSET: usize = 0x28;
const TRACK_SIZE: usize = 24;
const FALLBACK_FRAME_COUNT: u32 = 100;
const MAX_FRAME_COUNT: i32 = 10_000;

/// Name given to every decoded track-index animation.
pub const BCA_ANIMATION_NAME: &str = "BCA_Animation";

/// Tunables for clustering hash occurrences into bones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackGroupingOptions {
	/// A byte gap larger than this between consecutive occurrences starts a new bone.
	pub gap_threshold: usize,
}

impl Default for TrackGroupingOptions {
	fn default() -> Self {
		Self { gap_threshold: 500 }
	}
}

/// One entry of the track index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
	/// Hash embedded in the curve buffer.
	pub hash: u32,
	/// Rest value of the channel.
	pub default_value: f32,
	/// Number of keys in the (undecoded) curve.
	pub key_count: u32,
	/// Channel selector.
	pub flags: u32,
}

/// Animated component selected by a track's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
	/// Rotation about X (radians).
	RotX,
	/// Rotation about Y.
	RotY,
	/// Rotation about Z.
	RotZ,
	/// Translation X.
	PosX,
	/// Translation Y.
	PosY,
	/// Translation Z.
	PosZ,
	/// Scale X.
	SclX,
	/// Scale Y.
	SclY,
	/// Scale Z.
	SclZ,
}

impl Channel {
	/// Map a flags word; `None` means static or unknown.
	pub fn from_flags(flags: u32) -> Option<Self> {
		Some(match flags {
			0x02 => Self::RotX,
			0x06 => Self::RotY,
			0x0A => Self::RotZ,
			0x0E => Self::PosX,
			0x12 => Self::PosY,
			0x16 => Self::PosZ,
			0x1A => Self::SclX,
			0x1E => Self::SclY,
			0x22 | 0x26 => Self::SclZ,
			_ => return None,
		})
	}

	fn apply(self, node: &mut KeyNode, value: f32) {
		let group = match self {
			Self::RotX => &mut node.x_rot,
			Self::RotY => &mut node.y_rot,
			Self::RotZ => &mut node.z_rot,
			Self::PosX => &mut node.x_pos,
			Self::PosY => &mut node.y_pos,
			Self::PosZ => &mut node.z_pos,
			Self::SclX => &mut node.x_scale,
			Self::SclY => &mut node.y_scale,
			Self::SclZ => &mut node.z_scale,
		};
		group.insert(0.0, value);
	}
}

/// Parsed track index.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackIndex {
	/// Frame count, or the fallback when the stored value is implausible.
	pub frame_count: u32,
	/// Tracks in file order.
	pub tracks: Vec<Track>,
}

impl TrackIndex {
	/// Parse a little-endian `BCA ` buffer.
	pub fn parse(bytes: &[u8]) -> Result<Self> {
		expect_magic(bytes, b"BCA ", "BCA")?;
		let mut cursor = Cursor::new(bytes, Endianness::Little);

		cursor.seek_to(0x08)?;
		let declared = cursor.read_i32()?;
		cursor.seek_to(0x18)?;
		let stored_frames = cursor.read_i32()?;
		let frame_count = if (1..=MAX_FRAME_COUNT).contains(&stored_frames) {
			stored_frames as u32
		} else {
			FALLBACK_FRAME_COUNT
		};

		let fits = bytes.len().saturating_sub(TRACK_TABLE_OFFSET) / TRACK_SIZE;
		let count = usize::try_from(declared).unwrap_or(0).min(fits);

		let mut tracks = Vec::with_capacity(count);
		for index in 0..count {
			cursor.seek_to(TRACK_TABLE_OFFSET + index * TRACK_SIZE)?;
			tracks.push(Track {
				hash: cursor.read_u32()?,
				default_value: cursor.read_f32()?,
				key_count: cursor.read_u32()?,
				flags: cursor.read_u32()?,
			});
		}

		Ok(Self { frame_count, tracks })
	}
}

/// Offsets of every 4-byte-aligned occurrence of a wanted hash, in ascending order.
pub fn scan_hash_occurrences(curves: &[u8], wanted: &HashSet<u32>) -> Vec<(u32, usize)> {
	curves
		.chunks_exact(4)
		.enumerate()
		.filter_map(|(slot, word)| {
			let value = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
			wanted.contains(&value).then_some((value, slot * 4))
		})
		.collect()
}

/// Split occurrences wherever the distance to the previous one exceeds the threshold.
///
/// Input is expected in scan order; out-of-order offsets are compared by absolute distance.
pub fn group_by_proximity(occurrences: &[(u32, usize)], options: &TrackGroupingOptions) -> Vec<Vec<(u32, usize)>> {
	let mut groups: Vec<Vec<(u32, usize)>> = Vec::new();
	for &hit in occurrences {
		match groups.last_mut() {
			Some(group) if group.last().is_some_and(|prev| hit.1.abs_diff(prev.1) <= options.gap_threshold) => group.push(hit),
			_ => groups.push(vec![hit]),
		}
	}
	groups
}

/// Decode a `BCA `/`BCL ` pair into default-pose channels.
///
/// Without a skeleton (or past its last bone) groups get `Bone_{i}` names and `hash = i`.
pub fn decode_track_index(index: &[u8], curves: &[u8], skeleton: Option<&Skeleton>, options: &TrackGroupingOptions) -> Result<AnimationData> {
	let parsed = TrackIndex::parse(index)?;
	expect_magic(curves, b"BCL ", "BCL")?;

	let wanted: HashSet<u32> = parsed.tracks.iter().map(|track| track.hash).collect();
	let by_hash: HashMap<u32, Track> = parsed.tracks.iter().map(|track| (track.hash, *track)).collect();

	let occurrences = scan_hash_occurrences(curves, &wanted);
	let groups = group_by_proximity(&occurrences, options);

	let mut anim = AnimationData::new(BCA_ANIMATION_NAME, parsed.frame_count);
	let bones = skeleton.map(Skeleton::bones).unwrap_or_default();

	for (bone_index, group) in groups.iter().enumerate() {
		let (name, hash) = match bones.get(bone_index) {
			Some(bone) => (bone.name.clone(), bone.bone_id as i32),
			None => (format!("Bone_{bone_index}"), bone_index as i32),
		};
		let mut node = euler_node(name, hash, bone_index as i32);

		for (hit_hash, _) in group {
			let Some(track) = by_hash.get(hit_hash) else {
				continue;
			};
			if let Some(channel) = Channel::from_flags(track.flags) {
				channel.apply(&mut node, track.default_value);
			}
		}

		if node.has_animation() {
			anim.bones.push(node);
		}
	}

	let mapped: HashSet<u32> = occurrences.iter().map(|(hash, _)| *hash).collect();
	let mut unmapped = 0_usize;
	for track in &parsed.tracks {
		if mapped.contains(&track.hash) || track.key_count == 0 {
			continue;
		}
		let Some(channel) = Channel::from_flags(track.flags) else {
			warn!(hash = track.hash, flags = track.flags, "unmapped static track skipped");
			continue;
		};
		let mut node = euler_node(format!("Unmapped_{unmapped}"), track.hash as i32, -1);
		channel.apply(&mut node, track.default_value);
		anim.bones.push(node);
		unmapped += 1;
	}
	if unmapped > 0 {
		warn!(unmapped, "tracks not found in curve data");
	}

	debug!(
		tracks = parsed.tracks.len(),
		groups = groups.len(),
		bones = anim.bones.len(),
		frames = parsed.frame_count,
		"track index decoded"
	);
	Ok(anim)
}

fn euler_node(name: String, hash: i32, bone_index: i32) -> KeyNode {
	let mut node = KeyNode::new(name);
	node.hash = hash;
	node.bone_index = bone_index;
	node.rotation_type = RotationType::Euler;
	node
}

fn expect_magic(bytes: &[u8], magic: &[u8; 4], expected: &'static str) -> Result<()> {
	let got = first4(bytes);
	if &got == magic {
		Ok(())
	} else {
		Err(AssetError::NotAContainer { expected, got })
	}
}
