use std::path::PathBuf;

use assetdoc::asset::{AnimationData, KeyGroup, KeyNode, Result, Skeleton, TrackGroupingOptions, decode_omo, decode_track_index, resolve_bone_names};

use crate::cmd::util::{emit_json, read_decoded};

#[derive(clap::Args)]
pub struct Args {
	/// `OMO ` animation, or the `BCA ` track index when `--bcl` is given.
	pub path: PathBuf,
	/// VBN skeleton used to name bones.
	#[arg(long)]
	pub skeleton: Option<PathBuf>,
	/// `BCL ` curve data paired with a `BCA ` index.
	#[arg(long)]
	pub bcl: Option<PathBuf>,
	/// Offset gap that separates bones in the curve data.
	#[arg(long)]
	pub gap: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

/// Decode an animation and print per-bone key counts.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		skeleton,
		bcl,
		gap,
		json,
	} = args;

	let skeleton = match &skeleton {
		Some(vbn) => Some(Skeleton::parse(&read_decoded(vbn)?)?),
		None => None,
	};

	let bytes = read_decoded(&path)?;
	let mut unresolved = 0;
	let anim = match &bcl {
		Some(curves) => {
			let mut options = TrackGroupingOptions::default();
			if let Some(gap) = gap {
				options.gap_threshold = gap;
			}
			decode_track_index(&bytes, &read_decoded(curves)?, skeleton.as_ref(), &options)?
		}
		None => {
			let mut anim = decode_omo(&bytes)?;
			if let Some(skeleton) = &skeleton {
				unresolved = resolve_bone_names(&mut anim, skeleton);
			}
			anim
		}
	};

	if json {
		return emit_json(&AnimJson::new(&path, &anim, unresolved));
	}

	println!("path: {}", path.display());
	println!("name: {}", anim.name);
	println!("frames: {}", anim.frame_count);
	println!("bones: {}", anim.bones.len());
	if skeleton.is_some() && bcl.is_none() {
		println!("unresolved: {unresolved}");
	}
	println!("index\thash\tname\trotation\tpos\trot\tscale");
	for bone in &anim.bones {
		println!(
			"{}\t0x{:08X}\t{}\t{}\t{}\t{}\t{}",
			bone.bone_index,
			bone.hash,
			bone.name,
			bone.rotation_type.as_str(),
			key_count(&[&bone.x_pos, &bone.y_pos, &bone.z_pos]),
			key_count(&[&bone.x_rot, &bone.y_rot, &bone.z_rot, &bone.w_rot]),
			key_count(&[&bone.x_scale, &bone.y_scale, &bone.z_scale]),
		);
	}
	Ok(())
}

fn key_count(groups: &[&KeyGroup]) -> usize {
	groups.iter().map(|group| group.keys().len()).max().unwrap_or(0)
}

#[derive(serde::Serialize)]
struct AnimJson {
	path: String,
	name: String,
	frame_count: u32,
	unresolved: usize,
	bones: Vec<BoneJson>,
}

impl AnimJson {
	fn new(path: &std::path::Path, anim: &AnimationData, unresolved: usize) -> Self {
		Self {
			path: path.display().to_string(),
			name: anim.name.clone(),
			frame_count: anim.frame_count,
			unresolved,
			bones: anim.bones.iter().map(BoneJson::from).collect(),
		}
	}
}

#[derive(serde::Serialize)]
struct BoneJson {
	name: String,
	hash: i32,
	bone_index: i32,
	rotation_type: &'static str,
	channels: Vec<ChannelJson>,
}

/// Non-empty curve as `[frame, value]` pairs.
#[derive(serde::Serialize)]
struct ChannelJson {
	channel: &'static str,
	keys: Vec<[f32; 2]>,
}

impl From<&KeyNode> for BoneJson {
	fn from(bone: &KeyNode) -> Self {
		let groups = [
			("x_pos", &bone.x_pos),
			("y_pos", &bone.y_pos),
			("z_pos", &bone.z_pos),
			("x_rot", &bone.x_rot),
			("y_rot", &bone.y_rot),
			("z_rot", &bone.z_rot),
			("w_rot", &bone.w_rot),
			("x_scale", &bone.x_scale),
			("y_scale", &bone.y_scale),
			("z_scale", &bone.z_scale),
		];
		Self {
			name: bone.name.clone(),
			hash: bone.hash,
			bone_index: bone.bone_index,
			rotation_type: bone.rotation_type.as_str(),
			channels: groups
				.into_iter()
				.filter(|(_, group)| group.has_animation())
				.map(|(channel, group)| ChannelJson {
					channel,
					keys: group.keys().iter().map(|key| [key.frame, key.value]).collect(),
				})
				.collect(),
		}
	}
}
