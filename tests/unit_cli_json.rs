#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use assetdoc_testkit::{BcaTrack, NutTexture, OmoNode, VbnBone, bca, bcl, be_floats, dxt1_block, garc, lz11_compress, nut_linear, omo, package, scratch_dir, vbn, xor_in_place, zlib};
use serde_json::Value;

fn nut_bytes() -> Vec<u8> {
	nut_linear(
		true,
		&[NutTexture {
			format: 0x00,
			width: 4,
			height: 4,
			mips: vec![dxt1_block(0xF800, 0x001F, 0).to_vec()],
			hash_id: 0x4000_0001,
		}],
	)
}

fn omo_bytes() -> Vec<u8> {
	let node = OmoNode {
		flags: [0x01, 0x20, 0x00, 0x00],
		hash: 0x55,
		base: be_floats(&[1.0, 2.0, 3.0]),
		frame_key: 0,
	};
	omo(&[node], 4, &[Vec::new(), Vec::new()])
}

fn vbn_bytes() -> Vec<u8> {
	vbn(&[VbnBone {
		name: "Root".to_owned(),
		parent: -1,
		id: 0x55,
		position: [0.0; 3],
		rotation: [0.0; 3],
		scale: [1.0; 3],
	}])
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
	let path = dir.join(name);
	fs::write(&path, bytes).expect("write fixture");
	path
}

#[test]
fn info_json_lists_garc_entries() {
	let dir = scratch_dir("cli-info");
	let archive = write(&dir, "bundle.garc", &garc(&[vec![lz11_compress(&nut_bytes())], vec![zlib(&omo_bytes())]]));

	let json = run_json(vec!["info".to_owned(), arg(&archive), "--json".to_owned()]);
	assert_eq!(json["container"], "garc");
	assert_eq!(json["entry_count"], 2);
	assert_eq!(json["entries"][0]["kind"], "texture");
	assert_eq!(json["entries"][0]["compression"], "lz11");
	assert_eq!(json["entries"][1]["tag"], "OMO ");
	assert_eq!(json["entries"][1]["compression"], "zlib");
}

#[test]
fn extract_json_writes_decrypted_package_entries() {
	let dir = scratch_dir("cli-extract");
	let mut raw = package(&[("body.vbn", vbn_bytes()), ("wait.omo", lz11_compress(&omo_bytes()))]);
	xor_in_place(&mut raw, &[0x12, 0x34]);
	let archive = write(&dir, "fighter.pac", &raw);
	let out = dir.join("out");

	let json = run_json(vec![
		"extract".to_owned(),
		arg(&archive),
		"--out".to_owned(),
		arg(&out),
		"--xor-key".to_owned(),
		"0x1234".to_owned(),
		"--json".to_owned(),
	]);
	let files = json["files"].as_array().expect("files array");
	assert_eq!(files.len(), 2);
	assert_eq!(files[0]["name"], "body.vbn");
	assert_eq!(files[0]["kind"], "skeleton");
	assert_eq!(files[1]["kind"], "flag_animation");

	let written = fs::read(out.join("1_OMO.bin")).expect("entry written");
	assert_eq!(written, omo_bytes());
}

#[test]
fn info_json_accepts_xor_key_for_packages() {
	let dir = scratch_dir("cli-info-xor");
	let mut raw = package(&[("body.vbn", vbn_bytes())]);
	xor_in_place(&mut raw, &[0xA5, 0x5A]);
	let archive = write(&dir, "fighter.pac", &raw);

	let json = run_json(vec!["info".to_owned(), arg(&archive), "--xor-key".to_owned(), "a55a".to_owned(), "--json".to_owned()]);
	assert_eq!(json["container"], "package");
	assert_eq!(json["entry_count"], 1);
	assert_eq!(json["entries"][0]["kind"], "skeleton");
}

#[test]
fn texture_json_reports_descriptor_and_first_pixel() {
	let dir = scratch_dir("cli-texture");
	let nut = write(&dir, "tex.nut", &lz11_compress(&nut_bytes()));
	let raw_out = dir.join("tex.rgba");

	let json = run_json(vec!["texture".to_owned(), arg(&nut), "--raw-out".to_owned(), arg(&raw_out), "--json".to_owned()]);
	assert_eq!(json["variant"], "NTWD");
	assert_eq!(json["texture_count"], 1);
	assert_eq!(json["descriptor"]["format"], "dxt1");
	assert_eq!(json["descriptor"]["hash_id"], 0x4000_0001_u32);
	assert_eq!(json["descriptor"]["tiling"], "linear");
	assert_eq!(json["decoded"]["rgba_len"], 64);
	assert_eq!(json["decoded"]["first_pixel"], serde_json::json!([255, 0, 0, 255]));
	assert_eq!(fs::read(raw_out).expect("raw output").len(), 64);
}

#[test]
fn anim_json_names_bones_from_skeleton() {
	let dir = scratch_dir("cli-anim");
	let anim = write(&dir, "wait.omo", &omo_bytes());
	let skeleton = write(&dir, "body.vbn", &vbn_bytes());

	let json = run_json(vec!["anim".to_owned(), arg(&anim), "--skeleton".to_owned(), arg(&skeleton), "--json".to_owned()]);
	assert_eq!(json["name"], "Anim");
	assert_eq!(json["frame_count"], 2);
	assert_eq!(json["unresolved"], 0);
	let bone = &json["bones"][0];
	assert_eq!(bone["name"], "Root");
	assert_eq!(bone["channels"][0]["channel"], "x_pos");
	assert_eq!(bone["channels"][0]["keys"], serde_json::json!([[0.0, 1.0], [1.0, 1.0]]));
}

#[test]
fn anim_json_groups_curve_tracks() {
	let dir = scratch_dir("cli-bca");
	let index = write(
		&dir,
		"wait.bca",
		&bca(
			12,
			&[BcaTrack {
				hash: 0xABCD,
				value: 0.5,
				keys: 1,
				flags: 0x16,
			}],
		),
	);
	let curves = write(&dir, "wait.bcl", &bcl(&[(16, 0xABCD)]));

	let json = run_json(vec!["anim".to_owned(), arg(&index), "--bcl".to_owned(), arg(&curves), "--json".to_owned()]);
	assert_eq!(json["name"], "BCA_Animation");
	assert_eq!(json["frame_count"], 12);
	assert_eq!(json["bones"][0]["name"], "Bone_0");
	assert_eq!(json["bones"][0]["rotation_type"], "euler");
	assert_eq!(json["bones"][0]["channels"][0]["channel"], "z_pos");
}

#[test]
fn unreadable_input_exits_nonzero() {
	let dir = scratch_dir("cli-error");
	let bogus = write(&dir, "bogus.nut", b"NOPE");
	let output = run(vec!["texture".to_owned(), arg(&bogus)]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

fn arg(path: &Path) -> String {
	path.display().to_string()
}

fn run(args: Vec<String>) -> Output {
	Command::new(env!("CARGO_BIN_EXE_assetdoc")).args(&args).output().expect("command executes")
}

fn run_json(args: Vec<String>) -> Value {
	let output = run(args);
	assert!(output.status.success(), "command should succeed: {}", String::from_utf8_lossy(&output.stderr));
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}
