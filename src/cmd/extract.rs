use std::fs;
use std::path::PathBuf;

use assetdoc::asset::{ArchiveFile, BlobRegistry, Result};
use tracing::debug;

use crate::cmd::util::{XorKey, cipher_for, emit_json, parse_hex_key, tag_file_label};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub out: PathBuf,
	/// Repeating XOR key (hex) for encrypted packages.
	#[arg(long, value_parser = parse_hex_key)]
	pub xor_key: Option<XorKey>,
	#[arg(long)]
	pub json: bool,
}

/// Write each decompressed entry as `<index>_<tag>.bin` under `--out`.
pub fn run(args: Args) -> Result<()> {
	let Args { path, out, xor_key, json } = args;

	let cipher = cipher_for(xor_key);
	let archive = ArchiveFile::open(&path, cipher.as_ref())?;
	let registry = BlobRegistry::default();
	fs::create_dir_all(&out)?;

	let mut files = Vec::new();
	for (index, named) in archive.blobs()?.into_iter().enumerate() {
		let target = out.join(format!("{index}_{}.bin", tag_file_label(&named.blob.tag_label())));
		fs::write(&target, &named.blob.bytes)?;
		debug!(index, path = %target.display(), len = named.blob.bytes.len(), "entry written");
		files.push(FileJson {
			index,
			name: named.name,
			kind: registry.kind_of(&named.blob).as_str(),
			path: target.display().to_string(),
			length: named.blob.bytes.len(),
		});
	}

	if json {
		return emit_json(&ExtractJson {
			archive: path.display().to_string(),
			out: out.display().to_string(),
			files,
		});
	}

	println!("archive: {}", path.display());
	println!("written: {}", files.len());
	for file in files {
		println!("{}\t{}\t{}\t{}", file.index, file.kind, file.length, file.path);
	}
	Ok(())
}

#[derive(serde::Serialize)]
struct FileJson {
	index: usize,
	name: String,
	kind: &'static str,
	path: String,
	length: usize,
}

#[derive(serde::Serialize)]
struct ExtractJson {
	archive: String,
	out: String,
	files: Vec<FileJson>,
}
