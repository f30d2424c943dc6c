use std::path::PathBuf;

use assetdoc::asset::{ArchiveFile, BlobRegistry, Result};

use crate::cmd::util::{XorKey, cipher_for, emit_json, parse_hex_key};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Repeating XOR key (hex) for encrypted packages.
	#[arg(long, value_parser = parse_hex_key)]
	pub xor_key: Option<XorKey>,
	#[arg(long)]
	pub json: bool,
}

/// Print container kind and one line per entry.
pub fn run(args: Args) -> Result<()> {
	let Args { path, xor_key, json } = args;

	let cipher = cipher_for(xor_key);
	let archive = ArchiveFile::open(&path, cipher.as_ref())?;
	let registry = BlobRegistry::default();
	let blobs = archive.blobs()?;

	let entries: Vec<EntryJson> = blobs
		.iter()
		.enumerate()
		.map(|(index, named)| EntryJson {
			index,
			name: named.name.clone(),
			tag: named.blob.tag_label(),
			kind: registry.kind_of(&named.blob).as_str(),
			compression: named.compression.as_str(),
			length: named.blob.bytes.len(),
		})
		.collect();

	if json {
		return emit_json(&InfoJson {
			path: path.display().to_string(),
			container: archive.kind_label(),
			entry_count: archive.entry_count(),
			entries,
		});
	}

	println!("path: {}", path.display());
	println!("container: {}", archive.kind_label());
	println!("entries: {}", archive.entry_count());
	println!("index\tname\ttag\tkind\tcompression\tlength");
	for entry in entries {
		println!(
			"{}\t{}\t{}\t{}\t{}\t{}",
			entry.index, entry.name, entry.tag, entry.kind, entry.compression, entry.length
		);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct EntryJson {
	index: usize,
	name: String,
	tag: String,
	kind: &'static str,
	compression: &'static str,
	length: usize,
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	container: &'static str,
	entry_count: usize,
	entries: Vec<EntryJson>,
}
