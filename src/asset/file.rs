use std::fs;
use std::path::Path;

use crate::asset::compression::decode_bytes;
use crate::asset::{AssetError, Cipher, GarcArchive, NamedBlob, PackageArchive, Result, TypedBlob};

/// Container family detected for an opened archive.
pub enum Container {
	/// GARC container.
	Garc(GarcArchive),
	/// Named package.
	Package(PackageArchive),
}

/// Archive read from disk with its container parsed.
pub struct ArchiveFile {
	/// Parsed container.
	pub container: Container,
}

impl ArchiveFile {
	/// Read and parse an archive, falling back to the package format when no GARC magic is present.
	pub fn open(path: impl AsRef<Path>, cipher: &dyn Cipher) -> Result<Self> {
		let raw = fs::read(path)?;
		Self::from_bytes(raw, cipher)
	}

	/// Parse an archive already held in memory.
	pub fn from_bytes(raw: Vec<u8>, cipher: &dyn Cipher) -> Result<Self> {
		let container = if GarcArchive::sniff(&raw) {
			Container::Garc(GarcArchive::parse(raw)?)
		} else {
			Container::Package(PackageArchive::parse(raw, cipher)?)
		};
		Ok(Self { container })
	}

	/// Render the container family as a stable lowercase label.
	pub fn kind_label(&self) -> &'static str {
		match self.container {
			Container::Garc(_) => "garc",
			Container::Package(_) => "package",
		}
	}

	/// Return the number of stored entries.
	pub fn entry_count(&self) -> usize {
		match &self.container {
			Container::Garc(garc) => garc.entries().len(),
			Container::Package(package) => package.entries().len(),
		}
	}

	/// Decompress and return every sub-file; GARC entries are named by index.
	pub fn blobs(&self) -> Result<Vec<NamedBlob>> {
		match &self.container {
			Container::Garc(garc) => {
				let mut out = Vec::with_capacity(garc.entries().len());
				for (index, entry) in garc.entries().iter().enumerate() {
					let raw = garc.entry_bytes(index).ok_or_else(|| AssetError::CorruptStream {
						at: entry.byte_offset as usize,
						reason: format!("entry {index} outside container"),
					})?;
					let (compression, bytes) = decode_bytes(raw.to_vec())?;
					out.push(NamedBlob {
						name: index.to_string(),
						compression,
						blob: TypedBlob::new(bytes),
					});
				}
				Ok(out)
			}
			Container::Package(package) => package.extract(),
		}
	}
}
