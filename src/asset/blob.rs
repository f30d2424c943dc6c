use std::collections::HashMap;

use crate::asset::Compression;
use crate::asset::error::first4;

/// Decoder family a blob is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKind {
	/// Mesh/model data (passed through; not decoded here).
	Model,
	/// NUT texture container.
	Texture,
	/// VBN skeleton.
	Skeleton,
	/// Flag-driven (OMO) animation.
	FlagAnimation,
	/// Global-track-index animation, track table half.
	CurveIndex,
	/// Global-track-index animation, curve data half.
	CurveData,
	/// Unrecognized tag.
	Unknown,
}

impl BlobKind {
	/// Render kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Model => "model",
			Self::Texture => "texture",
			Self::Skeleton => "skeleton",
			Self::FlagAnimation => "flag_animation",
			Self::CurveIndex => "curve_index",
			Self::CurveData => "curve_data",
			Self::Unknown => "unknown",
		}
	}
}

/// Owned blob tagged by its four leading bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedBlob {
	/// First four bytes, zero-padded for short blobs.
	pub magic: [u8; 4],
	/// Full blob contents, magic included.
	pub bytes: Vec<u8>,
}

impl TypedBlob {
	/// Wrap bytes, sniffing the magic from their start.
	pub fn new(bytes: Vec<u8>) -> Self {
		Self {
			magic: first4(&bytes),
			bytes,
		}
	}

	/// Render the magic as a printable label.
	pub fn tag_label(&self) -> String {
		let mut out = String::new();
		for byte in self.magic {
			if byte.is_ascii_graphic() || byte == b' ' {
				out.push(char::from(byte));
			} else {
				out.push('.');
			}
		}
		out
	}
}

/// Decompressed sub-file with the name it was stored under.
#[derive(Debug, Clone)]
pub struct NamedBlob {
	/// Entry name (or decimal index for unnamed containers).
	pub name: String,
	/// Compression that was removed.
	pub compression: Compression,
	/// Decompressed blob.
	pub blob: TypedBlob,
}

/// Tag-to-kind lookup passed into extraction calls.
#[derive(Debug, Clone)]
pub struct BlobRegistry {
	kinds: HashMap<[u8; 4], BlobKind>,
}

impl Default for BlobRegistry {
	fn default() -> Self {
		let mut registry = Self::empty();
		for tag in [b"NDP3", b"NDWD"] {
			registry.register(*tag, BlobKind::Model);
		}
		for tag in [b"NTP3", b"NTWD", b"NTWU"] {
			registry.register(*tag, BlobKind::Texture);
		}
		registry.register(*b"VBN ", BlobKind::Skeleton);
		registry.register(*b" NBV", BlobKind::Skeleton);
		registry.register(*b"OMO ", BlobKind::FlagAnimation);
		registry.register(*b"BCA ", BlobKind::CurveIndex);
		registry.register(*b"BCL ", BlobKind::CurveData);
		registry
	}
}

impl BlobRegistry {
	/// Registry with no known tags.
	pub fn empty() -> Self {
		Self { kinds: HashMap::new() }
	}

	/// Map `tag` to `kind`, replacing any previous mapping.
	pub fn register(&mut self, tag: [u8; 4], kind: BlobKind) {
		self.kinds.insert(tag, kind);
	}

	/// Classify a blob by its magic.
	pub fn kind_of(&self, blob: &TypedBlob) -> BlobKind {
		self.kinds.get(&blob.magic).copied().unwrap_or(BlobKind::Unknown)
	}
}
