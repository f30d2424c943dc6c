use tracing::{debug, warn};

use crate::asset::compression::decode_bytes;
use crate::asset::{AssetError, Cursor, Endianness, NamedBlob, Result, TypedBlob};

const COUNT_OFFSET: usize = 0x16;
const TABLE_OFFSET: usize = 0x60;
const NAME_WIDTH: usize = 0x40;
const MAX_ENTRIES: u16 = 1000;

/// Reversible transform applied to package bytes at rest.
pub trait Cipher {
	/// Decrypt `bytes` in place.
	fn decrypt(&self, bytes: &mut [u8]);
}

/// Identity cipher for packages stored in the clear.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCipher;

impl Cipher for NoCipher {
	fn decrypt(&self, _bytes: &mut [u8]) {}
}

/// Repeating-key XOR keyed from the start of the buffer.
#[derive(Debug, Clone)]
pub struct XorCipher {
	key: Vec<u8>,
}

impl XorCipher {
	/// Create a cipher from a non-empty key; an empty key behaves like [`NoCipher`].
	pub fn new(key: impl Into<Vec<u8>>) -> Self {
		Self { key: key.into() }
	}
}

impl Cipher for XorCipher {
	fn decrypt(&self, bytes: &mut [u8]) {
		if self.key.is_empty() {
			return;
		}
		for (byte, key) in bytes.iter_mut().zip(self.key.iter().cycle()) {
			*byte ^= key;
		}
	}
}

/// One stored package entry, still compressed.
#[derive(Debug, Clone)]
pub struct PackageEntry {
	/// Stored entry name.
	pub name: String,
	/// Entry flags word as stored.
	pub flags: u32,
	/// Raw payload bytes.
	pub payload: Vec<u8>,
}

/// Indexed, optionally encrypted package of named blobs.
#[derive(Debug, Clone)]
pub struct PackageArchive {
	/// Whether the cipher had to be applied before the table parsed.
	pub decrypted: bool,
	entries: Vec<PackageEntry>,
}

impl PackageArchive {
	/// Parse a package, decrypting with `cipher` when the entry count looks implausible.
	pub fn parse(mut bytes: Vec<u8>, cipher: &dyn Cipher) -> Result<Self> {
		let mut decrypted = false;
		let mut count = entry_count(&bytes)?;

		if !plausible(count) {
			debug!(count, "package entry count implausible, decrypting");
			cipher.decrypt(&mut bytes);
			decrypted = true;
			count = entry_count(&bytes)?;
			if !plausible(count) {
				return Err(AssetError::ImplausibleEntryCount { count: u32::from(count) });
			}
		}

		let mut cursor = Cursor::new(&bytes, Endianness::Big);
		cursor.seek_to(TABLE_OFFSET)?;

		let mut entries = Vec::with_capacity(usize::from(count));
		for _ in 0..count {
			let name = cursor.read_fixed_string(NAME_WIDTH)?;
			let flags = cursor.read_u32()?;
			let length = cursor.read_u32()? as usize;
			let payload = cursor.read_bytes(length)?;
			cursor.align(0x10)?;
			entries.push(PackageEntry { name, flags, payload });
		}

		debug!(entries = entries.len(), decrypted, "package table parsed");
		Ok(Self { decrypted, entries })
	}

	/// Return stored entries in table order.
	pub fn entries(&self) -> &[PackageEntry] {
		&self.entries
	}

	/// Decompress every entry into a typed blob.
	pub fn extract(&self) -> Result<Vec<NamedBlob>> {
		let mut out = Vec::with_capacity(self.entries.len());
		for entry in &self.entries {
			let (compression, bytes) = decode_bytes(entry.payload.clone())?;
			if bytes.is_empty() {
				warn!(name = %entry.name, "package entry is empty");
			}
			out.push(NamedBlob {
				name: entry.name.clone(),
				compression,
				blob: TypedBlob::new(bytes),
			});
		}
		Ok(out)
	}
}

fn entry_count(bytes: &[u8]) -> Result<u16> {
	let mut cursor = Cursor::new(bytes, Endianness::Big);
	cursor.seek_to(COUNT_OFFSET)?;
	cursor.read_u16()
}

fn plausible(count: u16) -> bool {
	count > 0 && count <= MAX_ENTRIES
}
