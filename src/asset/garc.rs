use tracing::debug;

use crate::asset::error::first4;
use crate::asset::{AssetError, Cursor, Endianness, Result};

/// Leading magic of a GARC container as stored on disk.
pub const GARC_MAGIC: [u8; 4] = *b"CRAG";
const FATO_MAGIC: [u8; 4] = *b"OTAF";
const TABLE_HEADER_SIZE: usize = 0xC;

/// Location of one sub-file inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveEntry {
	/// Absolute byte offset of the sub-file.
	pub byte_offset: u64,
	/// Sub-file length in bytes.
	pub length: u32,
}

/// Fixed GARC header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GarcHeader {
	/// Header length; the FATO table starts here.
	pub header_length: u32,
	/// Byte-order marker as stored.
	pub endian_marker: u16,
	/// Container version.
	pub version: u16,
	/// Number of sections.
	pub section_count: u32,
	/// Start of the data section that entry offsets are relative to.
	pub data_offset: u32,
	/// Declared total decompressed length.
	pub decompressed_length: u32,
	/// Declared total compressed length.
	pub compressed_length: u32,
}

/// Parsed GARC container holding its backing bytes.
pub struct GarcArchive {
	/// Parsed header.
	pub header: GarcHeader,
	entries: Vec<ArchiveEntry>,
	bytes: Vec<u8>,
}

impl GarcArchive {
	/// Return whether `raw` starts with the GARC magic.
	pub fn sniff(raw: &[u8]) -> bool {
		raw.starts_with(&GARC_MAGIC)
	}

	/// Parse the header and the FATO/FATB index.
	pub fn parse(bytes: Vec<u8>) -> Result<Self> {
		let (header, entries) = parse_index(&bytes)?;
		debug!(entries = entries.len(), version = header.version, "garc index parsed");
		Ok(Self { header, entries, bytes })
	}

	/// Return all entries in index order, then bit order within each index.
	pub fn entries(&self) -> &[ArchiveEntry] {
		&self.entries
	}

	/// Return the raw bytes backing this container.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Borrow the bytes of entry `index`.
	pub fn entry_bytes(&self, index: usize) -> Option<&[u8]> {
		let entry = self.entries.get(index)?;
		let start = entry.byte_offset as usize;
		self.bytes.get(start..start + entry.length as usize)
	}
}

fn parse_index(bytes: &[u8]) -> Result<(GarcHeader, Vec<ArchiveEntry>)> {
	let mut cursor = Cursor::new(bytes, Endianness::Little);
	let magic = cursor.read_code4().map_err(|_| AssetError::NotAContainer {
		expected: "GARC",
		got: first4(bytes),
	})?;
	if magic != GARC_MAGIC {
		return Err(AssetError::NotAContainer { expected: "GARC", got: magic });
	}

	let header = GarcHeader {
		header_length: cursor.read_u32()?,
		endian_marker: cursor.read_u16()?,
		version: cursor.read_u16()?,
		section_count: cursor.read_u32()?,
		data_offset: cursor.read_u32()?,
		decompressed_length: cursor.read_u32()?,
		compressed_length: cursor.read_u32()?,
	};

	let fato_start = header.header_length as usize;
	cursor.seek_to(fato_start)?;
	let tag = cursor.read_code4()?;
	if tag != FATO_MAGIC {
		return Err(AssetError::BadTag {
			expected: FATO_MAGIC,
			got: tag,
			at: fato_start,
		});
	}
	let fato_length = cursor.read_u32()? as usize;
	let index_count = cursor.read_u16()?;
	cursor.skip(2)?;

	let fatb_start = fato_start + fato_length;
	let mut entries = Vec::new();

	for index in 0..usize::from(index_count) {
		cursor.seek_to(fato_start + TABLE_HEADER_SIZE + index * 4)?;
		let fatb_rel = cursor.read_u32()? as usize;

		cursor.seek_to(fatb_start + TABLE_HEADER_SIZE + fatb_rel)?;
		let flags = cursor.read_u32()?;

		for bit in 0..32 {
			if flags & (1 << bit) == 0 {
				continue;
			}
			let start = cursor.read_u32()?;
			let _end = cursor.read_u32()?;
			let length = cursor.read_u32()?;

			let byte_offset = u64::from(start) + u64::from(header.data_offset);
			if byte_offset + u64::from(length) > bytes.len() as u64 {
				return Err(AssetError::CorruptStream {
					at: cursor.pos(),
					reason: format!("entry {index}.{bit} spans {byte_offset}+{length} beyond container of {} bytes", bytes.len()),
				});
			}
			entries.push(ArchiveEntry { byte_offset, length });
		}
	}

	Ok((header, entries))
}
