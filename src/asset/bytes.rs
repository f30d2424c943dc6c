use std::ops::{Deref, DerefMut};

use crate::asset::{AssetError, Result};

/// Byte order used for multi-byte reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
	/// Least significant byte first.
	Little,
	/// Most significant byte first.
	Big,
}

impl Endianness {
	/// Render byte order as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Little => "little",
			Self::Big => "big",
		}
	}
}

/// Reference point for [`Cursor::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekFrom {
	/// Offset from the start of the buffer.
	Begin(i64),
	/// Offset from the current position.
	Current(i64),
	/// Offset from the end of the buffer.
	End(i64),
}

macro_rules! read_num {
	($(#[$doc:meta] $name:ident => $ty:ty),* $(,)?) => {
		$(
			#[$doc]
			pub fn $name(&mut self) -> Result<$ty> {
				let mut buf = [0_u8; size_of::<$ty>()];
				buf.copy_from_slice(self.read_exact(size_of::<$ty>())?);
				Ok(match self.endianness {
					Endianness::Little => <$ty>::from_le_bytes(buf),
					Endianness::Big => <$ty>::from_be_bytes(buf),
				})
			}
		)*
	};
}

/// Bounded, endian-aware cursor over an immutable byte slice.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
	endianness: Endianness,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at position 0.
	pub fn new(bytes: &'a [u8], endianness: Endianness) -> Self {
		Self { bytes, pos: 0, endianness }
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return total buffer length.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Return whether the underlying buffer is empty.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Return the active byte order.
	pub fn endianness(&self) -> Endianness {
		self.endianness
	}

	/// Switch byte order for subsequent reads.
	pub fn set_endianness(&mut self, endianness: Endianness) {
		self.endianness = endianness;
	}

	/// Return the whole backing buffer.
	pub fn bytes(&self) -> &'a [u8] {
		self.bytes
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(AssetError::TruncatedData {
				at: self.pos,
				need: n,
				rem: self.remaining(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read `n` bytes into an owned buffer.
	pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
		Ok(self.read_exact(n)?.to_vec())
	}

	/// Read a four-byte tag.
	pub fn read_code4(&mut self) -> Result<[u8; 4]> {
		let raw = self.read_exact(4)?;
		let mut out = [0_u8; 4];
		out.copy_from_slice(raw);
		Ok(out)
	}

	/// Read one unsigned byte.
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.read_exact(1)?[0])
	}

	/// Read one signed byte.
	pub fn read_i8(&mut self) -> Result<i8> {
		Ok(self.read_u8()? as i8)
	}

	read_num! {
		/// Read a `u16` in the cursor's byte order.
		read_u16 => u16,
		/// Read an `i16` in the cursor's byte order.
		read_i16 => i16,
		/// Read a `u32` in the cursor's byte order.
		read_u32 => u32,
		/// Read an `i32` in the cursor's byte order.
		read_i32 => i32,
		/// Read a `u64` in the cursor's byte order.
		read_u64 => u64,
		/// Read an `i64` in the cursor's byte order.
		read_i64 => i64,
		/// Read an `f32` in the cursor's byte order.
		read_f32 => f32,
		/// Read an `f64` in the cursor's byte order.
		read_f64 => f64,
	}

	/// Read three consecutive `f32` values.
	pub fn read_vec3(&mut self) -> Result<[f32; 3]> {
		Ok([self.read_f32()?, self.read_f32()?, self.read_f32()?])
	}

	/// Advance by `n` bytes without inspecting them.
	pub fn skip(&mut self, n: usize) -> Result<()> {
		let _ = self.read_exact(n)?;
		Ok(())
	}

	/// Advance to the next multiple of `n` measured from the start of the buffer.
	pub fn align(&mut self, n: usize) -> Result<()> {
		if n == 0 {
			return Ok(());
		}
		let pad = (n - self.pos % n) % n;
		self.skip(pad)
	}

	/// Move to a new position; the target must lie within `0..=len`.
	pub fn seek(&mut self, target: SeekFrom) -> Result<usize> {
		let len = self.bytes.len();
		let absolute = match target {
			SeekFrom::Begin(off) => off,
			SeekFrom::Current(off) => self.pos as i64 + off,
			SeekFrom::End(off) => len as i64 + off,
		};
		if absolute < 0 || absolute > len as i64 {
			return Err(AssetError::SeekOutOfRange { target: absolute, len });
		}
		self.pos = absolute as usize;
		Ok(self.pos)
	}

	/// Seek to an absolute offset from the start of the buffer.
	pub fn seek_to(&mut self, pos: usize) -> Result<()> {
		self.seek(SeekFrom::Begin(pos as i64)).map(|_| ())
	}

	/// Seek to `pos` and return a guard that restores the current position when dropped.
	pub fn temp_seek(&mut self, pos: usize) -> Result<TempSeek<'_, 'a>> {
		let saved = self.pos;
		self.seek_to(pos)?;
		Ok(TempSeek { cursor: self, saved })
	}

	/// Read a NUL-terminated string stored in a fixed-width field, consuming the whole field.
	pub fn read_fixed_string(&mut self, width: usize) -> Result<String> {
		let raw = self.read_exact(width)?;
		let end = raw.iter().position(|byte| *byte == 0).unwrap_or(raw.len());
		Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
	}
}

/// Scoped detour returned by [`Cursor::temp_seek`].
///
/// Derefs to the borrowed cursor; the original position is restored on drop, including
/// when the detour ends early through `?`.
pub struct TempSeek<'c, 'a> {
	cursor: &'c mut Cursor<'a>,
	saved: usize,
}

impl<'a> Deref for TempSeek<'_, 'a> {
	type Target = Cursor<'a>;

	fn deref(&self) -> &Self::Target {
		self.cursor
	}
}

impl DerefMut for TempSeek<'_, '_> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		self.cursor
	}
}

impl Drop for TempSeek<'_, '_> {
	fn drop(&mut self) {
		self.cursor.pos = self.saved;
	}
}

macro_rules! write_num {
	($(#[$doc:meta] $name:ident => $ty:ty),* $(,)?) => {
		$(
			#[$doc]
			pub fn $name(&mut self, value: $ty) -> &mut Self {
				match self.endianness {
					Endianness::Little => self.bytes.extend_from_slice(&value.to_le_bytes()),
					Endianness::Big => self.bytes.extend_from_slice(&value.to_be_bytes()),
				}
				self
			}
		)*
	};
}

/// Growable, endian-aware byte writer.
#[derive(Debug, Clone)]
pub struct Writer {
	bytes: Vec<u8>,
	endianness: Endianness,
}

impl Writer {
	/// Create an empty writer.
	pub fn new(endianness: Endianness) -> Self {
		Self {
			bytes: Vec::new(),
			endianness,
		}
	}

	/// Return current length, which is also the write position.
	pub fn pos(&self) -> usize {
		self.bytes.len()
	}

	/// Append raw bytes.
	pub fn write_bytes(&mut self, raw: &[u8]) -> &mut Self {
		self.bytes.extend_from_slice(raw);
		self
	}

	/// Append one byte.
	pub fn write_u8(&mut self, value: u8) -> &mut Self {
		self.bytes.push(value);
		self
	}

	write_num! {
		/// Append a `u16`.
		write_u16 => u16,
		/// Append an `i16`.
		write_i16 => i16,
		/// Append a `u32`.
		write_u32 => u32,
		/// Append an `i32`.
		write_i32 => i32,
		/// Append a `u64`.
		write_u64 => u64,
		/// Append an `f32`.
		write_f32 => f32,
	}

	/// Append `value` into a fixed-width NUL-padded field, truncating if needed.
	pub fn write_fixed_string(&mut self, value: &str, width: usize) -> &mut Self {
		let raw = value.as_bytes();
		let take = raw.len().min(width);
		self.bytes.extend_from_slice(&raw[..take]);
		self.bytes.resize(self.bytes.len() + (width - take), 0);
		self
	}

	/// Pad with zeros to the next multiple of `n`.
	pub fn align(&mut self, n: usize) -> &mut Self {
		if n > 0 {
			let pad = (n - self.bytes.len() % n) % n;
			self.bytes.resize(self.bytes.len() + pad, 0);
		}
		self
	}

	/// Pad with zeros until the length reaches `pos`.
	pub fn pad_to(&mut self, pos: usize) -> &mut Self {
		if self.bytes.len() < pos {
			self.bytes.resize(pos, 0);
		}
		self
	}

	/// Overwrite a previously written `u32` at `pos`.
	pub fn patch_u32(&mut self, pos: usize, value: u32) -> &mut Self {
		let raw = match self.endianness {
			Endianness::Little => value.to_le_bytes(),
			Endianness::Big => value.to_be_bytes(),
		};
		if let Some(slot) = self.bytes.get_mut(pos..pos + 4) {
			slot.copy_from_slice(&raw);
		}
		self
	}

	/// Consume the writer and return its bytes.
	pub fn into_bytes(self) -> Vec<u8> {
		self.bytes
	}
}

#[cfg(test)]
mod tests;
