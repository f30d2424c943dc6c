//! Shared test helpers: in-memory builders for every container and asset format.
//!
//! Builders emit bytes only; nothing here depends on the decoding crate.

use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::ZlibEncoder;

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Fresh, empty directory under the target dir for one test's files.
pub fn scratch_dir(name: &str) -> PathBuf {
	let dir = target_dir().join("assetdoc-fixtures").join(name);
	if dir.exists() {
		std::fs::remove_dir_all(&dir).expect("clear scratch dir");
	}
	std::fs::create_dir_all(&dir).expect("create scratch dir");
	dir
}

/// Minimal byte sink with a fixed byte order.
#[derive(Debug, Clone, Default)]
pub struct Bytes {
	/// Written bytes.
	pub buf: Vec<u8>,
	big: bool,
}

impl Bytes {
	/// Big-endian sink.
	pub fn be() -> Self {
		Self { buf: Vec::new(), big: true }
	}

	/// Little-endian sink.
	pub fn le() -> Self {
		Self { buf: Vec::new(), big: false }
	}

	/// Current length.
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	/// Whether nothing was written.
	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	/// Append raw bytes.
	pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
		self.buf.extend_from_slice(bytes);
		self
	}

	/// Append a `u16`.
	pub fn u16(&mut self, value: u16) -> &mut Self {
		let bytes = if self.big { value.to_be_bytes() } else { value.to_le_bytes() };
		self.raw(&bytes)
	}

	/// Append a `u32`.
	pub fn u32(&mut self, value: u32) -> &mut Self {
		let bytes = if self.big { value.to_be_bytes() } else { value.to_le_bytes() };
		self.raw(&bytes)
	}

	/// Append an `i32`.
	pub fn i32(&mut self, value: i32) -> &mut Self {
		self.u32(value as u32)
	}

	/// Append an `f32`.
	pub fn f32(&mut self, value: f32) -> &mut Self {
		self.u32(value.to_bits())
	}

	/// Append three `f32`s.
	pub fn vec3(&mut self, value: [f32; 3]) -> &mut Self {
		self.f32(value[0]).f32(value[1]).f32(value[2])
	}

	/// Zero-fill up to absolute position `pos`.
	pub fn pad_to(&mut self, pos: usize) -> &mut Self {
		if self.buf.len() < pos {
			self.buf.resize(pos, 0);
		}
		self
	}

	/// Zero-fill to the next multiple of `n`.
	pub fn align(&mut self, n: usize) -> &mut Self {
		let pos = self.buf.len().next_multiple_of(n);
		self.pad_to(pos)
	}

	/// NUL-padded fixed-width string.
	pub fn fixed_str(&mut self, value: &str, width: usize) -> &mut Self {
		let take = value.len().min(width);
		let start = self.buf.len();
		self.raw(&value.as_bytes()[..take]);
		self.pad_to(start + width)
	}
}

/// Build a little-endian GARC container; each group becomes one index word with one bit per file.
pub fn garc(groups: &[Vec<Vec<u8>>]) -> Vec<u8> {
	let fato_length = 0xC + 4 * groups.len();
	let fatb_start = 0x1C + fato_length;
	let fatb_body: usize = groups.iter().map(|files| 4 + 12 * files.len()).sum();
	let data_offset = fatb_start + 0xC + fatb_body;
	let data_len: usize = groups.iter().flatten().map(Vec::len).sum();

	let mut out = Bytes::le();
	out.raw(b"CRAG").u32(0x1C).u16(0xFEFF).u16(0x0400).u32(4);
	out.u32(data_offset as u32).u32(data_len as u32).u32(data_len as u32);

	out.raw(b"OTAF").u32(fato_length as u32).u16(groups.len() as u16).u16(0xFFFF);
	let mut rel = 0;
	for files in groups {
		out.u32(rel as u32);
		rel += 4 + 12 * files.len();
	}

	out.raw(b"BTAF").u32((0xC + fatb_body) as u32).u32(groups.len() as u32);
	let mut start = 0;
	for files in groups {
		assert!(files.len() <= 32, "one index word holds at most 32 files");
		let mask = if files.len() == 32 { u32::MAX } else { (1_u32 << files.len()) - 1 };
		out.u32(mask);
		for file in files {
			out.u32(start as u32).u32((start + file.len()) as u32).u32(file.len() as u32);
			start += file.len();
		}
	}

	for file in groups.iter().flatten() {
		out.raw(file);
	}
	out.buf
}

fn lz11_header(out: &mut Vec<u8>, len: usize) {
	out.push(0x11);
	if len == 0 || len >= 1 << 24 {
		out.extend_from_slice(&[0, 0, 0]);
		out.extend_from_slice(&(len as u32).to_le_bytes());
	} else {
		out.extend_from_slice(&(len as u32).to_le_bytes()[..3]);
	}
}

/// LZ11 stream made only of literals.
pub fn lz11_literal(raw: &[u8]) -> Vec<u8> {
	let mut out = Vec::new();
	lz11_header(&mut out, raw.len());
	for chunk in raw.chunks(8) {
		out.push(0);
		out.extend_from_slice(chunk);
	}
	out
}

/// Greedy LZ11 encoder using all three back-reference widths.
pub fn lz11_compress(raw: &[u8]) -> Vec<u8> {
	const MAX_DISTANCE: usize = 0x1000;
	const MAX_LENGTH: usize = 0x10110;

	let mut out = Vec::new();
	lz11_header(&mut out, raw.len());

	let mut pos = 0;
	while pos < raw.len() {
		let flag_at = out.len();
		out.push(0);
		for bit in 0..8 {
			if pos >= raw.len() {
				break;
			}
			let (length, distance) = longest_match(raw, pos, MAX_DISTANCE, MAX_LENGTH);
			if length < 3 {
				out.push(raw[pos]);
				pos += 1;
				continue;
			}

			out[flag_at] |= 0x80 >> bit;
			let d = distance - 1;
			if length <= 0x10 {
				out.push((((length - 1) << 4) | (d >> 8)) as u8);
				out.push(d as u8);
			} else if length <= 0x110 {
				let l = length - 0x11;
				out.push((l >> 4) as u8);
				out.push((((l & 0xF) << 4) | (d >> 8)) as u8);
				out.push(d as u8);
			} else {
				let l = length - 0x111;
				out.push((0x10 | (l >> 12)) as u8);
				out.push((l >> 4) as u8);
				out.push((((l & 0xF) << 4) | (d >> 8)) as u8);
				out.push(d as u8);
			}
			pos += length;
		}
	}
	out
}

fn longest_match(raw: &[u8], pos: usize, max_distance: usize, max_length: usize) -> (usize, usize) {
	let mut best = (0, 0);
	let limit = max_length.min(raw.len() - pos);
	for distance in 1..=max_distance.min(pos) {
		let mut length = 0;
		while length < limit && raw[pos + length] == raw[pos + length - distance] {
			length += 1;
		}
		if length > best.0 {
			best = (length, distance);
			if length == limit {
				break;
			}
		}
	}
	best
}

/// zlib-wrap `raw` at the default level.
pub fn zlib(raw: &[u8]) -> Vec<u8> {
	let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
	encoder.write_all(raw).expect("zlib write");
	encoder.finish().expect("zlib finish")
}

/// Big-endian named package: count at 0x16, table at 0x60, entries aligned to 0x10.
pub fn package(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
	let mut out = Bytes::be();
	out.pad_to(0x16).u16(entries.len() as u16).pad_to(0x60);
	for (name, payload) in entries {
		out.fixed_str(name, 0x40).u32(0).u32(payload.len() as u32).raw(payload).align(0x10);
	}
	out.buf
}

/// Repeating-key XOR, in place.
pub fn xor_in_place(bytes: &mut [u8], key: &[u8]) {
	for (byte, k) in bytes.iter_mut().zip(key.iter().cycle()) {
		*byte ^= k;
	}
}

/// One linear NUT texture.
#[derive(Debug, Clone)]
pub struct NutTexture {
	/// NUT format byte.
	pub format: u8,
	/// Width in pixels.
	pub width: u16,
	/// Height in pixels.
	pub height: u16,
	/// Stored bytes per mip, largest first.
	pub mips: Vec<Vec<u8>>,
	/// Hash id written into the `GIDX` block.
	pub hash_id: u32,
}

const NUT_COMMON_SIZE: usize = 0x20;
const NUT_TAIL_SIZE: usize = 0x20;

fn nut_prelude(magic: &[u8; 4], big: bool, version: u16, count: usize) -> Bytes {
	let mut out = if big { Bytes::be() } else { Bytes::le() };
	out.raw(magic).raw(&version.to_be_bytes()).u16(count as u16).pad_to(0x10);
	out
}

#[allow(clippy::too_many_arguments)]
fn nut_common(out: &mut Bytes, total: usize, data: usize, header: usize, mips: usize, format: u8, width: u16, height: u16) {
	out.i32(total as i32).u32(0).i32(data as i32).u16(header as u16);
	out.raw(&[0, 0, 0, mips as u8, 0, format]).u16(width).u16(height).u32(0).u32(0);
}

fn nut_tail(out: &mut Bytes, hash_id: u32) {
	out.raw(b"eXt\0").u32(0x20).u32(0x10).u32(0);
	out.raw(b"GIDX").i32(0x10).u32(hash_id).u32(0);
}

/// Linear NUT (`NTP3` big-endian or `NTWD` little-endian) using relative data offsets.
pub fn nut_linear(little_endian: bool, textures: &[NutTexture]) -> Vec<u8> {
	let magic = if little_endian { b"NTWD" } else { b"NTP3" };
	let mut out = nut_prelude(magic, !little_endian, 0x0200, textures.len());

	let header_sizes: Vec<usize> = textures
		.iter()
		.map(|tex| {
			let sizes = if tex.mips.len() > 1 { (4 * tex.mips.len()).next_multiple_of(0x10) } else { 0 };
			NUT_COMMON_SIZE + 0x10 + sizes + NUT_TAIL_SIZE
		})
		.collect();
	let headers_total: usize = header_sizes.iter().sum();

	let mut data_at = 0x10 + headers_total;
	for (tex, &header_size) in textures.iter().zip(&header_sizes) {
		let header_ptr = out.len();
		let data: usize = tex.mips.iter().map(Vec::len).sum();
		nut_common(&mut out, header_size + data, data, header_size, tex.mips.len(), tex.format, tex.width, tex.height);
		out.i32((data_at - header_ptr) as i32).i32(0).i32(0).i32(0);
		if tex.mips.len() > 1 {
			for mip in &tex.mips {
				out.i32(mip.len() as i32);
			}
			out.align(0x10);
		}
		nut_tail(&mut out, tex.hash_id);
		data_at += data;
	}
	for mip in textures.iter().flat_map(|tex| &tex.mips) {
		out.raw(mip);
	}
	out.buf
}

/// GX2 surface parameters for an `NTWU` texture.
#[derive(Debug, Clone, Copy)]
pub struct Gx2Surface {
	/// Raw GX2 surface format.
	pub format: u32,
	/// Raw tile mode.
	pub tile_mode: u32,
	/// Raw swizzle word.
	pub swizzle: u32,
	/// Pitch in elements.
	pub pitch: u32,
}

/// Single-mip `NTWU` texture whose data is already in GX2 order.
pub fn nut_gx2(format: u8, width: u16, height: u16, surface: Gx2Surface, data: &[u8], hash_id: u32) -> Vec<u8> {
	const GTX_SIZE: usize = 0x44;
	let header_size = NUT_COMMON_SIZE + 0x10 + NUT_TAIL_SIZE;

	let mut out = nut_prelude(b"NTWU", true, 0x0200, 1);
	nut_common(&mut out, header_size + GTX_SIZE + data.len(), data.len(), header_size, 1, format, width, height);
	out.i32((header_size + GTX_SIZE) as i32).i32(0).i32(header_size as i32).i32(0);
	nut_tail(&mut out, hash_id);

	out.i32(1).u32(u32::from(width)).u32(u32::from(height)).i32(1).i32(1).u32(surface.format);
	out.raw(&[0; 12]);
	out.i32(data.len() as i32).i32(0).i32(0).i32(0);
	out.u32(surface.tile_mode).u32(surface.swizzle).i32(0).u32(surface.pitch);
	out.raw(data);
	out.buf
}

/// One node of a flag-driven animation.
#[derive(Debug, Clone)]
pub struct OmoNode {
	/// Channel flags, then translation, rotation and scale sub-format bytes.
	pub flags: [u8; 4],
	/// Bone hash.
	pub hash: i32,
	/// Big-endian base record bytes.
	pub base: Vec<u8>,
	/// Offset of this node's payload inside each frame.
	pub frame_key: i32,
}

/// Big-endian `OMO ` buffer; `frames` holds one payload of `frame_size` bytes per frame.
pub fn omo(nodes: &[OmoNode], frame_size: u16, frames: &[Vec<u8>]) -> Vec<u8> {
	let node_offset = 0x20;
	let base_offset = node_offset + 0x10 * nodes.len();
	let base_len: usize = nodes.iter().map(|node| node.base.len()).sum();
	let key_offset = base_offset + base_len;

	let mut out = Bytes::be();
	out.raw(b"OMO ").u16(1).u16(3).u32(0).u16(0);
	out.u16(nodes.len() as u16).u16(frames.len() as u16).u16(frame_size);
	out.i32(node_offset as i32).i32(base_offset as i32).i32(key_offset as i32);

	let mut base_rel = 0;
	for node in nodes {
		out.raw(&node.flags).i32(node.hash).i32(base_rel as i32).i32(node.frame_key);
		base_rel += node.base.len();
	}
	for node in nodes {
		out.raw(&node.base);
	}
	for frame in frames {
		let start = out.len();
		out.raw(frame).pad_to(start + usize::from(frame_size));
	}
	out.buf
}

/// Base record of big-endian floats.
pub fn be_floats(values: &[f32]) -> Vec<u8> {
	values.iter().flat_map(|value| value.to_be_bytes()).collect()
}

/// One VBN bone.
#[derive(Debug, Clone)]
pub struct VbnBone {
	/// Bone name (at most 64 bytes).
	pub name: String,
	/// Parent index, -1 for roots.
	pub parent: i32,
	/// Id hash animations refer to.
	pub id: u32,
	/// Rest translation.
	pub position: [f32; 3],
	/// Rest rotation (X/Y/Z radians).
	pub rotation: [f32; 3],
	/// Rest scale.
	pub scale: [f32; 3],
}

/// Big-endian `VBN ` skeleton.
pub fn vbn(bones: &[VbnBone]) -> Vec<u8> {
	let mut out = Bytes::be();
	out.raw(b"VBN ").u16(2).u16(0).u32(bones.len() as u32);
	out.u32(bones.len() as u32).u32(0).u32(0).u32(0);
	for bone in bones {
		out.fixed_str(&bone.name, 64).u32(0).i32(bone.parent).u32(bone.id);
	}
	for bone in bones {
		out.vec3(bone.position).vec3(bone.rotation).vec3(bone.scale);
	}
	out.buf
}

/// One `BCA ` track.
#[derive(Debug, Clone, Copy)]
pub struct BcaTrack {
	/// Hash embedded in the curve data.
	pub hash: u32,
	/// Default value.
	pub value: f32,
	/// Key count.
	pub keys: u32,
	/// Channel flags.
	pub flags: u32,
}

/// Little-endian `BCA ` track index.
pub fn bca(frame_count: i32, tracks: &[BcaTrack]) -> Vec<u8> {
	let mut out = Bytes::le();
	out.raw(b"BCA ").u32(0).u32(tracks.len() as u32).pad_to(0x18).i32(frame_count).pad_to(0x28);
	for track in tracks {
		out.u32(track.hash).f32(track.value).u32(track.keys).u32(track.flags).u32(0).u32(0);
	}
	out.buf
}

/// Little-endian `BCL ` curve blob with hashes planted at the given aligned offsets.
pub fn bcl(hits: &[(usize, u32)]) -> Vec<u8> {
	let mut out = Bytes::le();
	out.raw(b"BCL ");
	for &(at, hash) in hits {
		assert!(at % 4 == 0 && at >= out.len(), "hits must be aligned and ascending");
		out.pad_to(at).u32(hash);
	}
	out.u32(0);
	out.buf
}

/// Pack a DXT1 block from two 5:6:5 colors and sixteen 2-bit indices (pixel 0 in the low bits).
pub fn dxt1_block(c0: u16, c1: u16, indices: u32) -> [u8; 8] {
	let [a, b] = c0.to_le_bytes();
	let [c, d] = c1.to_le_bytes();
	let [e, f, g, h] = indices.to_le_bytes();
	[a, b, c, d, e, f, g, h]
}
