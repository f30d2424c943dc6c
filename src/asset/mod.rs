mod anim;
mod bc;
mod bca;
mod blob;
mod bytes;
mod compression;
mod error;
mod file;
mod garc;
mod gtx;
mod lz11;
mod nut;
mod omo;
mod package;
mod pixel;
mod rotation;
mod skeleton;
mod texture;

/// Keyframe curves and the shared animation model.
pub use anim::{AnimationData, Interpolation, KeyFrame, KeyGroup, KeyNode, RotationType};
/// Single-block decoding helpers for the DXT/BC family.
pub use bc::{decode_block, ramp_palette};
/// Global-track-index (`BCA `/`BCL `) decoding.
pub use bca::{
	BCA_ANIMATION_NAME, Channel, Track, TrackGroupingOptions, TrackIndex, decode_track_index, group_by_proximity, scan_hash_occurrences,
};
/// Typed blob identification.
pub use blob::{BlobKind, BlobRegistry, NamedBlob, TypedBlob};
/// Byte cursor and writer.
pub use bytes::{Cursor, Endianness, SeekFrom, TempSeek, Writer};
/// Compression detection and decoding.
pub use compression::{Compression, decode_bytes};
/// Error and result aliases.
pub use error::{AssetError, Result};
/// File-level archive helper.
pub use file::{ArchiveFile, Container};
/// Indexed (`CRAG`) archive container.
pub use garc::{ArchiveEntry, GARC_MAGIC, GarcArchive, GarcHeader};
/// GX2 macro-tile addressing.
pub use gtx::{Gx2Format, Gx2Layout, TileMode, deswizzle_macro_tiled, deswizzle_surface, surface_addr_macro_tiled, swizzle_macro_tiled};
/// LZ11 decompression.
pub use lz11::{LZ11_TAG, decompress_lz11, is_lz11, lz11_header};
/// NUT texture containers.
pub use nut::{NutFile, NutVariant};
/// Flag-driven (`OMO `) animation decoding.
pub use omo::{OMO_ANIMATION_NAME, OmoHeader, decode_omo, read_omo_header};
/// Entry-table package format and pluggable decryption.
pub use package::{Cipher, NoCipher, PackageArchive, PackageEntry, XorCipher};
/// Quaternion reconstruction helpers.
pub use rotation::{COMPRESSED_QUAT_SIZE, decode_compressed_quat, quat_from_xyz_normalized, rot6_w};
/// Skeletons and bone-name resolution.
pub use skeleton::{Bone, Skeleton, euler_to_rest_rotation, resolve_bone_names};
/// Texture descriptors and pixel decoding.
pub use texture::{DecodedTexture, Surface, TextureDescriptor, TextureFormat, Tiling, decode_pixels, decode_surface, decode_texture};
