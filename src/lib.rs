//! Decoding library for console-era game asset archives.
//!
//! Unpacks indexed and entry-table archives, decompresses LZ11 and zlib payloads, decodes
//! NUT textures (including GX2 macro-tiled surfaces) to RGBA8, and reconstructs keyframe
//! animation from flag-driven and track-index formats.

/// Archive, texture, skeleton, and animation decoding.
pub mod asset;
