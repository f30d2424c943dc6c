use std::fs;
use std::path::Path;

use assetdoc::asset::{AssetError, Cipher, NoCipher, Result, XorCipher, decode_bytes};

/// Repeating XOR key given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorKey(pub Vec<u8>);

/// Parse a hex key such as `a55a` or `0xA55A` for `--xor-key`.
pub(crate) fn parse_hex_key(value: &str) -> std::result::Result<XorKey, String> {
	let digits = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")).unwrap_or(value);
	if digits.is_empty() || !digits.is_ascii() || digits.len() % 2 != 0 {
		return Err(format!("expected an even number of hex digits, got {value:?}"));
	}
	(0..digits.len())
		.step_by(2)
		.map(|at| u8::from_str_radix(&digits[at..at + 2], 16).map_err(|_| format!("invalid hex byte in {value:?}")))
		.collect::<std::result::Result<Vec<u8>, String>>()
		.map(XorKey)
}

/// Cipher for an optional `--xor-key`.
pub(crate) fn cipher_for(key: Option<XorKey>) -> Box<dyn Cipher> {
	match key {
		Some(XorKey(key)) => Box::new(XorCipher::new(key)),
		None => Box::new(NoCipher),
	}
}

/// Read a file and strip any LZ11/zlib wrapper.
pub(crate) fn read_decoded(path: &Path) -> Result<Vec<u8>> {
	let raw = fs::read(path)?;
	Ok(decode_bytes(raw)?.1)
}

/// Pretty-print a JSON payload to stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	let text = serde_json::to_string_pretty(payload).map_err(|err| AssetError::Io(std::io::Error::other(err)))?;
	println!("{text}");
	Ok(())
}

/// File-name-safe rendering of a blob tag.
pub(crate) fn tag_file_label(label: &str) -> String {
	let out: String = label
		.trim()
		.chars()
		.map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
		.collect();
	if out.is_empty() { "blob".to_owned() } else { out }
}

#[cfg(test)]
mod tests {
	use super::{XorKey, parse_hex_key, tag_file_label};

	#[test]
	fn hex_keys_accept_optional_prefix() {
		assert_eq!(parse_hex_key("a55a"), Ok(XorKey(vec![0xA5, 0x5A])));
		assert_eq!(parse_hex_key("0xFF00"), Ok(XorKey(vec![0xFF, 0x00])));
		assert!(parse_hex_key("abc").is_err());
		assert!(parse_hex_key("zz").is_err());
	}

	#[test]
	fn tag_labels_are_file_safe() {
		assert_eq!(tag_file_label("OMO "), "OMO");
		assert_eq!(tag_file_label(" NBV"), "NBV");
		assert_eq!(tag_file_label("...."), "____");
		assert_eq!(tag_file_label(""), "blob");
	}
}
