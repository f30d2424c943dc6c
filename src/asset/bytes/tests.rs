use crate::asset::{AssetError, Cursor, Endianness, SeekFrom, Writer};

#[test]
fn reads_respect_endianness() {
	let raw = [0x12, 0x34, 0x56, 0x78];
	let mut le = Cursor::new(&raw, Endianness::Little);
	let mut be = Cursor::new(&raw, Endianness::Big);
	assert_eq!(le.read_u32().expect("le read"), 0x7856_3412);
	assert_eq!(be.read_u32().expect("be read"), 0x1234_5678);
	assert_eq!(le.pos(), 4);
}

#[test]
fn truncated_read_reports_offset_and_remaining() {
	let raw = [0_u8; 3];
	let mut cursor = Cursor::new(&raw, Endianness::Little);
	cursor.read_u16().expect("first read fits");
	let err = cursor.read_u16().expect_err("second read overruns");
	assert!(matches!(err, AssetError::TruncatedData { at: 2, need: 2, rem: 1 }));
}

#[test]
fn align_is_relative_to_stream_start() {
	let raw = [0_u8; 32];
	let mut cursor = Cursor::new(&raw, Endianness::Big);
	cursor.skip(5).expect("skip");
	cursor.align(0x10).expect("align");
	assert_eq!(cursor.pos(), 0x10);
	cursor.align(0x10).expect("already aligned");
	assert_eq!(cursor.pos(), 0x10);
}

#[test]
fn seek_origins_and_bounds() {
	let raw = [0_u8; 10];
	let mut cursor = Cursor::new(&raw, Endianness::Little);
	assert_eq!(cursor.seek(SeekFrom::End(-2)).expect("from end"), 8);
	assert_eq!(cursor.seek(SeekFrom::Current(-3)).expect("back"), 5);
	assert_eq!(cursor.seek(SeekFrom::Begin(10)).expect("end is valid"), 10);
	let err = cursor.seek(SeekFrom::Current(1)).expect_err("past end");
	assert!(matches!(err, AssetError::SeekOutOfRange { target: 11, len: 10 }));
}

#[test]
fn temp_seek_restores_position_even_on_error() {
	let raw = [1_u8, 2, 3, 4, 5, 6];
	let mut cursor = Cursor::new(&raw, Endianness::Little);
	cursor.skip(1).expect("skip");

	{
		let mut detour = cursor.temp_seek(4).expect("detour");
		assert_eq!(detour.read_u8().expect("read"), 5);
	}
	assert_eq!(cursor.pos(), 1);

	let failed: crate::asset::Result<u32> = (|| {
		let mut detour = cursor.temp_seek(5)?;
		detour.read_u32()
	})();
	assert!(failed.is_err());
	assert_eq!(cursor.pos(), 1);
}

#[test]
fn writer_output_reads_back() {
	let mut writer = Writer::new(Endianness::Big);
	writer.write_u16(0xBEEF).write_f32(1.5).write_fixed_string("abc", 6).align(4);
	let bytes = writer.into_bytes();
	assert_eq!(bytes.len(), 12);

	let mut cursor = Cursor::new(&bytes, Endianness::Big);
	assert_eq!(cursor.read_u16().expect("u16"), 0xBEEF);
	assert_eq!(cursor.read_f32().expect("f32"), 1.5);
	assert_eq!(cursor.read_fixed_string(6).expect("name"), "abc");
}
