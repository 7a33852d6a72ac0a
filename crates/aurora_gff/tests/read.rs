use aurora_encoding::Encoding;
use aurora_gff::error::{Error, Result};
use aurora_gff::{FourCC, Gff4File, Gff4Version, Platform};
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

/// A `V0.2` talk table holding a single string, id 5, "World" stored as UTF-8
#[rustfmt::skip]
fn talk_table() -> Vec<u8> {
    let mut data = vec![
        // Header (28)
        b'G', b'F', b'F', b' ', b'V', b'4', b'.', b'0',
        b'P', b'C', b' ', b' ', b'T', b'L', b'K', b' ',
        b'V', b'0', b'.', b'2',
        0x02, 0x00, 0x00, 0x00, // Struct count
        0x60, 0x00, 0x00, 0x00, // Data offset

        // Templates (32)
        b'T', b'L', b'K', b' ', 0x01, 0x00, 0x00, 0x00, 0x3C, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00,
        b'S', b'T', b'R', b'N', 0x02, 0x00, 0x00, 0x00, 0x48, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00,

        // Fields (36)
        0x38, 0x4A, 0x00, 0x00, 0x01, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00,
        0x39, 0x4A, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x3A, 0x4A, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00,

        // Data
        0x04, 0x00, 0x00, 0x00, // List offset
        0x01, 0x00, 0x00, 0x00, // List count
        0x05, 0x00, 0x00, 0x00, // String ID
        0x10, 0x00, 0x00, 0x00, // String offset
        0x05, 0x00, 0x00, 0x00, // String length
    ];
    data.extend_from_slice(b"World");
    data
}

/// A big-endian file exercising scalars, lists, strings and struct references
#[rustfmt::skip]
fn console_file() -> Vec<u8> {
    vec![
        // Header (28)
        b'G', b'F', b'F', b' ', b'V', b'4', b'.', b'0',
        b'P', b'S', b'3', b' ', b'T', b'E', b'S', b'T',
        b'V', b'1', b'.', b'0',
        0x00, 0x00, 0x00, 0x02, // Struct count
        0x00, 0x00, 0x00, 0x90, // Data offset

        // Templates (32)
        b'R', b'O', b'O', b'T', 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x3C, 0x00, 0x00, 0x00, 0x18,
        b'C', b'H', b'L', b'D', 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x84, 0x00, 0x00, 0x00, 0x04,

        // Fields of ROOT (72)
        0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, // u16
        0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x04, // s32
        0x00, 0x00, 0x00, 0x03, 0x80, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x08, // [u32]
        0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00, 0x0C, // string
        0x00, 0x00, 0x00, 0x05, 0x60, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x10, // &CHLD
        0x00, 0x00, 0x00, 0x06, 0x60, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x14, // &CHLD (none)

        // Fields of CHLD (12)
        0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // u8

        // ROOT
        0x12, 0x34, 0x00, 0x00,
        0xFF, 0xFF, 0xFF, 0xFE,
        0x00, 0x00, 0x00, 0x18,
        0x00, 0x00, 0x00, 0x28,
        0x00, 0x00, 0x00, 0x24,
        0xFF, 0xFF, 0xFF, 0xFF,

        // [u32]
        0x00, 0x00, 0x00, 0x02,
        0x00, 0x00, 0x00, 0x07,
        0x00, 0x00, 0x00, 0x09,

        // CHLD
        0x2A, 0x00, 0x00, 0x00,

        // string
        0x00, 0x00, 0x00, 0x02,
        0x00, b'H', 0x00, b'i',
    ]
}

#[traced_test]
#[test]
fn parse_talk_table() -> Result<()> {
    let gff = Gff4File::new(talk_table(), FourCC::new(b"TLK "))?;

    assert_eq!(gff.version(), Gff4Version::V40);
    assert_eq!(gff.platform(), Platform::Pc);
    assert_eq!(gff.type_version(), FourCC::new(b"V0.2"));
    assert_eq!(gff.struct_count(), 2);

    let top = gff.top_level();
    assert!(gff.has_field(top, 19000));

    let strings = gff.get_list(top, 19000)?.expect("string list");
    assert_eq!(strings.len(), 1);

    let record = strings[0].expect("record");
    assert_eq!(gff.get_struct(record).map(|s| s.label()), Some(FourCC::new(b"STRN")));
    assert_eq!(gff.get_uint(record, 19001)?, Some(5));
    assert_eq!(
        gff.get_string(record, 19002, Encoding::Utf8)?,
        Some("World".to_string())
    );
    assert_eq!(gff.get_string(record, 19003, Encoding::Utf8)?, None);

    Ok(())
}

#[traced_test]
#[test]
fn parse_big_endian() -> Result<()> {
    let gff = Gff4File::new(console_file(), FourCC::new(b"TEST"))?;
    assert_eq!(gff.platform(), Platform::Ps3);

    let top = gff.top_level();
    assert_eq!(gff.get_uint(top, 1)?, Some(0x1234));
    assert_eq!(gff.get_sint(top, 2)?, Some(-2));
    assert_eq!(gff.get_uint(top, 2)?, Some(-2i64 as u64));
    assert_eq!(
        gff.get_data(top, 3)?,
        Some([0x00, 0x00, 0x00, 0x07, 0x00, 0x00, 0x00, 0x09].as_slice())
    );
    assert_eq!(
        gff.get_string(top, 4, Encoding::Utf16Be)?,
        Some("Hi".to_string())
    );

    let child = gff.get_child(top, 5)?.expect("child struct");
    assert_eq!(gff.get_struct(child).map(|s| s.label()), Some(FourCC::new(b"CHLD")));
    assert_eq!(gff.get_uint(child, 10)?, Some(42));

    assert_eq!(gff.get_child(top, 6)?, None);
    assert_eq!(gff.get_uint(top, 99)?, None);

    Ok(())
}

#[test]
fn field_type_mismatch() -> Result<()> {
    let gff = Gff4File::new(console_file(), FourCC::new(b"TEST"))?;
    let top = gff.top_level();

    assert!(matches!(
        gff.get_list(top, 1),
        Err(Error::FieldTypeMismatch { label: 1, .. })
    ));
    assert!(matches!(
        gff.get_string(top, 3, Encoding::Utf8),
        Err(Error::FieldTypeMismatch { label: 3, .. })
    ));
    assert!(matches!(
        gff.get_uint(top, 5),
        Err(Error::FieldTypeMismatch { label: 5, .. })
    ));

    Ok(())
}

#[test]
fn reject_wrong_file_type() {
    let result = Gff4File::new(talk_table(), FourCC::new(b"DLG "));

    assert!(matches!(
        result,
        Err(Error::WrongFileType { expected, found })
            if expected == FourCC::new(b"DLG ") && found == FourCC::new(b"TLK ")
    ));
}

#[test]
fn reject_invalid_magic() {
    let mut data = talk_table();
    data[0] = b'X';

    assert!(matches!(
        Gff4File::new(data, FourCC::new(b"TLK ")),
        Err(Error::InvalidFile)
    ));
}

#[test]
fn reject_unsupported_version() {
    let mut data = talk_table();
    data[6] = b'9';

    assert!(matches!(
        Gff4File::new(data, FourCC::new(b"TLK ")),
        Err(Error::UnsupportedVersion { what: "version", .. })
    ));
}

#[test]
fn reject_truncated_list() {
    let mut data = talk_table();
    data.truncate(104);

    assert!(matches!(
        Gff4File::new(data, FourCC::new(b"TLK ")),
        Err(Error::Truncated)
    ));
}

#[test]
fn truncated_string_is_an_error() -> Result<()> {
    let mut data = talk_table();
    data.truncate(data.len() - 2);

    let gff = Gff4File::new(data, FourCC::new(b"TLK "))?;
    let record = gff.get_list(gff.top_level(), 19000)?.expect("list")[0].expect("record");

    assert!(matches!(
        gff.get_string(record, 19002, Encoding::Utf8),
        Err(Error::Truncated)
    ));

    Ok(())
}

#[test]
fn reject_list_of_empty_structs_longer_than_data() {
    let mut data = talk_table();
    // STRN structs take no space
    data[56..60].copy_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    data[0x64..0x68].copy_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);

    assert!(matches!(
        Gff4File::new(data, FourCC::new(b"TLK ")),
        Err(Error::Truncated)
    ));
}

#[test]
fn reject_missing_shared_strings() {
    #[rustfmt::skip]
    let data = vec![
        // Header (36)
        b'G', b'F', b'F', b' ', b'V', b'4', b'.', b'1',
        b'P', b'C', b' ', b' ', b'T', b'E', b'S', b'T',
        b'V', b'1', b'.', b'0',
        0x01, 0x00, 0x00, 0x00, // Struct count
        0x36, 0x00, 0x00, 0x00, // Data offset
        0xFF, 0xFF, 0xFF, 0xFF, // String count
        0x34, 0x00, 0x00, 0x00, // String offset

        // Templates (16)
        b'R', b'O', b'O', b'T', 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,

        // Strings
        b'a', 0x00,
    ];

    assert!(Gff4File::new(data, FourCC::new(b"TEST")).is_err());
}
