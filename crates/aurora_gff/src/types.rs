//! Base types for the structure of GFF4 files.

use std::fmt;

use binrw::{binread, BinRead, Endian};

/// A four character code, stored in the file as raw bytes regardless of platform
#[derive(BinRead, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const fn new(tag: &[u8; 4]) -> Self {
        FourCC(*tag)
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|c| c.is_ascii_graphic() || *c == b' ') {
            write!(f, "'{}'", self.0.iter().map(|&c| c as char).collect::<String>())
        } else {
            write!(f, "0x{:08X}", u32::from_be_bytes(self.0))
        }
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<&[u8; 4]> for FourCC {
    fn from(value: &[u8; 4]) -> Self {
        FourCC::new(value)
    }
}

/// Revision of the GFF4 layout
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Gff4Version {
    /// `V4.0`, strings are stored inline
    V40,
    /// `V4.1`, adds a table of shared strings
    V41,
}

impl Gff4Version {
    pub fn from_tag(tag: FourCC) -> Option<Self> {
        match &tag.0 {
            b"V4.0" => Some(Gff4Version::V40),
            b"V4.1" => Some(Gff4Version::V41),
            _ => None,
        }
    }

    pub const fn has_shared_strings(&self) -> bool {
        matches!(self, Gff4Version::V41)
    }
}

/// The platform a GFF4 file was built for, which determines its byte order
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Platform {
    Pc,
    Ps3,
    Xbox360,
}

impl Platform {
    pub fn from_tag(tag: FourCC) -> Option<Self> {
        match &tag.0 {
            b"PC  " => Some(Platform::Pc),
            b"PS3 " => Some(Platform::Ps3),
            b"X360" => Some(Platform::Xbox360),
            _ => None,
        }
    }

    pub const fn endian(&self) -> Endian {
        match self {
            Platform::Pc => Endian::Little,
            Platform::Ps3 | Platform::Xbox360 => Endian::Big,
        }
    }
}

/// Identification block at the very start of every GFF4 file
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
#[br(big, magic = b"GFF ")]
pub struct Gff4Ident {
    pub version: FourCC,
    pub platform: FourCC,
    pub file_type: FourCC,
    pub type_version: FourCC,
}

/// Counts and offsets following the identification block, in platform byte order
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq, Default)]
#[br(import(shared_strings: bool))]
pub struct Gff4Layout {
    pub struct_count: u32,
    pub data_offset: u32,
    #[br(if(shared_strings))]
    pub string_count: u32,
    #[br(if(shared_strings))]
    pub string_offset: u32,
}

/// Describes the layout of all structs of one kind
#[derive(BinRead, Debug, Copy, Clone, PartialEq, Eq)]
pub struct StructTemplate {
    pub label: FourCC,
    pub field_count: u32,
    pub field_offset: u32,
    pub struct_size: u32,
}

/// A single field of a [`StructTemplate`]
#[binread]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub label: u32,
    #[br(temp)]
    type_and_flags: u32,
    #[br(calc = (type_and_flags & 0xFFFF) as u16)]
    pub field_type: u16,
    #[br(calc = (type_and_flags >> 16) as u16)]
    pub flags: u16,
    pub offset: u32,
}

impl FieldDeclaration {
    pub const FLAG_LIST: u16 = 0x8000;
    pub const FLAG_STRUCT: u16 = 0x4000;
    pub const FLAG_REFERENCE: u16 = 0x2000;

    pub const fn is_list(&self) -> bool {
        self.flags & Self::FLAG_LIST != 0
    }

    pub const fn is_struct(&self) -> bool {
        self.flags & Self::FLAG_STRUCT != 0
    }

    pub const fn is_reference(&self) -> bool {
        self.flags & Self::FLAG_REFERENCE != 0
    }
}

/// Value type of a field
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldType {
    UInt8,
    SInt8,
    UInt16,
    SInt16,
    UInt32,
    SInt32,
    UInt64,
    SInt64,
    Float32,
    Float64,
    Vector3f,
    Vector4f,
    Quaternionf,
    String,
    Color4f,
    Matrix4x4f,
    TlkString,
    NdsFixed,
    /// A struct, holding the index of its template
    Struct(u32),
    Generic,
    Unknown(u16),
}

impl FieldType {
    pub fn from_declaration(declaration: &FieldDeclaration) -> Self {
        if declaration.is_struct() {
            return FieldType::Struct(declaration.field_type as u32);
        }

        match declaration.field_type {
            0 => FieldType::UInt8,
            1 => FieldType::SInt8,
            2 => FieldType::UInt16,
            3 => FieldType::SInt16,
            4 => FieldType::UInt32,
            5 => FieldType::SInt32,
            6 => FieldType::UInt64,
            7 => FieldType::SInt64,
            8 => FieldType::Float32,
            9 => FieldType::Float64,
            10 => FieldType::Vector3f,
            12 => FieldType::Vector4f,
            13 => FieldType::Quaternionf,
            14 => FieldType::String,
            15 => FieldType::Color4f,
            16 => FieldType::Matrix4x4f,
            17 => FieldType::TlkString,
            18 => FieldType::NdsFixed,
            0xFFFF => FieldType::Generic,
            other => FieldType::Unknown(other),
        }
    }

    /// Size of one value in the data block, for types that can be read as raw data
    pub const fn size(&self) -> Option<u64> {
        match self {
            FieldType::UInt8 | FieldType::SInt8 => Some(1),
            FieldType::UInt16 | FieldType::SInt16 => Some(2),
            FieldType::UInt32 | FieldType::SInt32 | FieldType::Float32 | FieldType::NdsFixed => {
                Some(4)
            }
            FieldType::UInt64 | FieldType::SInt64 | FieldType::Float64 | FieldType::TlkString => {
                Some(8)
            }
            FieldType::Vector3f => Some(12),
            FieldType::Vector4f | FieldType::Quaternionf | FieldType::Color4f => Some(16),
            FieldType::Matrix4x4f => Some(64),
            FieldType::String
            | FieldType::Struct(_)
            | FieldType::Generic
            | FieldType::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, Endian};
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{FieldDeclaration, FieldType, FourCC, Gff4Ident, Gff4Layout};

    #[test]
    fn read_ident() -> Result<()> {
        let mut input = Cursor::new(b"GFF V4.0PC  TLK V0.5".to_vec());

        let expected = Gff4Ident {
            version: FourCC::new(b"V4.0"),
            platform: FourCC::new(b"PC  "),
            file_type: FourCC::new(b"TLK "),
            type_version: FourCC::new(b"V0.5"),
        };

        assert_eq!(Gff4Ident::read(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_layout_with_shared_strings() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x00, 0x00, 0x00, 0x02,
            0x00, 0x00, 0x00, 0x60,
            0x00, 0x00, 0x00, 0x03,
            0x00, 0x00, 0x01, 0x00,
        ]);

        let layout = Gff4Layout::read_options(&mut input, Endian::Big, (true,))?;
        assert_eq!(
            layout,
            Gff4Layout {
                struct_count: 2,
                data_offset: 0x60,
                string_count: 3,
                string_offset: 0x100,
            }
        );

        Ok(())
    }

    #[test]
    fn read_field_declaration() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x38, 0x4A, 0x00, 0x00, // Label
            0x01, 0x00, 0x00, 0xC0, // Type & flags
            0x04, 0x00, 0x00, 0x00, // Offset
        ]);

        let field = FieldDeclaration::read_options(&mut input, Endian::Little, ())?;
        assert_eq!(field.label, 19000);
        assert_eq!(field.offset, 4);
        assert!(field.is_list());
        assert!(field.is_struct());
        assert!(!field.is_reference());
        assert_eq!(FieldType::from_declaration(&field), FieldType::Struct(1));

        Ok(())
    }

    #[test]
    fn display_fourcc() {
        assert_eq!(FourCC::new(b"TLK ").to_string(), "'TLK '");
        assert_eq!(FourCC::new(&[0, 1, 2, 3]).to_string(), "0x00010203");
    }
}
