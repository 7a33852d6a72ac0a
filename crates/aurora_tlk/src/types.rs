//! Types shared by all talk tables

use aurora_gff::FourCC;
use binrw::{BinRead, BinWrite};
use derive_more::derive::Constructor;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifies one string of a talk table
pub type StrRef = u32;

/// A [`StrRef`] that never names a string
pub const STRREF_INVALID: StrRef = 0xFFFF_FFFF;

/// Flag bits of a flat talk table entry
pub mod flags {
    /// The entry has text
    pub const TEXT_PRESENT: u32 = 0x0001;
    /// The entry references a sound
    pub const SOUND_PRESENT: u32 = 0x0002;
    /// The entry knows the length of its sound
    pub const SOUND_LENGTH_PRESENT: u32 = 0x0004;
}

/// A string looked up in a talk table
#[derive(Constructor, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TalkString {
    /// The localized text
    pub text: String,

    /// Name of the sound resource spoken with the text, empty if there is none
    pub sound_res_ref: String,
}

/// Everything a flat talk table stores about one string
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TlkEntryData {
    pub text: String,
    pub sound_res_ref: String,
    pub volume_variance: u32,
    pub pitch_variance: u32,
    /// Length of the sound in seconds, negative if unknown
    pub sound_length: f32,
    /// Sound ID of `V4.0` talk tables, `0xFFFFFFFF` if unset
    pub sound_id: u32,
}

impl Default for TlkEntryData {
    fn default() -> Self {
        Self {
            text: String::new(),
            sound_res_ref: String::new(),
            volume_variance: 0,
            pitch_variance: 0,
            sound_length: -1.0,
            sound_id: 0xFFFF_FFFF,
        }
    }
}

impl TlkEntryData {
    /// Entry data with only text set
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// The flag bits describing which optional parts are present
    pub fn flags(&self) -> u32 {
        let mut flags = 0;
        if !self.text.is_empty() {
            flags |= flags::TEXT_PRESENT;
        }
        if !self.sound_res_ref.is_empty() {
            flags |= flags::SOUND_PRESENT;
        }
        if self.sound_length > 0.0 {
            flags |= flags::SOUND_LENGTH_PRESENT;
        }
        flags
    }
}

impl From<TlkEntryData> for TalkString {
    fn from(value: TlkEntryData) -> Self {
        TalkString::new(value.text, value.sound_res_ref)
    }
}

/// Version of a flat talk table
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TlkVersion {
    /// `V3.0`, as used by Neverwinter Nights and Knights of the Old Republic
    #[default]
    V3,
    /// `V4.0`, as used by The Witcher
    V4,
}

impl TlkVersion {
    pub fn from_tag(tag: FourCC) -> Option<Self> {
        match &tag.0 {
            b"V3.0" => Some(TlkVersion::V3),
            b"V4.0" => Some(TlkVersion::V4),
            _ => None,
        }
    }

    pub const fn tag(&self) -> FourCC {
        match self {
            TlkVersion::V3 => FourCC::new(b"V3.0"),
            TlkVersion::V4 => FourCC::new(b"V4.0"),
        }
    }
}

/// Version of a talk table stored in a GFF4 container
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GffTlkVersion {
    /// `V0.2`, strings stored as plain fields
    V02,
    /// `V0.5`, strings compressed into a shared Huffman coded bitstream
    V05,
}

impl GffTlkVersion {
    pub fn from_tag(tag: FourCC) -> Option<Self> {
        match &tag.0 {
            b"V0.2" => Some(GffTlkVersion::V02),
            b"V0.5" => Some(GffTlkVersion::V05),
            _ => None,
        }
    }
}

/// Length of the sound resource name stored in a `V3.0` entry
pub const SOUND_RES_REF_LENGTH: usize = 16;

/// Entry of a `V3.0` talk table
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(little)]
pub struct TlkV3Entry {
    pub flags: u32,

    /// NUL padded ASCII name of the sound resource
    pub sound_res_ref: [u8; SOUND_RES_REF_LENGTH],

    pub volume_variance: u32,
    pub pitch_variance: u32,

    /// Offset of the text, relative to the start of the string data
    pub offset: u32,

    /// Length of the text in bytes
    pub length: u32,

    /// Length of the sound in seconds
    pub sound_length: f32,
}

impl TlkV3Entry {
    pub const SIZE: u32 = 40;
}

/// Entry of a `V4.0` talk table
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little)]
pub struct TlkV4Entry {
    pub sound_id: u32,

    /// Offset of the text from the start of the file
    pub offset: u32,

    /// Length of the text in bytes
    pub length: u16,
}

impl TlkV4Entry {
    pub const SIZE: u32 = 10;
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{flags, TlkEntryData, TlkV3Entry, TlkV4Entry};

    #[test]
    fn read_v3_entry() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x07, 0x00, 0x00, 0x00, // Flags
            b'v', b'o', b'_', b'0', b'0', b'1', 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // Sound
            0x01, 0x00, 0x00, 0x00, // Volume variance
            0x02, 0x00, 0x00, 0x00, // Pitch variance
            0x10, 0x00, 0x00, 0x00, // Offset
            0x05, 0x00, 0x00, 0x00, // Length
            0x00, 0x00, 0xC0, 0x3F, // Sound length
        ]);

        let entry = TlkV3Entry::read(&mut input)?;
        assert_eq!(input.position(), TlkV3Entry::SIZE as u64);
        assert_eq!(entry.flags, 7);
        assert_eq!(&entry.sound_res_ref[..6], b"vo_001");
        assert_eq!(entry.volume_variance, 1);
        assert_eq!(entry.pitch_variance, 2);
        assert_eq!(entry.offset, 0x10);
        assert_eq!(entry.length, 5);
        assert_eq!(entry.sound_length, 1.5);

        Ok(())
    }

    #[test]
    fn write_v4_entry() -> Result<()> {
        let entry = TlkV4Entry {
            sound_id: 0xFFFF_FFFF,
            offset: 0x22,
            length: 3,
        };

        let mut actual = Vec::new();
        entry.write(&mut Cursor::new(&mut actual))?;

        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0xFF, 0xFF, 0xFF, 0xFF,
            0x22, 0x00, 0x00, 0x00,
            0x03, 0x00,
        ];

        assert_eq!(actual, expected);
        assert_eq!(actual.len(), TlkV4Entry::SIZE as usize);

        Ok(())
    }

    #[test]
    fn flags_follow_present_fields() {
        assert_eq!(TlkEntryData::default().flags(), 0);
        assert_eq!(TlkEntryData::with_text("a").flags(), flags::TEXT_PRESENT);

        let entry = TlkEntryData {
            sound_res_ref: "vo_001".into(),
            sound_length: 1.5,
            ..Default::default()
        };
        assert_eq!(
            entry.flags(),
            flags::SOUND_PRESENT | flags::SOUND_LENGTH_PRESENT
        );
    }
}
