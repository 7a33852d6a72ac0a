//! Text encodings used by strings stored in *BioWare Aurora* engine files.
//!
//! Game data rarely says which encoding its strings are in. Talk tables carry a language ID the
//! encoding can be guessed from, container files mostly store UTF-16, and everything else has to
//! be told by the user. This crate provides the closed set of encodings those files use and the
//! conversions between raw bytes and Rust strings.
//!
//! | Name      | Encoding                     | Bytes per code unit |
//! |-----------|------------------------------|---------------------|
//! | `ascii`   | 7-bit ASCII                  | 1                   |
//! | `latin9`  | ISO-8859-15                  | 1                   |
//! | `utf8`    | UTF-8                        | 1                   |
//! | `utf16le` | UTF-16, little-endian        | 2                   |
//! | `utf16be` | UTF-16, big-endian           | 2                   |
//! | `cp1250`  | Windows CP-1250 (Central EU) | 1                   |
//! | `cp1251`  | Windows CP-1251 (Cyrillic)   | 1                   |
//! | `cp1252`  | Windows CP-1252 (Western EU) | 1                   |
//! | `cp932`   | Windows CP-932 (Japanese)    | 1                   |
//! | `cp936`   | Windows CP-936 (Simplified)  | 1                   |
//! | `cp949`   | Windows CP-949 (Korean)      | 1                   |
//! | `cp950`   | Windows CP-950 (Traditional) | 1                   |
//!
//! Decoding always stops at the first NUL code unit, the way the engine reads its strings.

pub mod error;

use std::{fmt, str::FromStr};

use widestring::U16Str;

use crate::error::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A text encoding for strings found in game files
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Encoding {
    Ascii,
    Latin9,
    Utf8,
    Utf16Le,
    Utf16Be,
    Cp1250,
    Cp1251,
    Cp1252,
    Cp932,
    Cp936,
    Cp949,
    Cp950,
}

impl Encoding {
    /// Every supported encoding, in display order
    pub const ALL: [Encoding; 12] = [
        Encoding::Ascii,
        Encoding::Latin9,
        Encoding::Utf8,
        Encoding::Utf16Le,
        Encoding::Utf16Be,
        Encoding::Cp1250,
        Encoding::Cp1251,
        Encoding::Cp1252,
        Encoding::Cp932,
        Encoding::Cp936,
        Encoding::Cp949,
        Encoding::Cp950,
    ];

    /// Lowercase name of the encoding, as accepted by [`Encoding::from_str`]
    pub const fn name(&self) -> &'static str {
        match self {
            Encoding::Ascii => "ascii",
            Encoding::Latin9 => "latin9",
            Encoding::Utf8 => "utf8",
            Encoding::Utf16Le => "utf16le",
            Encoding::Utf16Be => "utf16be",
            Encoding::Cp1250 => "cp1250",
            Encoding::Cp1251 => "cp1251",
            Encoding::Cp1252 => "cp1252",
            Encoding::Cp932 => "cp932",
            Encoding::Cp936 => "cp936",
            Encoding::Cp949 => "cp949",
            Encoding::Cp950 => "cp950",
        }
    }

    /// Size of a single code unit in bytes.
    ///
    /// Length fields of strings in container files count code units, not bytes.
    pub const fn bytes_per_unit(&self) -> usize {
        match self {
            Encoding::Utf16Le | Encoding::Utf16Be => 2,
            _ => 1,
        }
    }

    fn codec(&self) -> Option<&'static encoding_rs::Encoding> {
        match self {
            Encoding::Ascii | Encoding::Utf16Le | Encoding::Utf16Be => None,
            Encoding::Latin9 => Some(encoding_rs::ISO_8859_15),
            Encoding::Utf8 => Some(encoding_rs::UTF_8),
            Encoding::Cp1250 => Some(encoding_rs::WINDOWS_1250),
            Encoding::Cp1251 => Some(encoding_rs::WINDOWS_1251),
            Encoding::Cp1252 => Some(encoding_rs::WINDOWS_1252),
            Encoding::Cp932 => Some(encoding_rs::SHIFT_JIS),
            Encoding::Cp936 => Some(encoding_rs::GBK),
            Encoding::Cp949 => Some(encoding_rs::EUC_KR),
            Encoding::Cp950 => Some(encoding_rs::BIG5),
        }
    }

    /// Decode a string, stopping at the first NUL code unit.
    ///
    /// Malformed sequences are replaced with U+FFFD. A trailing partial UTF-16 code unit is
    /// ignored.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Encoding::Ascii => bytes
                .iter()
                .take_while(|&&b| b != 0)
                .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            Encoding::Utf16Le | Encoding::Utf16Be => {
                let units = bytes
                    .chunks_exact(2)
                    .map(|pair| match self {
                        Encoding::Utf16Be => u16::from_be_bytes([pair[0], pair[1]]),
                        _ => u16::from_le_bytes([pair[0], pair[1]]),
                    })
                    .take_while(|&unit| unit != 0)
                    .collect::<Vec<u16>>();
                U16Str::from_slice(&units).to_string_lossy()
            }
            _ => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                match self.codec() {
                    Some(codec) => codec
                        .decode_without_bom_handling(&bytes[..end])
                        .0
                        .into_owned(),
                    None => String::from_utf8_lossy(&bytes[..end]).into_owned(),
                }
            }
        }
    }

    /// Encode a string, without any terminator.
    ///
    /// Characters the encoding cannot represent become `?` for ASCII and HTML numeric character
    /// references for the code pages.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Ascii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Encoding::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            _ => match self.codec() {
                Some(codec) => {
                    let (bytes, _, unmappable) = codec.encode(text);
                    if unmappable {
                        tracing::debug!(encoding = self.name(), "unmappable characters in {text:?}");
                    }
                    bytes.into_owned()
                }
                None => text.as_bytes().to_vec(),
            },
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace(['-', '_'], "");
        Encoding::ALL
            .into_iter()
            .find(|e| e.name() == normalized)
            .ok_or_else(|| Error::UnknownEncoding(s.to_owned()))
    }
}
