//! This library handles reading and writing **talk tables** used by *BioWare Aurora* engine games.
//!
//! Talk tables hold every localized string of a game, each identified by a numeric string
//! reference ([`StrRef`]). There are two families of them: flat `TLK` files and talk tables
//! stored in GFF4 containers. [`AnyTalkTable`] reads either and both implement [`TalkTable`].
//!
//! # Flat TLK Format Documentation
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: "TLK "                                            |
//! | 0x0004         | Version                | 4 bytes: "V3.0" or "V4.0"                                  |
//! | 0x0008         | Language ID            | 4 bytes: Language of the strings, see [`Language`]         |
//! | 0x000C         | Entry Count            | 4 bytes: Number of entries                                 |
//! | 0x0010         | Table Offset           | 4 bytes: Offset to the entry table (V4.0 only)             |
//! | 0x0010/0x0014  | Strings Offset         | 4 bytes: Offset to the string data                         |
//!
//! `V3.0` files have no table offset, their entry table always starts at 0x0014.
//!
//! A few files store the magic and version as UTF-16, one NUL byte after every character.
//!
//! ### V3.0 Entry
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Flags                  | 4 bytes: 0x1 text, 0x2 sound, 0x4 sound length present  |
//! | 0x0004         | Sound                  | 16 bytes: NUL padded name of the sound resource         |
//! | 0x0014         | Volume Variance        | 4 bytes                                                 |
//! | 0x0018         | Pitch Variance         | 4 bytes                                                 |
//! | 0x001C         | Offset                 | 4 bytes: Offset of the text from the strings offset     |
//! | 0x0020         | Length                 | 4 bytes: Length of the text in bytes                    |
//! | 0x0024         | Sound Length           | 4 bytes: Float, length of the sound in seconds          |
//!
//! ### V4.0 Entry
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Sound ID               | 4 bytes                                                 |
//! | 0x0004         | Offset                 | 4 bytes: Offset of the text from the start of the file  |
//! | 0x0008         | Length                 | 2 bytes: Length of the text in bytes                    |
//!
//! Every `V4.0` entry has text. The strings are not NUL terminated and have no fixed encoding,
//! which has to be picked from the language.
//!
//! # GFF Talk Tables
//!
//! GFF4 files of type `TLK ` and version `V0.2` or `V0.5`, see [`gff`].
//!
//! ## Additional Information
//!
//! - **File Extension**: `.tlk`
//! - **Endianness**: Little-endian for all multi-byte integers of flat files
//!

pub mod color;
pub mod error;
pub mod gff;
pub mod huffman;
pub mod language;
#[cfg(feature = "serde")]
pub mod serde;
pub mod table;
pub mod tlk;
pub mod types;
pub mod write;

pub use gff::GffTalkTable;
pub use language::{Game, Language, LANGUAGE_INVALID};
pub use table::{AnyTalkTable, TalkTable};
pub use tlk::TlkTalkTable;
pub use types::{StrRef, TalkString, TlkEntryData, TlkVersion, STRREF_INVALID};
