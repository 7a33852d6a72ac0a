//! This library handles reading **GFF4** files used by *BioWare Aurora* engine games.
//!
//! # GFF4 Format Documentation
//!
//! GFF4 is a generic container format: a file is a tree of structs, each struct is an instance
//! of a template that lists typed, numerically labelled fields. Games store many kinds of data in
//! it, identified by the file type in the header (for example `TLK ` for talk tables).
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: "GFF "                                            |
//! | 0x0004         | Version                | 4 bytes: "V4.0" or "V4.1"                                  |
//! | 0x0008         | Platform               | 4 bytes: "PC  ", "PS3 " or "X360"                          |
//! | 0x000C         | File Type              | 4 bytes: kind of data, e.g. "TLK "                         |
//! | 0x0010         | File Type Version      | 4 bytes: version of the data, e.g. "V0.5"                  |
//! | 0x0014         | Struct Count           | 4 bytes: Number of struct templates                        |
//! | 0x0018         | Data Offset            | 4 bytes: Offset to the data block                          |
//! | 0x001C         | String Count           | 4 bytes: Number of shared strings (V4.1 only)              |
//! | 0x0020         | String Offset          | 4 bytes: Offset to the shared strings (V4.1 only)          |
//!
//! All numbers after the tags are little-endian on PC and big-endian on consoles.
//!
//! ### Struct Templates
//!
//! Directly after the header, one 16 byte template per struct kind:
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Label                  | 4 bytes: Name of the struct kind                        |
//! | 0x0004         | Field Count            | 4 bytes: Number of fields                               |
//! | 0x0008         | Field Offset           | 4 bytes: Offset to the field declarations               |
//! | 0x000C         | Struct Size            | 4 bytes: Size of one struct in the data block           |
//!
//! ### Field Declarations
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Label                  | 4 bytes: Numeric field label                            |
//! | 0x0004         | Type                   | 2 bytes: Value type, or template index for structs      |
//! | 0x0006         | Flags                  | 2 bytes: 0x8000 list, 0x4000 struct, 0x2000 reference   |
//! | 0x0008         | Offset                 | 4 bytes: Position of the value inside its struct        |
//!
//! ### Data Block
//!
//! The top-level struct starts at the data offset. Lists, referenced structs and strings are
//! stored as 32-bit offsets relative to the data offset, `0xFFFFFFFF` meaning none. A list
//! starts with a 32-bit element count. Inline strings start with a 32-bit length counted in
//! code units.
//!

pub mod error;
pub mod gff4;
pub mod types;

pub use gff4::{Field, FieldKind, Gff4File, Gff4Struct, StructId};
pub use types::{FieldType, FourCC, Gff4Version, Platform};
