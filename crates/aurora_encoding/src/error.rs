//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum Error {
    /// The name does not match any supported encoding
    #[error("unknown encoding {0:?}")]
    #[diagnostic(help(
        "supported encodings: ascii, latin9, utf8, utf16le, utf16be, cp1250, cp1251, cp1252, cp932, cp936, cp949, cp950"
    ))]
    UnknownEncoding(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
