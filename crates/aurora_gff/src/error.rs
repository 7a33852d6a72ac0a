//! Error types that can be emitted from this library
//!

use miette::Diagnostic;
use thiserror::Error;

use crate::types::FourCC;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// File does not start with the GFF magic
    #[error("file is not a GFF file")]
    InvalidFile,

    /// The GFF version or platform is not one we know how to read
    #[error("unsupported GFF {what} {tag}")]
    UnsupportedVersion { what: &'static str, tag: FourCC },

    /// The GFF holds a different kind of data than the caller asked for
    #[error("GFF has invalid type {found} (expected {expected})")]
    WrongFileType { expected: FourCC, found: FourCC },

    /// A struct or field points outside of the file
    #[error("GFF data is truncated")]
    Truncated,

    /// A struct template index that does not exist
    #[error("GFF struct template {0} out of range")]
    InvalidTemplate(u32),

    /// The field exists but can't be read as the requested type
    #[error("GFF field {label} can't be read as {expected}")]
    FieldTypeMismatch { label: u32, expected: &'static str },
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        match value.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::Truncated,
            _ => Error::IOError(value),
        }
    }
}

impl From<binrw::Error> for Error {
    fn from(value: binrw::Error) -> Self {
        match value {
            binrw::Error::BadMagic { .. } => Error::InvalidFile,
            binrw::Error::Io(e) => e.into(),
            binrw::Error::Backtrace(backtrace) => (*backtrace.error).into(),
            e => Error::BinRWError(e),
        }
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
