//! Error types that can be emitted from this library
//!

use aurora_gff::FourCC;
use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(binrw::Error),

    /// Transparent warpper for [`aurora_gff::error::Error`]
    #[error(transparent)]
    #[diagnostic(transparent)]
    Gff(aurora_gff::error::Error),

    /// The data is not a talk table
    #[error("not a talk table ({0})")]
    FormatMismatch(FourCC),

    /// A talk table of a version we can't read
    #[error("unsupported talk table version {0}")]
    UnsupportedVersion(FourCC),

    /// The data ends before a field that has to be read
    #[error("talk table data is truncated")]
    Truncated,

    /// A field the talk table can't do without
    #[error("required field {0} is missing")]
    MissingRequiredField(u32),

    /// The Huffman tree walk ran past the end of the tree or the bitstream
    #[error("huffman decoding ran past the end of the {blob} at index {index}")]
    DecodeOverrun { blob: &'static str, index: u64 },

    /// A string is too long for the field it has to be written to
    #[error("{what} is {length} bytes long, at most {max} fit")]
    StringTooLong {
        what: &'static str,
        length: usize,
        max: usize,
    },

    /// Strings can't be written without knowing their encoding
    #[error("an encoding is required to write strings")]
    MissingEncoding,

    /// `0xFFFFFFFF` never names a string
    #[error("0xFFFFFFFF is not a valid string reference")]
    InvalidStrRef,

    /// {context}
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap the error with a description of what was being done when it happened
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The error at the bottom of a context chain
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root_cause(),
            e => e,
        }
    }

    /// Every context added to the error, from the innermost outward
    pub fn contexts(&self) -> Vec<&str> {
        match self {
            Error::Context { context, source } => {
                let mut inner = source.contexts();
                inner.push(context.as_str());
                inner
            }
            _ => Vec::new(),
        }
    }
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
            binrw::Error::Io(e) => e.into(),
            binrw::Error::Backtrace(backtrace) => (*backtrace.error).into(),
            e => Error::BinRWError(e),
        }
    }
}

impl From<aurora_gff::error::Error> for Error {
    fn from(value: aurora_gff::error::Error) -> Self {
        use aurora_gff::error::Error as GffError;

        match value {
            GffError::WrongFileType { found, .. } => Error::FormatMismatch(found),
            GffError::Truncated => Error::Truncated,
            e => Error::Gff(e),
        }
    }
}

/// Add context to the error of a [`Result`]
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for core::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| Into::<Error>::into(e).context(context))
    }
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::{Error, ResultExt};

    #[test]
    fn context_chain() {
        let result: Result<(), Error> = Err(Error::Truncated);
        let error = result
            .context("reading entry table")
            .context("failed reading TLK file")
            .unwrap_err();

        assert!(matches!(error.root_cause(), Error::Truncated));
        assert_eq!(
            error.contexts(),
            vec!["reading entry table", "failed reading TLK file"]
        );
        assert_eq!(error.to_string(), "failed reading TLK file");
    }

    #[test]
    fn eof_is_truncation() {
        let error: Error = std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into();
        assert!(matches!(error, Error::Truncated));
    }
}
