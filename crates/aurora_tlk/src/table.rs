//! The interface shared by all talk tables

use std::io::{Read, Seek};

use aurora_encoding::Encoding;
use aurora_gff::FourCC;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::gff::GffTalkTable;
use crate::tlk::TlkTalkTable;
use crate::types::{StrRef, TalkString};

/// A table of localized strings, looked up by [`StrRef`]
pub trait TalkTable {
    /// Encoding the strings are decoded with, `None` if unknown
    fn encoding(&self) -> Option<Encoding>;

    /// Every valid string reference, in ascending order
    fn str_refs(&self) -> &[StrRef];

    /// Look up a string, `None` if the table has no entry for `str_ref`
    fn get_string(&self, str_ref: StrRef) -> Result<Option<TalkString>>;

    fn len(&self) -> usize {
        self.str_refs().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Either kind of talk table, picked by the tag at the start of the data
#[derive(Debug)]
pub enum AnyTalkTable<R> {
    Tlk(TlkTalkTable<R>),
    Gff(GffTalkTable),
}

impl<R: Read + Seek> AnyTalkTable<R> {
    #[instrument(skip(reader), err)]
    pub fn read(mut reader: R, encoding: Option<Encoding>) -> Result<Self> {
        let mut tag = [0u8; 4];
        reader.read_exact(&mut tag)?;
        reader.rewind()?;

        match &tag {
            b"TLK " | &[b'T', 0, b'L', 0] => {
                debug!("reading flat talk table");
                Ok(AnyTalkTable::Tlk(TlkTalkTable::read(reader, encoding)?))
            }
            b"GFF " => {
                debug!("reading GFF talk table");
                Ok(AnyTalkTable::Gff(GffTalkTable::read(reader, encoding)?))
            }
            _ => Err(Error::FormatMismatch(FourCC(tag))),
        }
    }
}

impl<R: Read + Seek> TalkTable for AnyTalkTable<R> {
    fn encoding(&self) -> Option<Encoding> {
        match self {
            AnyTalkTable::Tlk(tlk) => tlk.encoding(),
            AnyTalkTable::Gff(gff) => gff.encoding(),
        }
    }

    fn str_refs(&self) -> &[StrRef] {
        match self {
            AnyTalkTable::Tlk(tlk) => tlk.str_refs(),
            AnyTalkTable::Gff(gff) => gff.str_refs(),
        }
    }

    fn get_string(&self, str_ref: StrRef) -> Result<Option<TalkString>> {
        match self {
            AnyTalkTable::Tlk(tlk) => tlk.get_string(str_ref),
            AnyTalkTable::Gff(gff) => gff.get_string(str_ref),
        }
    }
}
