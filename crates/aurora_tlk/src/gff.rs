//! Talk tables stored in GFF4 containers
//!
//! `V0.2` tables hold a list of string records with plain string fields. `V0.5` tables compress
//! every string into one Huffman coded bitstream that is stored next to its decoding tree, and
//! records only store where in the bitstream their string starts.

use std::io::Read;

use aurora_encoding::Encoding;
use aurora_gff::{FourCC, Gff4File, StructId};
use indexmap::IndexMap;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result, ResultExt};
use crate::huffman;
use crate::table::TalkTable;
use crate::types::{GffTlkVersion, StrRef, TalkString, STRREF_INVALID};

/// GFF file type of talk tables
pub const GFF_TLK_ID: FourCC = FourCC::new(b"TLK ");

/// Field labels used by talk table containers
pub mod labels {
    pub const TALK_STRING_LIST: u32 = 19000;
    pub const TALK_STRING_ID: u32 = 19001;
    pub const TALK_STRING: u32 = 19002;
    pub const HUFF_TALK_STRING_LIST: u32 = 19003;
    pub const HUFF_TREE: u32 = 19004;
    pub const HUFF_BITSTREAM: u32 = 19005;
    pub const HUFF_STRING_ID: u32 = 19006;
    pub const HUFF_BIT_OFFSET: u32 = 19007;
}

/// Text of `V0.2` strings read without an encoding
const PLACEHOLDER: &str = "[???]";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct GffEntry {
    record: StructId,
    bit_offset: u32,
}

/// A talk table stored in a GFF4 container
///
/// ```no_run
/// use aurora_encoding::Encoding;
/// use aurora_tlk::{GffTalkTable, TalkTable};
///
/// fn first_string(path: &str) -> aurora_tlk::error::Result<Option<String>> {
///     let file = std::fs::File::open(path)?;
///     let tlk = GffTalkTable::read(file, Some(Encoding::Utf16Le))?;
///
///     let Some(&str_ref) = tlk.str_refs().first() else {
///         return Ok(None);
///     };
///
///     Ok(tlk.get_string(str_ref)?.map(|s| s.text))
/// }
/// ```
#[derive(Debug)]
pub struct GffTalkTable {
    gff: Gff4File,
    encoding: Option<Encoding>,
    version: GffTlkVersion,
    entries: IndexMap<StrRef, GffEntry>,
    str_refs: Vec<StrRef>,
}

impl GffTalkTable {
    /// Read a whole talk table container from `reader`.
    ///
    /// `V0.2` strings are decoded with `encoding`, `V0.5` strings are always UTF-16.
    #[instrument(skip(reader), err)]
    pub fn read<R: Read>(reader: R, encoding: Option<Encoding>) -> Result<Self> {
        Self::load(reader, encoding).context("unable to load GFF TLK")
    }

    fn load<R: Read>(reader: R, encoding: Option<Encoding>) -> Result<Self> {
        let gff = Gff4File::read(reader, GFF_TLK_ID)?;

        let version = GffTlkVersion::from_tag(gff.type_version())
            .ok_or(Error::UnsupportedVersion(gff.type_version()))?;
        debug!(?version, platform = ?gff.platform(), "read GFF TLK header");

        let mut table = Self {
            gff,
            encoding,
            version,
            entries: IndexMap::new(),
            str_refs: Vec::new(),
        };

        match version {
            GffTlkVersion::V02 => table.load_v02()?,
            GffTlkVersion::V05 => table.load_v05()?,
        }

        table.str_refs = table.entries.keys().copied().collect();
        table.str_refs.sort_unstable();

        Ok(table)
    }

    fn load_v02(&mut self) -> Result<()> {
        let top = self.gff.top_level();
        let Some(records) = self.gff.get_list(top, labels::TALK_STRING_LIST)? else {
            return Ok(());
        };

        for record in records.iter().flatten().copied() {
            let str_ref = self.read_str_ref(record, labels::TALK_STRING_ID)?;
            if str_ref == STRREF_INVALID {
                continue;
            }

            self.entries.insert(
                str_ref,
                GffEntry {
                    record,
                    bit_offset: 0,
                },
            );
        }

        Ok(())
    }

    fn load_v05(&mut self) -> Result<()> {
        let top = self.gff.top_level();

        let required = [
            labels::HUFF_TALK_STRING_LIST,
            labels::HUFF_TREE,
            labels::HUFF_BITSTREAM,
        ];
        if let Some(&label) = required
            .iter()
            .find(|&&label| !self.gff.has_field(top, label))
        {
            warn!(
                "{}, loading an empty talk table",
                Error::MissingRequiredField(label)
            );
            return Ok(());
        }

        let Some(records) = self.gff.get_list(top, labels::HUFF_TALK_STRING_LIST)? else {
            return Ok(());
        };

        for record in records.iter().flatten().copied() {
            let str_ref = self.read_str_ref(record, labels::HUFF_STRING_ID)?;
            if str_ref == STRREF_INVALID {
                continue;
            }

            let bit_offset = self
                .gff
                .get_uint(record, labels::HUFF_BIT_OFFSET)?
                .unwrap_or_default() as u32;

            self.entries
                .insert(str_ref, GffEntry { record, bit_offset });
        }

        Ok(())
    }

    fn read_str_ref(&self, record: StructId, label: u32) -> Result<StrRef> {
        let id = self.gff.get_uint(record, label)?;

        Ok(id
            .and_then(|id| StrRef::try_from(id).ok())
            .unwrap_or(STRREF_INVALID))
    }

    pub fn version(&self) -> GffTlkVersion {
        self.version
    }

    /// The container the table was read from
    pub fn gff(&self) -> &Gff4File {
        &self.gff
    }

    fn read_string(&self, entry: &GffEntry) -> Result<String> {
        match self.version {
            GffTlkVersion::V02 => self.read_string_v02(entry),
            GffTlkVersion::V05 => self.read_string_v05(entry),
        }
    }

    fn read_string_v02(&self, entry: &GffEntry) -> Result<String> {
        let Some(encoding) = self.encoding else {
            return Ok(PLACEHOLDER.to_string());
        };

        Ok(self
            .gff
            .get_string(entry.record, labels::TALK_STRING, encoding)?
            .unwrap_or_default())
    }

    #[instrument(level = "trace", skip(self), err)]
    fn read_string_v05(&self, entry: &GffEntry) -> Result<String> {
        let top = self.gff.top_level();

        let tree = self.gff.get_data(top, labels::HUFF_TREE)?;
        let bitstream = self.gff.get_data(top, labels::HUFF_BITSTREAM)?;

        let (Some(tree), Some(bitstream)) = (tree, bitstream) else {
            return Ok(String::new());
        };

        huffman::decode(tree, bitstream, entry.bit_offset)
    }
}

impl TalkTable for GffTalkTable {
    fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    fn str_refs(&self) -> &[StrRef] {
        &self.str_refs
    }

    fn get_string(&self, str_ref: StrRef) -> Result<Option<TalkString>> {
        let Some(entry) = self.entries.get(&str_ref) else {
            return Ok(None);
        };

        let text = self.read_string(entry)?;
        Ok(Some(TalkString::new(text, String::new())))
    }
}
