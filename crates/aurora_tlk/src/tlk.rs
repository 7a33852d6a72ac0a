//! Flat `V3.0` and `V4.0` talk tables

use std::{
    cell::{OnceCell, RefCell},
    io::{self, Read, Seek, SeekFrom},
};

use aurora_encoding::Encoding;
use aurora_gff::FourCC;
use binrw::BinRead;
use byteorder::{LittleEndian, ReadBytesExt};
use tracing::{debug, instrument, trace};

use crate::color::pre_parse_color_codes;
use crate::error::{Error, Result, ResultExt};
use crate::language::LANGUAGE_INVALID;
use crate::table::TalkTable;
use crate::types::{
    flags, StrRef, TalkString, TlkEntryData, TlkV3Entry, TlkV4Entry, TlkVersion, STRREF_INVALID,
};

/// Tag every flat talk table starts with
pub const TLK_ID: FourCC = FourCC::new(b"TLK ");

/// Offset of the entry table in `V3.0` files, right behind the header
pub(crate) const V3_TABLE_OFFSET: u32 = 20;

/// Offset marking an entry whose text was set in memory
const OFFSET_NONE: u32 = 0xFFFF_FFFF;

/// Upper bound for entries allocated up front, before any of them has been read
const PREALLOCATE_MAX: u32 = 0x1_0000;

#[derive(Debug, Clone)]
pub(crate) struct TlkEntry {
    pub offset: u32,
    pub length: u32,
    pub flags: u32,
    pub sound_res_ref: String,
    pub volume_variance: u32,
    pub pitch_variance: u32,
    pub sound_length: f32,
    pub sound_id: u32,
    pub text: OnceCell<String>,
}

impl Default for TlkEntry {
    fn default() -> Self {
        Self {
            offset: 0,
            length: 0,
            flags: 0,
            sound_res_ref: String::new(),
            volume_variance: 0,
            pitch_variance: 0,
            sound_length: -1.0,
            sound_id: 0xFFFF_FFFF,
            text: OnceCell::new(),
        }
    }
}

impl TlkEntry {
    fn from_v3(entry: TlkV3Entry, strings_offset: u32) -> Self {
        Self {
            offset: entry.offset.wrapping_add(strings_offset),
            length: entry.length,
            flags: entry.flags,
            sound_res_ref: Encoding::Ascii.decode(&entry.sound_res_ref),
            volume_variance: entry.volume_variance,
            pitch_variance: entry.pitch_variance,
            sound_length: entry.sound_length,
            ..Default::default()
        }
    }

    fn from_v4(entry: TlkV4Entry) -> Self {
        Self {
            offset: entry.offset,
            length: entry.length as u32,
            flags: flags::TEXT_PRESENT,
            sound_id: entry.sound_id,
            ..Default::default()
        }
    }

    fn has_text(&self) -> bool {
        self.length > 0 && self.flags & flags::TEXT_PRESENT != 0
    }
}

/// Header fields following the format and version tags
#[derive(Debug, Copy, Clone)]
struct TlkHeader {
    version: TlkVersion,
    language_id: u32,
    entry_count: u32,
    table_offset: u32,
    strings_offset: u32,
}

/// Read the format and version tags.
///
/// Some files store the whole header as UTF-16LE. Those are recognized by the zero high bytes of
/// the first two characters and narrowed back to plain tags.
fn read_tags<R: Read>(reader: &mut R) -> Result<(FourCC, FourCC)> {
    let mut start = [0u8; 4];
    reader.read_exact(&mut start)?;

    if start[1] == 0 && start[3] == 0 {
        let mut rest = [0u8; 12];
        reader.read_exact(&mut rest)?;

        let id = FourCC([start[0], start[2], rest[0], rest[2]]);
        let version = FourCC([rest[4], rest[6], rest[8], rest[10]]);
        return Ok((id, version));
    }

    let mut version = [0u8; 4];
    reader.read_exact(&mut version)?;

    Ok((FourCC(start), FourCC(version)))
}

fn read_header<R: Read>(reader: &mut R) -> Result<TlkHeader> {
    let (id, version_tag) = read_tags(reader)?;
    if id != TLK_ID {
        return Err(Error::FormatMismatch(id));
    }

    let version = TlkVersion::from_tag(version_tag).ok_or(Error::UnsupportedVersion(version_tag))?;

    let language_id = reader.read_u32::<LittleEndian>()?;
    let entry_count = reader.read_u32::<LittleEndian>()?;
    let table_offset = match version {
        TlkVersion::V3 => V3_TABLE_OFFSET,
        TlkVersion::V4 => reader.read_u32::<LittleEndian>()?,
    };
    let strings_offset = reader.read_u32::<LittleEndian>()?;

    Ok(TlkHeader {
        version,
        language_id,
        entry_count,
        table_offset,
        strings_offset,
    })
}

/// A flat talk table
///
/// Entries are read when the table is loaded, their text only when it is first looked up.
///
/// ```no_run
/// use aurora_encoding::Encoding;
/// use aurora_tlk::{TalkTable, TlkTalkTable};
///
/// fn list_strings(path: &str) -> aurora_tlk::error::Result<()> {
///     let file = std::fs::File::open(path)?;
///     let tlk = TlkTalkTable::read(file, Some(Encoding::Cp1252))?;
///
///     for &str_ref in tlk.str_refs() {
///         if let Some(string) = tlk.get_string(str_ref)? {
///             println!("{}: {}", str_ref, string.text);
///         }
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct TlkTalkTable<R> {
    reader: RefCell<R>,
    pub(crate) encoding: Option<Encoding>,
    version: TlkVersion,
    language_id: u32,
    pub(crate) entries: Vec<TlkEntry>,
    str_refs: Vec<StrRef>,
}

impl TlkTalkTable<io::Empty> {
    /// Create an empty table, to be filled with [`TlkTalkTable::set_entry`].
    pub fn new(language_id: u32, encoding: Option<Encoding>) -> Self {
        Self {
            reader: RefCell::new(io::empty()),
            encoding,
            version: TlkVersion::default(),
            language_id,
            entries: Vec::new(),
            str_refs: Vec::new(),
        }
    }

    /// Read the language ID of a flat talk table without loading it.
    ///
    /// Returns [`LANGUAGE_INVALID`] if the data is not a talk table of a known version.
    #[instrument(skip(reader), err)]
    pub fn peek_language_id<S: Read>(mut reader: S) -> Result<u32> {
        let (id, version) = match read_tags(&mut reader) {
            Ok(tags) => tags,
            Err(Error::Truncated) => return Ok(LANGUAGE_INVALID),
            Err(e) => return Err(e),
        };

        if id != TLK_ID || TlkVersion::from_tag(version).is_none() {
            debug!("not a flat talk table ({id}, {version})");
            return Ok(LANGUAGE_INVALID);
        }

        Ok(reader.read_u32::<LittleEndian>()?)
    }
}

impl<R: Read + Seek> TlkTalkTable<R> {
    /// Load the header and entry table of a flat talk table.
    ///
    /// Strings are decoded with `encoding`. Without one every string reads as empty.
    #[instrument(skip(reader), err)]
    pub fn read(mut reader: R, encoding: Option<Encoding>) -> Result<Self> {
        let (header, entries, str_refs) =
            Self::load(&mut reader).context("failed reading TLK file")?;

        Ok(Self {
            reader: RefCell::new(reader),
            encoding,
            version: header.version,
            language_id: header.language_id,
            entries,
            str_refs,
        })
    }

    fn load(reader: &mut R) -> Result<(TlkHeader, Vec<TlkEntry>, Vec<StrRef>)> {
        reader.rewind()?;

        let header = read_header(reader)?;
        debug!(?header, "read TLK header");

        reader.seek(SeekFrom::Start(header.table_offset as u64))?;

        let mut entries = Vec::with_capacity(header.entry_count.min(PREALLOCATE_MAX) as usize);
        let mut str_refs = Vec::new();

        for str_ref in 0..header.entry_count {
            let entry = match header.version {
                TlkVersion::V3 => TlkEntry::from_v3(TlkV3Entry::read(reader)?, header.strings_offset),
                TlkVersion::V4 => TlkEntry::from_v4(TlkV4Entry::read(reader)?),
            };
            trace!(str_ref, offset = entry.offset, length = entry.length, "read entry");

            if entry.has_text() {
                str_refs.push(str_ref);
            }
            entries.push(entry);
        }

        Ok((header, entries, str_refs))
    }

    #[instrument(level = "trace", skip(self, entry), err)]
    fn read_string(&self, entry: &TlkEntry) -> Result<String> {
        if let Some(text) = entry.text.get() {
            return Ok(text.clone());
        }

        if !entry.has_text() {
            return Ok(String::new());
        }

        let Some(encoding) = self.encoding else {
            return Ok(String::new());
        };

        let mut reader = self.reader.borrow_mut();
        let size = reader.seek(SeekFrom::End(0))?;
        let offset = entry.offset as u64;
        if offset >= size {
            return Ok(String::new());
        }

        let length = (entry.length as u64).min(size - offset) as usize;
        let mut data = vec![0u8; length];
        reader.seek(SeekFrom::Start(offset))?;
        reader.read_exact(&mut data)?;

        let text = encoding.decode(&pre_parse_color_codes(&data));
        Ok(entry.text.get_or_init(|| text).clone())
    }

    /// Everything stored about the string `str_ref`, or `None` if the table has no such entry.
    pub fn get_entry(&self, str_ref: StrRef) -> Result<Option<TlkEntryData>> {
        let Some(entry) = self.entries.get(str_ref as usize) else {
            return Ok(None);
        };

        Ok(Some(TlkEntryData {
            text: self.read_string(entry)?,
            sound_res_ref: entry.sound_res_ref.clone(),
            volume_variance: entry.volume_variance,
            pitch_variance: entry.pitch_variance,
            sound_length: entry.sound_length,
            sound_id: entry.sound_id,
        }))
    }

    /// Text of every entry, read from the source if it hasn't been yet
    pub(crate) fn texts(&self) -> Result<Vec<String>> {
        self.entries
            .iter()
            .map(|entry| self.read_string(entry))
            .collect()
    }
}

impl<R> TlkTalkTable<R> {
    pub fn version(&self) -> TlkVersion {
        self.version
    }

    pub fn language_id(&self) -> u32 {
        self.language_id
    }

    pub fn set_language_id(&mut self, language_id: u32) {
        self.language_id = language_id;
    }

    /// Number of entries, including those without text
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Replace the entry `str_ref`, growing the table if it doesn't exist yet.
    ///
    /// Every entry added by growing the table is a valid string reference afterwards, even if it
    /// has no text.
    #[instrument(skip(self, data), err)]
    pub fn set_entry(&mut self, str_ref: StrRef, data: TlkEntryData) -> Result<()> {
        if str_ref == STRREF_INVALID {
            return Err(Error::InvalidStrRef);
        }

        let index = str_ref as usize;
        if index >= self.entries.len() {
            // Everything past the old end is above every registered reference
            let size = self.entries.len() as StrRef;
            self.entries.resize_with(index + 1, TlkEntry::default);
            self.str_refs.extend(size..=str_ref);
        } else if let Err(position) = self.str_refs.binary_search(&str_ref) {
            self.str_refs.insert(position, str_ref);
        }

        let flags = data.flags();
        self.entries[index] = TlkEntry {
            offset: OFFSET_NONE,
            length: 0,
            flags,
            sound_res_ref: data.sound_res_ref,
            volume_variance: data.volume_variance,
            pitch_variance: data.pitch_variance,
            sound_length: data.sound_length,
            sound_id: data.sound_id,
            text: OnceCell::from(data.text),
        };

        Ok(())
    }
}

impl<R: Read + Seek> TalkTable for TlkTalkTable<R> {
    fn encoding(&self) -> Option<Encoding> {
        self.encoding
    }

    fn str_refs(&self) -> &[StrRef] {
        &self.str_refs
    }

    fn get_string(&self, str_ref: StrRef) -> Result<Option<TalkString>> {
        let Some(entry) = self.entries.get(str_ref as usize) else {
            return Ok(None);
        };

        let text = self.read_string(entry)?;
        Ok(Some(TalkString::new(text, entry.sound_res_ref.clone())))
    }
}
