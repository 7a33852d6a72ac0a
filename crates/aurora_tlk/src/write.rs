//! Writing flat talk tables
//!

use std::io::{Cursor, Read, Seek, Write};

use aurora_encoding::Encoding;
use binrw::BinWrite;
use bon::Builder;
use byteorder::{LittleEndian, WriteBytesExt};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::tlk::{TlkTalkTable, TLK_ID, V3_TABLE_OFFSET};
use crate::types::{flags, TlkV3Entry, TlkV4Entry, TlkVersion, SOUND_RES_REF_LENGTH};

/// Size of a `V4.0` header, which also stores the offset of the entry table
const V4_TABLE_OFFSET: u32 = 24;

/// Options for how a flat talk table should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct TlkWriterOptions {
    /// The layout version to write
    #[builder(default)]
    pub version: TlkVersion,

    /// Encoding to write the strings with, instead of the table's own
    pub encoding: Option<Encoding>,
}

impl<R: Read + Seek> TlkTalkTable<R> {
    /// Serialize the whole table.
    ///
    /// Strings not looked up yet are read from the source first. This will return the writer.
    ///
    /// ```
    /// # fn doit() -> aurora_tlk::error::Result<()>
    /// # {
    /// use aurora_encoding::Encoding;
    /// use aurora_tlk::{TlkEntryData, TlkTalkTable, TlkVersion};
    /// use aurora_tlk::write::TlkWriterOptions;
    ///
    /// let mut tlk = TlkTalkTable::new(0, Some(Encoding::Cp1252));
    /// tlk.set_entry(0, TlkEntryData::with_text("Hello"))?;
    ///
    /// let buffer = tlk.write(
    ///     Vec::new(),
    ///     TlkWriterOptions::builder().version(TlkVersion::V4).build(),
    /// )?;
    /// assert_eq!(&buffer[..8], b"TLK V4.0");
    /// # Ok(())
    /// # }
    /// # doit().unwrap();
    /// ```
    #[instrument(skip(self, writer), err)]
    pub fn write<W: Write>(&self, mut writer: W, options: TlkWriterOptions) -> Result<W> {
        let encoding = options
            .encoding
            .or(self.encoding)
            .ok_or(Error::MissingEncoding)?;

        let texts = self
            .texts()?
            .iter()
            .map(|text| encoding.encode(text))
            .collect::<Vec<_>>();

        let entry_count = self.entries.len() as u32;
        let (table_offset, entry_size) = match options.version {
            TlkVersion::V3 => (V3_TABLE_OFFSET, TlkV3Entry::SIZE),
            TlkVersion::V4 => (V4_TABLE_OFFSET, TlkV4Entry::SIZE),
        };
        let strings_offset = table_offset + entry_count * entry_size;

        // Entries are built in memory first, so the header can be written to any sink
        let mut table = Cursor::new(Vec::with_capacity((entry_count * entry_size) as usize));
        let mut position = 0u32;

        for (entry, text) in self.entries.iter().zip(&texts) {
            match options.version {
                TlkVersion::V3 => {
                    let res_ref = entry.sound_res_ref.as_bytes();
                    if res_ref.len() > SOUND_RES_REF_LENGTH {
                        return Err(Error::StringTooLong {
                            what: "sound resource name",
                            length: res_ref.len(),
                            max: SOUND_RES_REF_LENGTH,
                        });
                    }

                    let mut sound_res_ref = [0u8; SOUND_RES_REF_LENGTH];
                    sound_res_ref[..res_ref.len()].copy_from_slice(res_ref);

                    let mut entry_flags = entry.flags & !flags::TEXT_PRESENT;
                    if !text.is_empty() {
                        entry_flags |= flags::TEXT_PRESENT;
                    }

                    TlkV3Entry {
                        flags: entry_flags,
                        sound_res_ref,
                        volume_variance: entry.volume_variance,
                        pitch_variance: entry.pitch_variance,
                        offset: position,
                        length: text.len() as u32,
                        sound_length: entry.sound_length,
                    }
                    .write(&mut table)?;
                }
                TlkVersion::V4 => {
                    let length = u16::try_from(text.len()).map_err(|_| Error::StringTooLong {
                        what: "string",
                        length: text.len(),
                        max: u16::MAX as usize,
                    })?;

                    TlkV4Entry {
                        sound_id: entry.sound_id,
                        offset: strings_offset + position,
                        length,
                    }
                    .write(&mut table)?;
                }
            }

            position += text.len() as u32;
        }

        debug!(
            entry_count,
            strings_offset,
            strings_size = position,
            "writing TLK file"
        );

        writer.write_all(&TLK_ID.0)?;
        writer.write_all(&options.version.tag().0)?;
        writer.write_u32::<LittleEndian>(self.language_id())?;
        writer.write_u32::<LittleEndian>(entry_count)?;
        if options.version == TlkVersion::V4 {
            writer.write_u32::<LittleEndian>(table_offset)?;
        }
        writer.write_u32::<LittleEndian>(strings_offset)?;

        writer.write_all(table.get_ref())?;
        for text in &texts {
            writer.write_all(text)?;
        }

        Ok(writer)
    }
}
