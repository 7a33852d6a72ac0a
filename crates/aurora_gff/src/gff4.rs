//! Types for reading GFF4 files
//!

use std::{
    collections::HashMap,
    io::{Cursor, Read},
};

use aurora_encoding::Encoding;
use binrw::{BinRead, Endian, NullString};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use indexmap::IndexMap;
use tracing::{debug, instrument, trace};

use crate::{
    error::{Error, Result},
    types::{
        FieldDeclaration, FieldType, FourCC, Gff4Ident, Gff4Layout, Gff4Version, Platform,
        StructTemplate,
    },
};

/// Offset value marking an absent list, struct or string
const NONE_OFFSET: u32 = 0xFFFF_FFFF;

/// Upper bound for elements allocated up front, before any of them has been read
const PREALLOCATE_MAX: u64 = 0x1_0000;

/// Handle to a struct owned by a [`Gff4File`]
///
/// Handles stay valid for as long as the file they came from is alive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructId(usize);

/// How the value of a field is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A single value of a simple type
    Scalar(FieldType),
    /// A list of simple values
    ScalarList(FieldType),
    /// A single struct, `None` when the reference is empty
    Struct(Option<StructId>),
    /// A list of structs, individual references may be empty
    StructList(Vec<Option<StructId>>),
}

/// A field of a loaded struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: u32,
    pub kind: FieldKind,
    pub reference: bool,
    /// Absolute position of the field's value in the file
    pub offset: u64,
}

/// A struct loaded from a GFF4 file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gff4Struct {
    label: FourCC,
    template: u32,
    offset: u64,
    fields: IndexMap<u32, Field>,
}

impl Gff4Struct {
    /// Label of the template this struct was created from
    pub fn label(&self) -> FourCC {
        self.label
    }

    /// Absolute position of the struct in the file
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field_labels(&self) -> impl Iterator<Item = u32> + '_ {
        self.fields.keys().copied()
    }

    pub fn has_field(&self, label: u32) -> bool {
        self.fields.contains_key(&label)
    }

    pub fn field(&self, label: u32) -> Option<&Field> {
        self.fields.get(&label)
    }
}

/// Bounds checked, byte order aware view over the file data
#[derive(Clone, Copy)]
struct DataView<'a> {
    data: &'a [u8],
    endian: Endian,
}

impl<'a> DataView<'a> {
    fn bytes(&self, pos: u64, len: u64) -> Result<&'a [u8]> {
        let end = pos.checked_add(len).ok_or(Error::Truncated)?;
        if end > self.data.len() as u64 {
            trace!(pos, len, size = self.data.len(), "read past end of data");
            return Err(Error::Truncated);
        }
        Ok(&self.data[pos as usize..end as usize])
    }

    /// Number of bytes from `pos` to the end of the data
    fn remaining(&self, pos: u64) -> u64 {
        (self.data.len() as u64).saturating_sub(pos)
    }

    fn u8(&self, pos: u64) -> Result<u8> {
        Ok(self.bytes(pos, 1)?[0])
    }

    fn u16(&self, pos: u64) -> Result<u16> {
        let b = self.bytes(pos, 2)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_u16(b),
            Endian::Big => BigEndian::read_u16(b),
        })
    }

    fn u32(&self, pos: u64) -> Result<u32> {
        let b = self.bytes(pos, 4)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_u32(b),
            Endian::Big => BigEndian::read_u32(b),
        })
    }

    fn u64(&self, pos: u64) -> Result<u64> {
        let b = self.bytes(pos, 8)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_u64(b),
            Endian::Big => BigEndian::read_u64(b),
        })
    }
}

/// Builds the struct arena by walking every struct reachable from the top-level struct.
///
/// Structs are keyed by template and position so shared references resolve to the same
/// [`StructId`] and reference cycles terminate.
struct StructLoader<'a> {
    view: DataView<'a>,
    data_offset: u64,
    templates: &'a [StructTemplate],
    declarations: &'a [Vec<FieldDeclaration>],
    structs: Vec<Gff4Struct>,
    seen: HashMap<(u32, u64), StructId>,
    pending: Vec<StructId>,
}

impl<'a> StructLoader<'a> {
    fn load(mut self) -> Result<Vec<Gff4Struct>> {
        self.alloc(0, self.data_offset)?;

        while let Some(id) = self.pending.pop() {
            self.populate(id)?;
        }

        Ok(self.structs)
    }

    fn alloc(&mut self, template: u32, offset: u64) -> Result<StructId> {
        if let Some(id) = self.seen.get(&(template, offset)) {
            return Ok(*id);
        }

        let label = self
            .templates
            .get(template as usize)
            .ok_or(Error::InvalidTemplate(template))?
            .label;

        let id = StructId(self.structs.len());
        self.structs.push(Gff4Struct {
            label,
            template,
            offset,
            fields: IndexMap::new(),
        });
        self.seen.insert((template, offset), id);
        self.pending.push(id);

        Ok(id)
    }

    fn populate(&mut self, id: StructId) -> Result<()> {
        let (template, offset) = {
            let s = &self.structs[id.0];
            (s.template, s.offset)
        };

        let declarations = self.declarations;
        let declarations = &declarations[template as usize];
        let mut fields = IndexMap::with_capacity(declarations.len());

        for declaration in declarations {
            let position = offset + declaration.offset as u64;
            let field_type = FieldType::from_declaration(declaration);

            let kind = match (field_type, declaration.is_list()) {
                (FieldType::Struct(child), false) => {
                    let child_offset = if declaration.is_reference() {
                        self.resolve(self.view.u32(position)?)
                    } else {
                        Some(position)
                    };

                    FieldKind::Struct(match child_offset {
                        Some(o) => Some(self.alloc(child, o)?),
                        None => None,
                    })
                }
                (FieldType::Struct(child), true) => {
                    FieldKind::StructList(self.load_list(declaration, child, position)?)
                }
                (t, false) => FieldKind::Scalar(t),
                (t, true) => FieldKind::ScalarList(t),
            };

            fields.insert(
                declaration.label,
                Field {
                    label: declaration.label,
                    kind,
                    reference: declaration.is_reference(),
                    offset: position,
                },
            );
        }

        trace!(?id, fields = fields.len(), "loaded struct");
        self.structs[id.0].fields = fields;

        Ok(())
    }

    fn load_list(
        &mut self,
        declaration: &FieldDeclaration,
        template: u32,
        position: u64,
    ) -> Result<Vec<Option<StructId>>> {
        let Some(list) = self.resolve(self.view.u32(position)?) else {
            return Ok(Vec::new());
        };

        let struct_size = self
            .templates
            .get(template as usize)
            .ok_or(Error::InvalidTemplate(template))?
            .struct_size as u64;

        let count = self.view.u32(list)? as u64;
        let stride = if declaration.is_reference() { 4 } else { struct_size };

        // Make sure the whole list is inside the file before allocating for it. Elements of
        // empty structs take no space, but there can't be more of them than bytes left.
        self.view.bytes(list + 4, count * stride)?;
        if count > self.view.remaining(list + 4) {
            trace!(list, count, "list longer than the data");
            return Err(Error::Truncated);
        }

        let mut elements = Vec::with_capacity(count.min(PREALLOCATE_MAX) as usize);
        for i in 0..count {
            let element = list + 4 + i * stride;
            let id = if declaration.is_reference() {
                match self.resolve(self.view.u32(element)?) {
                    Some(o) => Some(self.alloc(template, o)?),
                    None => None,
                }
            } else {
                Some(self.alloc(template, element)?)
            };
            elements.push(id);
        }

        Ok(elements)
    }

    fn resolve(&self, relative: u32) -> Option<u64> {
        (relative != NONE_OFFSET).then(|| self.data_offset + relative as u64)
    }
}

/// A parsed GFF4 file
///
/// All structs are loaded up front into an arena owned by the file; fields are only decoded
/// when they are requested.
///
/// ```no_run
/// use aurora_gff::{FourCC, Gff4File};
///
/// fn count_top_level_fields(data: Vec<u8>) -> aurora_gff::error::Result<usize> {
///     let gff = Gff4File::new(data, FourCC::new(b"TLK "))?;
///     let top = gff.top_level();
///
///     Ok(gff.get_struct(top).map(|s| s.field_count()).unwrap_or_default())
/// }
/// ```
#[derive(Debug)]
pub struct Gff4File {
    ident: Gff4Ident,
    version: Gff4Version,
    platform: Platform,
    layout: Gff4Layout,
    structs: Vec<Gff4Struct>,
    shared_strings: Vec<String>,
    data: Vec<u8>,
}

impl Gff4File {
    /// Read a whole GFF4 file from `reader`, requiring it to hold data of type `file_type`.
    pub fn read<R: Read>(mut reader: R, file_type: FourCC) -> Result<Gff4File> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        Self::new(data, file_type)
    }

    /// Parse a GFF4 file held in memory, requiring it to hold data of type `file_type`.
    #[instrument(skip(data), fields(size = data.len()), err)]
    pub fn new(data: Vec<u8>, file_type: FourCC) -> Result<Gff4File> {
        let mut cursor = Cursor::new(data.as_slice());

        let ident = Gff4Ident::read(&mut cursor)?;
        let version = Gff4Version::from_tag(ident.version).ok_or(Error::UnsupportedVersion {
            what: "version",
            tag: ident.version,
        })?;
        let platform = Platform::from_tag(ident.platform).ok_or(Error::UnsupportedVersion {
            what: "platform",
            tag: ident.platform,
        })?;

        if ident.file_type != file_type {
            return Err(Error::WrongFileType {
                expected: file_type,
                found: ident.file_type,
            });
        }

        let endian = platform.endian();
        let layout = Gff4Layout::read_options(&mut cursor, endian, (version.has_shared_strings(),))?;
        debug!(
            ?version,
            ?platform,
            type_version = %ident.type_version,
            structs = layout.struct_count,
            data_offset = layout.data_offset,
            "read GFF4 header"
        );

        if layout.struct_count == 0 {
            return Err(Error::InvalidTemplate(0));
        }

        let templates = (0..layout.struct_count)
            .map(|_| StructTemplate::read_options(&mut cursor, endian, ()))
            .collect::<binrw::BinResult<Vec<_>>>()?;

        let declarations = templates
            .iter()
            .map(|template| {
                cursor.set_position(template.field_offset as u64);
                (0..template.field_count)
                    .map(|_| FieldDeclaration::read_options(&mut cursor, endian, ()))
                    .collect::<binrw::BinResult<Vec<_>>>()
            })
            .collect::<binrw::BinResult<Vec<_>>>()?;

        let mut shared_strings =
            Vec::with_capacity((layout.string_count as u64).min(PREALLOCATE_MAX) as usize);
        if layout.string_count > 0 {
            cursor.set_position(layout.string_offset as u64);
            for _ in 0..layout.string_count {
                let s = NullString::read_options(&mut cursor, endian, ())?;
                shared_strings.push(String::from_utf8_lossy(&s.0).into_owned());
            }
        }

        let structs = StructLoader {
            view: DataView {
                data: data.as_slice(),
                endian,
            },
            data_offset: layout.data_offset as u64,
            templates: &templates,
            declarations: &declarations,
            structs: Vec::new(),
            seen: HashMap::new(),
            pending: Vec::new(),
        }
        .load()?;
        debug!(structs = structs.len(), "loaded GFF4 structs");

        Ok(Gff4File {
            ident,
            version,
            platform,
            layout,
            structs,
            shared_strings,
            data,
        })
    }

    pub fn version(&self) -> Gff4Version {
        self.version
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The kind of data held in this file, e.g. `TLK `
    pub fn file_type(&self) -> FourCC {
        self.ident.file_type
    }

    /// The version of the data held in this file
    pub fn type_version(&self) -> FourCC {
        self.ident.type_version
    }

    /// The root struct of the file
    pub fn top_level(&self) -> StructId {
        StructId(0)
    }

    /// Number of structs loaded from the file
    pub fn struct_count(&self) -> usize {
        self.structs.len()
    }

    pub fn get_struct(&self, id: StructId) -> Option<&Gff4Struct> {
        self.structs.get(id.0)
    }

    pub fn has_field(&self, id: StructId, label: u32) -> bool {
        self.field(id, label).is_some()
    }

    pub fn field(&self, id: StructId, label: u32) -> Option<&Field> {
        self.get_struct(id).and_then(|s| s.field(label))
    }

    fn view(&self) -> DataView<'_> {
        DataView {
            data: &self.data,
            endian: self.platform.endian(),
        }
    }

    fn scalar(
        &self,
        id: StructId,
        label: u32,
        expected: &'static str,
    ) -> Result<Option<(FieldType, u64)>> {
        match self.field(id, label) {
            None => Ok(None),
            Some(Field {
                kind: FieldKind::Scalar(t),
                offset,
                ..
            }) => Ok(Some((*t, *offset))),
            Some(_) => Err(Error::FieldTypeMismatch { label, expected }),
        }
    }

    /// Read an integer field as unsigned; signed values are sign extended.
    ///
    /// Returns `None` if the struct has no such field.
    pub fn get_uint(&self, id: StructId, label: u32) -> Result<Option<u64>> {
        let Some((field_type, pos)) = self.scalar(id, label, "unsigned integer")? else {
            return Ok(None);
        };

        let view = self.view();
        let value = match field_type {
            FieldType::UInt8 => view.u8(pos)? as u64,
            FieldType::SInt8 => view.u8(pos)? as i8 as u64,
            FieldType::UInt16 => view.u16(pos)? as u64,
            FieldType::SInt16 => view.u16(pos)? as i16 as u64,
            FieldType::UInt32 => view.u32(pos)? as u64,
            FieldType::SInt32 => view.u32(pos)? as i32 as u64,
            FieldType::UInt64 | FieldType::SInt64 => view.u64(pos)?,
            _ => {
                return Err(Error::FieldTypeMismatch {
                    label,
                    expected: "unsigned integer",
                })
            }
        };

        Ok(Some(value))
    }

    /// Read an integer field as signed.
    ///
    /// Returns `None` if the struct has no such field.
    pub fn get_sint(&self, id: StructId, label: u32) -> Result<Option<i64>> {
        let Some((field_type, pos)) = self.scalar(id, label, "signed integer")? else {
            return Ok(None);
        };

        let view = self.view();
        let value = match field_type {
            FieldType::UInt8 => view.u8(pos)? as i64,
            FieldType::SInt8 => view.u8(pos)? as i8 as i64,
            FieldType::UInt16 => view.u16(pos)? as i64,
            FieldType::SInt16 => view.u16(pos)? as i16 as i64,
            FieldType::UInt32 => view.u32(pos)? as i64,
            FieldType::SInt32 => view.u32(pos)? as i32 as i64,
            FieldType::UInt64 | FieldType::SInt64 => view.u64(pos)? as i64,
            _ => {
                return Err(Error::FieldTypeMismatch {
                    label,
                    expected: "signed integer",
                })
            }
        };

        Ok(Some(value))
    }

    /// Read a string field, decoding inline strings with `encoding`.
    ///
    /// Inline strings store their length in code units of the encoding. Shared strings of `V4.1`
    /// files are always UTF-8 and ignore `encoding`.
    pub fn get_string(
        &self,
        id: StructId,
        label: u32,
        encoding: Encoding,
    ) -> Result<Option<String>> {
        let Some((field_type, pos)) = self.scalar(id, label, "string")? else {
            return Ok(None);
        };

        if field_type != FieldType::String {
            return Err(Error::FieldTypeMismatch {
                label,
                expected: "string",
            });
        }

        let view = self.view();
        let value = view.u32(pos)?;
        if value == NONE_OFFSET {
            return Ok(Some(String::new()));
        }

        if self.version.has_shared_strings() && !self.shared_strings.is_empty() {
            return Ok(Some(
                self.shared_strings
                    .get(value as usize)
                    .cloned()
                    .unwrap_or_default(),
            ));
        }

        let start = self.layout.data_offset as u64 + value as u64;
        let length = view.u32(start)? as u64;
        let bytes = view.bytes(start + 4, length * encoding.bytes_per_unit() as u64)?;

        Ok(Some(encoding.decode(bytes)))
    }

    /// Get the raw bytes of a simple field or a list of simple values.
    ///
    /// The bytes are in the file's byte order.
    pub fn get_data(&self, id: StructId, label: u32) -> Result<Option<&[u8]>> {
        let Some(field) = self.field(id, label) else {
            return Ok(None);
        };

        let mismatch = Error::FieldTypeMismatch {
            label,
            expected: "raw data",
        };
        if field.reference {
            return Err(mismatch);
        }

        let view = self.view();
        match &field.kind {
            FieldKind::Scalar(t) => {
                let size = t.size().ok_or(mismatch)?;
                Ok(Some(view.bytes(field.offset, size)?))
            }
            FieldKind::ScalarList(t) => {
                let size = t.size().ok_or(mismatch)?;
                let list = view.u32(field.offset)?;
                if list == NONE_OFFSET {
                    return Ok(Some(&[]));
                }

                let start = self.layout.data_offset as u64 + list as u64;
                let count = view.u32(start)? as u64;
                Ok(Some(view.bytes(start + 4, count * size)?))
            }
            _ => Err(mismatch),
        }
    }

    /// Get the structs of a struct list field.
    pub fn get_list(&self, id: StructId, label: u32) -> Result<Option<&[Option<StructId>]>> {
        match self.field(id, label).map(|f| &f.kind) {
            None => Ok(None),
            Some(FieldKind::StructList(list)) => Ok(Some(list)),
            Some(_) => Err(Error::FieldTypeMismatch {
                label,
                expected: "struct list",
            }),
        }
    }

    /// Get the struct of a single struct field.
    pub fn get_child(&self, id: StructId, label: u32) -> Result<Option<StructId>> {
        match self.field(id, label).map(|f| &f.kind) {
            None => Ok(None),
            Some(FieldKind::Struct(child)) => Ok(*child),
            Some(_) => Err(Error::FieldTypeMismatch {
                label,
                expected: "struct",
            }),
        }
    }
}
