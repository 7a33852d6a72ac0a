use std::{fmt, io};

use serde::{
    de::{SeqAccess, Visitor},
    ser::{Error as _, SerializeSeq},
    Deserialize, Serialize,
};

use crate::table::TalkTable;
use crate::tlk::TlkTalkTable;
use crate::types::{StrRef, TlkEntryData};

/// One string of a dumped talk table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DumpEntry {
    pub strref: StrRef,
    pub text: String,
    pub sound: String,
}

/// Serializes every valid string of a talk table as a sequence of [`DumpEntry`]
///
/// ```
/// use aurora_encoding::Encoding;
/// use aurora_tlk::{serde::Dump, TlkEntryData, TlkTalkTable};
///
/// let mut tlk = TlkTalkTable::new(0, Some(Encoding::Cp1252));
/// tlk.set_entry(0, TlkEntryData::with_text("Hi")).unwrap();
///
/// let json = serde_json::to_string(&Dump(&tlk)).unwrap();
/// assert_eq!(json, r#"[{"strref":0,"text":"Hi","sound":""}]"#);
/// ```
pub struct Dump<'a, T: ?Sized>(pub &'a T);

impl<T: TalkTable + ?Sized> Serialize for Dump<'_, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let str_refs = self.0.str_refs();

        let mut seq = serializer.serialize_seq(Some(str_refs.len()))?;
        for &str_ref in str_refs {
            let Some(string) = self.0.get_string(str_ref).map_err(S::Error::custom)? else {
                continue;
            };

            seq.serialize_element(&DumpEntry {
                strref: str_ref,
                text: string.text,
                sound: string.sound_res_ref,
            })?;
        }
        seq.end()
    }
}

struct TlkTalkTableVisitor {}

impl TlkTalkTableVisitor {
    fn new() -> Self {
        TlkTalkTableVisitor {}
    }
}

impl<'de> Visitor<'de> for TlkTalkTableVisitor {
    type Value = TlkTalkTable<io::Empty>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of talk table strings")
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        use serde::de::Error as _;

        let mut tlk = TlkTalkTable::new(0, None);

        while let Some(entry) = access.next_element::<DumpEntry>()? {
            let data = TlkEntryData {
                text: entry.text,
                sound_res_ref: entry.sound,
                ..Default::default()
            };

            tlk.set_entry(entry.strref, data).map_err(A::Error::custom)?;
        }

        Ok(tlk)
    }
}

/// Builds a flat table without language or encoding from a sequence of [`DumpEntry`]
impl<'de> Deserialize<'de> for TlkTalkTable<io::Empty> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(TlkTalkTableVisitor::new())
    }
}
