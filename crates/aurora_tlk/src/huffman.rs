//! Decoding of strings compressed into a Huffman coded bitstream
//!
//! `V0.5` talk tables share one Huffman tree and one bitstream between all their strings. Each
//! string record only stores the bit offset its characters start at.
//!
//! The tree is an array of signed 32-bit nodes, two per internal node, with the root at the end.
//! Walking it one bit at a time, a non-negative value is the index of the next internal node and
//! a negative value is a leaf holding the UTF-16 code unit `0xFFFF - value`. A string ends with
//! the first decoded NUL.
//!
//! The bitstream is an array of little-endian 32-bit words, consumed from the least significant
//! bit upward.

use byteorder::{ByteOrder, LittleEndian};
use tracing::instrument;
use widestring::U16CString;

use crate::error::{Error, Result};

struct BitCursor<'a> {
    words: &'a [u8],
    index: u64,
    shift: u32,
}

impl<'a> BitCursor<'a> {
    fn new(words: &'a [u8], bit_offset: u32) -> Self {
        Self {
            words,
            index: (bit_offset >> 5) as u64,
            shift: bit_offset & 0x1F,
        }
    }

    fn next_bit(&mut self) -> Result<u32> {
        let start = self.index * 4;
        let word = self
            .words
            .get(start as usize..start as usize + 4)
            .map(LittleEndian::read_u32)
            .ok_or(Error::DecodeOverrun {
                blob: "bitstream",
                index: self.index,
            })?;

        let bit = (word >> self.shift) & 1;

        self.shift += 1;
        self.index += (self.shift >> 5) as u64;
        self.shift %= 32;

        Ok(bit)
    }
}

fn node(tree: &[u8], index: i64) -> Result<i64> {
    let start = index as usize * 4;

    tree.get(start..start + 4)
        .map(|b| LittleEndian::read_i32(b) as i64)
        .ok_or(Error::DecodeOverrun {
            blob: "tree",
            index: index as u64,
        })
}

/// Decode the string starting at `bit_offset`.
#[instrument(level = "trace", skip(tree, bitstream), err)]
pub fn decode(tree: &[u8], bitstream: &[u8], bit_offset: u32) -> Result<String> {
    let root = (tree.len() / 8) as i64 - 1;
    let mut cursor = BitCursor::new(bitstream, bit_offset);
    let mut units: Vec<u16> = Vec::new();

    loop {
        let mut e = root;
        while e >= 0 {
            let bit = cursor.next_bit()?;
            e = node(tree, e * 2 + bit as i64)?;
        }

        let unit = (0xFFFF - e) as u16;
        units.push(unit);

        if unit == 0 {
            break;
        }
    }

    Ok(U16CString::from_vec_truncate(units).to_string_lossy())
}
