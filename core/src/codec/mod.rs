//! On-disk encodings of an [`InvertedIndex`].
//!
//! [`FixedWidthCodec`] is the production format: a 4-byte little-endian
//! `max_id` header followed by one record per term, with every count and id
//! written at a single width chosen from `max_id`. [`VarintCodec`] stores the
//! same mapping with LEB128 integers and gap-encoded ids.

mod fixed;
mod varint;

pub use fixed::{FixedWidthCodec, ValueWidth};
pub use varint::VarintCodec;

use std::fmt;
use std::str::FromStr;

use crate::error::{IndexError, Result};
use crate::index::InvertedIndex;
use crate::DocId;

pub trait Codec: Send + Sync {
    fn name(&self) -> &'static str;
    fn encode(&self, index: &InvertedIndex) -> Result<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> Result<InvertedIndex>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CodecKind {
    #[default]
    Fixed,
    Varint,
}

impl CodecKind {
    pub fn codec(self) -> Box<dyn Codec> {
        match self {
            CodecKind::Fixed => Box::new(FixedWidthCodec),
            CodecKind::Varint => Box::new(VarintCodec),
        }
    }
}

impl FromStr for CodecKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(CodecKind::Fixed),
            "varint" => Ok(CodecKind::Varint),
            other => Err(format!("unknown codec {other:?}, expected \"fixed\" or \"varint\"")),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CodecKind::Fixed => "fixed",
            CodecKind::Varint => "varint",
        })
    }
}

/// Largest id in a non-empty index; encoders refuse anything else.
fn require_max_id(index: &InvertedIndex) -> Result<DocId> {
    index.max_doc_id().ok_or(IndexError::EmptyIndex)
}

fn term_bytes_len(term: &str) -> Result<u16> {
    u16::try_from(term.len())
        .map_err(|_| IndexError::Encode(format!("term of {} bytes exceeds the 65535-byte limit", term.len())))
}

/// Bounds-checked reader over an encoded index. Every short read is a corrupt file.
struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(buf: &'a [u8]) -> Self { Self { buf, pos: 0 } }

    fn remaining(&self) -> usize { self.buf.len() - self.pos }

    fn is_empty(&self) -> bool { self.remaining() == 0 }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(IndexError::corrupt(format!(
                "{what} at offset {} needs {n} bytes but only {} remain",
                self.pos,
                self.remaining()
            )));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn term(&mut self, len: usize) -> Result<String> {
        let at = self.pos;
        let raw = self.take(len, "term")?;
        String::from_utf8(raw.to_vec())
            .map_err(|_| IndexError::corrupt(format!("term at offset {at} is not valid UTF-8")))
    }
}

fn check_id(id: u64, max_id: DocId) -> Result<DocId> {
    if id > max_id as u64 {
        return Err(IndexError::corrupt(format!("posting id {id} exceeds header max id {max_id}")));
    }
    Ok(id as DocId)
}
