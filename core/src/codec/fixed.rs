use byteorder::{BigEndian, ByteOrder, LittleEndian, WriteBytesExt};

use super::{check_id, require_max_id, term_bytes_len, ByteCursor, Codec};
use crate::error::{IndexError, Result};
use crate::index::InvertedIndex;
use crate::DocId;

const HEADER_LEN: usize = 4;

/// Width of every count and id field in one fixed-width file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueWidth {
    Narrow,
    Wide,
}

impl ValueWidth {
    /// `max_id < 65535` selects 2-byte fields. 65535 itself goes wide even
    /// though it fits in a u16; existing files depend on this boundary.
    pub fn for_max_id(max_id: DocId) -> Self {
        if max_id < 65535 { ValueWidth::Narrow } else { ValueWidth::Wide }
    }

    pub fn bytes(self) -> usize {
        match self {
            ValueWidth::Narrow => 2,
            ValueWidth::Wide => 4,
        }
    }

    fn write(self, out: &mut Vec<u8>, value: u32, what: &str) -> Result<()> {
        match self {
            ValueWidth::Narrow => {
                let v = u16::try_from(value)
                    .map_err(|_| IndexError::Encode(format!("{what} {value} does not fit a 2-byte field")))?;
                out.write_u16::<BigEndian>(v)?;
            }
            ValueWidth::Wide => out.write_u32::<BigEndian>(value)?,
        }
        Ok(())
    }

    fn read(self, cursor: &mut ByteCursor<'_>, what: &str) -> Result<u32> {
        let raw = cursor.take(self.bytes(), what)?;
        Ok(match self {
            ValueWidth::Narrow => BigEndian::read_u16(raw) as u32,
            ValueWidth::Wide => BigEndian::read_u32(raw),
        })
    }
}

/// The fixed-width binary format:
///
/// ```text
/// [4 bytes LE] max_id
/// repeated until EOF:
///   [2 bytes BE]      term byte length
///   [n bytes]         term, UTF-8
///   [width BE]        postings count
///   [count * width]   posting ids, BE
/// ```
///
/// Terms are written in ascending byte order; decoding accepts any order.
///
/// Decoding is stricter than a plain overrun check. A file holding only the
/// header is rejected as corrupt, since encoding never produces one (it
/// refuses an empty index), so such a file can only be a truncated write.
/// Ids above the header's `max_id` and non-UTF-8 terms are rejected too.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWidthCodec;

impl Codec for FixedWidthCodec {
    fn name(&self) -> &'static str { "fixed" }

    fn encode(&self, index: &InvertedIndex) -> Result<Vec<u8>> {
        let max_id = require_max_id(index)?;
        let width = ValueWidth::for_max_id(max_id);
        let mut out = Vec::new();
        out.write_u32::<LittleEndian>(max_id)?;
        for (term, postings) in index.iter() {
            out.write_u16::<BigEndian>(term_bytes_len(term)?)?;
            out.extend_from_slice(term.as_bytes());
            let count = u32::try_from(postings.len())
                .map_err(|_| IndexError::Encode(format!("term {term:?} has too many postings")))?;
            width.write(&mut out, count, "postings count")?;
            for &id in postings {
                width.write(&mut out, id, "posting id")?;
            }
        }
        tracing::debug!(max_id, width = width.bytes(), terms = index.len(), bytes = out.len(), "encoded fixed-width index");
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<InvertedIndex> {
        let mut cursor = ByteCursor::new(bytes);
        let max_id = LittleEndian::read_u32(cursor.take(HEADER_LEN, "header")?);
        let width = ValueWidth::for_max_id(max_id);
        if cursor.is_empty() {
            return Err(IndexError::corrupt("header is not followed by any term record"));
        }
        let mut records = Vec::new();
        while !cursor.is_empty() {
            let term_len = BigEndian::read_u16(cursor.take(2, "term length")?) as usize;
            let term = cursor.term(term_len)?;
            let count = width.read(&mut cursor, "postings count")? as usize;
            let needed = count
                .checked_mul(width.bytes())
                .ok_or_else(|| IndexError::corrupt(format!("postings count {count} overflows")))?;
            if needed > cursor.remaining() {
                return Err(IndexError::corrupt(format!(
                    "term {term:?} declares {count} postings but only {} bytes remain",
                    cursor.remaining()
                )));
            }
            let mut ids = Vec::with_capacity(count);
            for _ in 0..count {
                ids.push(check_id(width.read(&mut cursor, "posting id")? as u64, max_id)?);
            }
            records.push((term, ids));
        }
        tracing::debug!(max_id, width = width.bytes(), terms = records.len(), "decoded fixed-width index");
        Ok(InvertedIndex::from_postings(records))
    }
}
