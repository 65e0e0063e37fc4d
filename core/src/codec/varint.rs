use super::{check_id, require_max_id, term_bytes_len, ByteCursor, Codec};
use crate::error::{IndexError, Result};
use crate::index::InvertedIndex;

/// LEB128 layout: `max_id`, then per term `len, bytes, count, gaps...`.
/// Ids are written ascending as gaps from the previous id; the first is absolute.
/// Like [`super::FixedWidthCodec`], a header with no term records is corrupt.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarintCodec;

pub(crate) fn put_varint(mut x: u64, out: &mut Vec<u8>) {
    while x >= 0x80 {
        out.push(((x as u8) & 0x7F) | 0x80);
        x >>= 7;
    }
    out.push(x as u8);
}

impl ByteCursor<'_> {
    fn varint(&mut self, what: &str) -> Result<u64> {
        let start = self.pos;
        let mut shift = 0u32;
        let mut val = 0u64;
        loop {
            let byte = self.take(1, what)?[0] as u64;
            // the tenth byte may only carry bit 63
            if shift == 63 && byte > 1 {
                return Err(IndexError::corrupt(format!("{what} at offset {start} overflows 64 bits")));
            }
            val |= (byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(val);
            }
            shift += 7;
            if shift > 63 {
                return Err(IndexError::corrupt(format!("{what} at offset {start} is longer than 10 bytes")));
            }
        }
    }
}

impl Codec for VarintCodec {
    fn name(&self) -> &'static str { "varint" }

    fn encode(&self, index: &InvertedIndex) -> Result<Vec<u8>> {
        let max_id = require_max_id(index)?;
        let mut out = Vec::new();
        put_varint(max_id as u64, &mut out);
        for (term, postings) in index.iter() {
            put_varint(term_bytes_len(term)? as u64, &mut out);
            out.extend_from_slice(term.as_bytes());
            put_varint(postings.len() as u64, &mut out);
            let mut prev = 0u64;
            for &id in postings {
                put_varint(id as u64 - prev, &mut out);
                prev = id as u64;
            }
        }
        tracing::debug!(max_id, terms = index.len(), bytes = out.len(), "encoded varint index");
        Ok(out)
    }

    fn decode(&self, bytes: &[u8]) -> Result<InvertedIndex> {
        let mut cursor = ByteCursor::new(bytes);
        let max_id = cursor.varint("header")?;
        let max_id = u32::try_from(max_id)
            .map_err(|_| IndexError::corrupt(format!("header max id {max_id} does not fit 32 bits")))?;
        if cursor.is_empty() {
            return Err(IndexError::corrupt("header is not followed by any term record"));
        }
        let mut records = Vec::new();
        while !cursor.is_empty() {
            let term_len = cursor.varint("term length")?;
            if term_len > u16::MAX as u64 {
                return Err(IndexError::corrupt(format!("term length {term_len} exceeds 65535")));
            }
            let term = cursor.term(term_len as usize)?;
            let count = cursor.varint("postings count")?;
            // every id takes at least one byte
            if count > cursor.remaining() as u64 {
                return Err(IndexError::corrupt(format!(
                    "term {term:?} declares {count} postings but only {} bytes remain",
                    cursor.remaining()
                )));
            }
            let mut ids = Vec::with_capacity(count as usize);
            let mut prev = 0u64;
            for _ in 0..count {
                let id = prev
                    .checked_add(cursor.varint("posting gap")?)
                    .ok_or_else(|| IndexError::corrupt("posting gap overflows"))?;
                ids.push(check_id(id, max_id)?);
                prev = id;
            }
            records.push((term, ids));
        }
        tracing::debug!(max_id, terms = records.len(), "decoded varint index");
        Ok(InvertedIndex::from_postings(records))
    }
}
