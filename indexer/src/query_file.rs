//! Line-delimited query files in one of the two supported text encodings.

use anyhow::{anyhow, Context, Result};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
use invidx_core::IndexError;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEncoding {
    Utf8,
    Cp1251,
}

impl QueryEncoding {
    fn encoding(self) -> &'static Encoding {
        match self {
            QueryEncoding::Utf8 => UTF_8,
            QueryEncoding::Cp1251 => WINDOWS_1251,
        }
    }
}

/// Read a query file (`-` for stdin) and return one entry per line.
pub fn read_query_lines(path: &Path, encoding: QueryEncoding) -> Result<Vec<String>> {
    let mut raw = Vec::new();
    if path == Path::new("-") {
        io::stdin().lock().read_to_end(&mut raw).context("reading queries from stdin")?;
    } else {
        let mut f = File::open(path).map_err(|e| IndexError::from_io_at(e, path))?;
        f.read_to_end(&mut raw).with_context(|| format!("reading {}", path.display()))?;
    }
    decode_lines(&raw, encoding).with_context(|| format!("decoding query file {}", path.display()))
}

pub fn decode_lines(raw: &[u8], encoding: QueryEncoding) -> Result<Vec<String>> {
    let text = encoding
        .encoding()
        .decode_without_bom_handling_and_without_replacement(raw)
        .ok_or_else(|| anyhow!("input is not valid {}", encoding.encoding().name()))?;
    Ok(text.lines().map(str::to_string).collect())
}
