//! Corpus loading: one `<id> <text>` document per line.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::DocId;

pub type Documents = BTreeMap<DocId, String>;

/// What to do when the corpus repeats a document id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// The later line replaces the earlier one.
    #[default]
    LastWriteWins,
    Reject,
}

pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<Documents> {
    load_documents_with(path, DuplicatePolicy::default())
}

pub fn load_documents_with<P: AsRef<Path>>(path: P, policy: DuplicatePolicy) -> Result<Documents> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| IndexError::from_io_at(e, path))?;
    let docs = parse_documents(BufReader::new(f), policy)?;
    tracing::debug!(path = %path.display(), num_docs = docs.len(), "loaded corpus");
    Ok(docs)
}

/// Parse a corpus from any reader. Stops at the first malformed line.
pub fn parse_documents<R: BufRead>(reader: R, policy: DuplicatePolicy) -> Result<Documents> {
    let mut docs = Documents::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else { continue };
        let id: DocId = first.parse().map_err(|_| IndexError::Format {
            line: lineno,
            reason: format!("invalid document id {first:?}"),
        })?;
        let text = tokens.collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            return Err(IndexError::Format { line: lineno, reason: format!("document {id} has no text") });
        }
        if docs.insert(id, text).is_some() && policy == DuplicatePolicy::Reject {
            return Err(IndexError::DuplicateDocument { id, line: lineno });
        }
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Documents> {
        parse_documents(s.as_bytes(), DuplicatePolicy::LastWriteWins)
    }

    #[test]
    fn rejoins_text_with_single_spaces() {
        let docs = parse("290\tA  A (named a  , plural aes )\n").unwrap();
        assert_eq!(docs[&290], "A A (named a , plural aes )");
    }

    #[test]
    fn last_write_wins_by_default() {
        let docs = parse("1 first\n1 second\n").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[&1], "second");
    }

    #[test]
    fn reject_policy_flags_duplicates() {
        let err = parse_documents("1 first\n\n1 second\n".as_bytes(), DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, IndexError::DuplicateDocument { id: 1, line: 3 }));
    }

    #[test]
    fn skips_blank_lines() {
        let docs = parse("1 a\n   \n2 b\n").unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn bad_id_aborts() {
        let err = parse("1 ok\nabc text\n3 never read\n").unwrap_err();
        assert!(matches!(err, IndexError::Format { line: 2, .. }));
        assert!(matches!(parse("-4 negative\n").unwrap_err(), IndexError::Format { line: 1, .. }));
        assert!(matches!(parse("4294967296 too big\n").unwrap_err(), IndexError::Format { .. }));
    }

    #[test]
    fn id_without_text_aborts() {
        assert!(matches!(parse("12\n").unwrap_err(), IndexError::Format { line: 1, .. }));
    }
}
