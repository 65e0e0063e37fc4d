use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::codec::ValueWidth;
use crate::{DocId, Term};

pub type PostingList = BTreeSet<DocId>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub terms: usize,
    pub postings: usize,
    pub max_doc_id: Option<DocId>,
    /// Byte width the fixed-width codec would pick for counts and ids.
    pub value_width: Option<u8>,
}

/// Term -> set of document ids. Immutable once built; no posting list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    postings: BTreeMap<Term, PostingList>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Build from raw (term, ids) pairs. Terms with no ids are dropped, repeated terms are replaced.
    pub fn from_postings<I, T, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (T, P)>,
        T: Into<Term>,
        P: IntoIterator<Item = DocId>,
    {
        let mut postings = BTreeMap::new();
        for (term, ids) in entries {
            let ids: PostingList = ids.into_iter().collect();
            let term = term.into();
            if ids.is_empty() {
                postings.remove(&term);
            } else {
                postings.insert(term, ids);
            }
        }
        Self { postings }
    }

    pub(crate) fn from_map(postings: BTreeMap<Term, PostingList>) -> Self {
        debug_assert!(postings.values().all(|p| !p.is_empty()));
        Self { postings }
    }

    /// AND query: documents containing every term.
    ///
    /// Terms are visited in input order and the first term missing from the
    /// index ends the query with an empty result. An empty term list also
    /// yields an empty result rather than every document.
    pub fn query<S: AsRef<str>>(&self, terms: &[S]) -> BTreeSet<DocId> {
        let mut acc: Option<BTreeSet<DocId>> = None;
        for term in terms {
            let Some(postings) = self.postings.get(term.as_ref()) else {
                return BTreeSet::new();
            };
            acc = Some(match acc {
                None => postings.clone(),
                Some(prev) => prev.intersection(postings).copied().collect(),
            });
        }
        acc.unwrap_or_default()
    }

    pub fn postings(&self, term: &str) -> Option<&PostingList> { self.postings.get(term) }

    /// Terms with their posting lists, in ascending byte order of the term.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingList)> {
        self.postings.iter().map(|(t, p)| (t.as_str(), p))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> { self.postings.keys().map(String::as_str) }

    pub fn len(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn max_doc_id(&self) -> Option<DocId> {
        self.postings.values().filter_map(|p| p.last().copied()).max()
    }

    pub fn stats(&self) -> IndexStats {
        let max_doc_id = self.max_doc_id();
        IndexStats {
            terms: self.len(),
            postings: self.postings.values().map(BTreeSet::len).sum(),
            max_doc_id,
            value_width: max_doc_id.map(|m| ValueWidth::for_max_id(m).bytes() as u8),
        }
    }
}

/// Comma-joined ids, the line format printed for one query.
pub fn format_hits(hits: &BTreeSet<DocId>) -> String {
    hits.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(",")
}
