use std::collections::BTreeMap;

use crate::documents::Documents;
use crate::index::{InvertedIndex, PostingList};
use crate::tokenizer::unique_terms;
use crate::Term;

/// Build the term -> posting set mapping for a loaded corpus.
pub fn build_index(documents: &Documents) -> InvertedIndex {
    let mut postings: BTreeMap<Term, PostingList> = BTreeMap::new();
    for (&doc_id, text) in documents {
        for term in unique_terms(text) {
            // avoid allocating a key for terms already seen
            match postings.get_mut(term) {
                Some(list) => {
                    list.insert(doc_id);
                }
                None => {
                    postings.insert(term.to_string(), PostingList::from([doc_id]));
                }
            }
        }
    }
    tracing::info!(num_docs = documents.len(), num_terms = postings.len(), "built inverted index");
    InvertedIndex::from_map(postings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_term_once_per_document() {
        let docs = Documents::from([(789, "A A B".to_string()), (1, "B".to_string())]);
        let idx = build_index(&docs);
        assert_eq!(idx.postings("A").map(|p| p.len()), Some(1));
        assert_eq!(idx.query(&["B"]).into_iter().collect::<Vec<_>>(), vec![1, 789]);
    }

    #[test]
    fn empty_corpus_builds_empty_index() {
        assert!(build_index(&Documents::new()).is_empty());
    }
}
