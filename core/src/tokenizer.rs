use std::collections::BTreeSet;

/// Split text into whitespace-delimited terms, verbatim: no case folding,
/// punctuation kept, no stop words removed.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Distinct terms of one document; repeated tokens count once.
pub fn unique_terms(text: &str) -> BTreeSet<&str> {
    tokenize(text).collect()
}
