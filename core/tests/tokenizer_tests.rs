use invidx_core::tokenizer::{tokenize, unique_terms};

#[test]
fn it_keeps_case_and_punctuation() {
    let words: Vec<&str> = tokenize("Running Runners RUN! The café's menu.").collect();
    assert_eq!(words, vec!["Running", "Runners", "RUN!", "The", "café's", "menu."]);
}

#[test]
fn it_keeps_stopwords() {
    let words = unique_terms("The quick brown fox and the lazy dog");
    assert!(words.contains("The"));
    assert!(words.contains("the"));
    assert!(words.contains("and"));
}
