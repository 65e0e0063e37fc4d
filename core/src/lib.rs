pub mod builder;
pub mod codec;
pub mod documents;
pub mod error;
pub mod index;
pub mod persist;
pub mod tokenizer;

pub use builder::build_index;
pub use codec::{Codec, CodecKind, FixedWidthCodec, ValueWidth, VarintCodec};
pub use documents::{load_documents, load_documents_with, parse_documents, Documents, DuplicatePolicy};
pub use error::{IndexError, Result};
pub use index::{format_hits, IndexStats, InvertedIndex, PostingList};

pub type DocId = u32;
pub type Term = String;
