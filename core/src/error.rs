//! Error types for loading, encoding and decoding an index

use std::path::PathBuf;
use thiserror::Error;

use crate::DocId;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("resource not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    #[error("malformed corpus line {line}: {reason}")]
    Format { line: usize, reason: String },

    #[error("duplicate document id {id} on line {line}")]
    DuplicateDocument { id: DocId, line: usize },

    #[error("cannot encode an index without postings")]
    EmptyIndex,

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IndexError {
    /// Wrap an open/read failure, turning `NotFound` into `ResourceNotFound`.
    pub fn from_io_at(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            IndexError::ResourceNotFound { path: path.into() }
        } else {
            IndexError::Io(err)
        }
    }

    pub fn corrupt(msg: impl Into<String>) -> Self {
        IndexError::CorruptIndex(msg.into())
    }
}
