// msgmap core — invoice → chat message map
//
// A bot that posts an invoice into a chat has to find that message again
// later to edit or delete it. This crate keeps that mapping in a single
// JSON file.

pub mod store;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use store::{Identifier, LoadOutcome, MessageMap, MessageRecord, MessageStore, StoreKind};

// ============================================================================
// ERROR TYPES
// ============================================================================

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
