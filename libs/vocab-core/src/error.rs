//! Error types for vocab-core.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using TrainerError.
pub type Result<T> = std::result::Result<T, TrainerError>;

/// Errors raised by the word store, selector and trainer.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("{field} text must not be empty")]
    EmptyField { field: &'static str },

    #[error("word not found: {0}")]
    WordNotFound(Uuid),

    #[error("not enough words: {required} required, {available} available")]
    InsufficientWords { required: usize, available: usize },

    #[error("no word available to present")]
    NoWordAvailable,

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors raised by a key-value storage provider when writing.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}
