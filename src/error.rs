//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! A missing record is not an error: reads return `Ok(None)` instead.

use crate::models::RecordKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Stream read error: {0}")]
    StreamRead(String),

    #[error("Failed to write {kind} record '{key}': {message}")]
    StoreWrite {
        kind: RecordKind,
        key: String,
        message: String,
    },

    /// One record of a card landed and the other did not.
    #[error("Card {id} partially written ({written} stored): {source}")]
    PartialWrite {
        id: String,
        written: RecordKind,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to read {kind} record '{key}': {message}")]
    StoreRead {
        kind: RecordKind,
        key: String,
        message: String,
    },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn store_write(kind: RecordKind, key: &str, message: impl ToString) -> Self {
        Self::StoreWrite {
            kind,
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn store_read(kind: RecordKind, key: &str, message: impl ToString) -> Self {
        Self::StoreRead {
            kind,
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
