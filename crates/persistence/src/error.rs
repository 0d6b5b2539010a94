//! Error types for persistence operations

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    /// The caller's revision is behind the stored one; stored state is
    /// unchanged. The client is expected to reload and discard its delta.
    #[error("Revision conflict: caller rev {caller} behind stored rev {stored}")]
    Conflict { caller: u64, stored: u64 },

    /// A live lease is held by another editor.
    #[error("Lease held by {holder} until {expires_at}")]
    LeaseHeld {
        holder: String,
        expires_at: DateTime<Utc>,
    },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        PersistError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(err: serde_json::Error) -> Self {
        PersistError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PersistError>;
