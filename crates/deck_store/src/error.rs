//! Error types for deck session operations

use thiserror::Error;

/// Errors surfaced by a `DeckBackend`.
///
/// `Conflict` and `LeaseHeld` are normal optimistic-concurrency outcomes
/// that the store handles itself; `Unavailable` is the backing store
/// failing and propagates verbatim.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Revision conflict")]
    Conflict,

    #[error("Lease held by {0}")]
    LeaseHeld(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

#[derive(Debug, Error)]
pub enum DeckStoreError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("No deck loaded in this session")]
    NoDeck,
}

pub type Result<T> = std::result::Result<T, DeckStoreError>;
