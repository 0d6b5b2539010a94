//! Error types for canvas boundary operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Malformed suggestion payload: {0}")]
    MalformedSuggestions(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CanvasError>;
