//! Error types for deck model operations

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckModelError {
    #[error("Shape {id}: {reason}")]
    InvalidShape { id: String, reason: String },

    #[error("Non-finite value in field '{field}' of shape {id}")]
    NonFiniteField { id: String, field: &'static str },

    #[error("Active slide index {active} out of range ({slides} slides)")]
    ActiveOutOfRange { active: usize, slides: usize },

    #[error("Invalid deck: {0}")]
    InvalidDeck(String),
}

pub type Result<T> = std::result::Result<T, DeckModelError>;
