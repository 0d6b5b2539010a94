//! Error types for PPTX export

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// A structurally empty deck is the only whole-export failure; every
    /// per-shape problem is swallowed and logged instead.
    #[error("Cannot export an empty deck: no slides")]
    EmptyDeck,

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;
