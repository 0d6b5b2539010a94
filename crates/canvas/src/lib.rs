//! Canvas - Editing-surface boundary
//!
//! The interactive vector editor is an external collaborator; this crate
//! consumes it strictly at its interface. It provides the `EditingSurface`
//! trait plus the two components that cross that boundary: the deck
//! serializer (surface -> deck document) and the beautify applier
//! (suggestion patches -> surface).

mod surface;
mod serializer;
mod beautify;
mod error;

pub use surface::*;
pub use serializer::*;
pub use beautify::*;
pub use error::*;
