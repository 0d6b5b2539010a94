//! Deck Store - the client side of the persistence story
//!
//! One `DeckStore` holds the single authoritative in-memory deck for an
//! editing session, together with its last-known revision. Mutations are
//! synchronous; persistence runs over an async `DeckBackend` and never
//! blocks mutation handling. Autosave coalesces mutation bursts into one
//! debounced save and guarantees at most one save in flight per deck.

mod store;
mod backend;
mod autosave;
mod error;

pub use store::*;
pub use backend::*;
pub use autosave::*;
pub use error::*;
