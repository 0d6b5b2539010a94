//! Deck server - HTTP edge over deck storage and export
//!
//! Three routes: revisioned load and save of whole deck documents, and a
//! synchronous PPTX export. Storage semantics (optimistic revisions,
//! leases) live in the `persistence` crate; this layer only translates
//! them to status codes.

mod routes;
mod state;

pub use routes::*;
pub use state::*;
