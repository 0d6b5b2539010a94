//! Persistence - Revisioned read/write of deck documents
//!
//! This crate provides the server-side persistence service: whole-document
//! reads and compare-and-write replaces guarded by a monotonically
//! increasing revision, plus advisory lease records (holder + expiry)
//! validated atomically alongside the write. Backends implement the
//! `DeckStorage` trait; memory and file implementations are provided.

mod storage;
mod memory_store;
mod file_store;
mod error;

pub use storage::*;
pub use memory_store::*;
pub use file_store::*;
pub use error::*;
