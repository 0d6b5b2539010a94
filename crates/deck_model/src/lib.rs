//! Deck Model - Core deck document structure and types
//!
//! This crate provides the data contracts for deck documents: a deck is a
//! pixel canvas with an ordered list of slides, each slide an ordered list
//! of typed shapes. All behavior lives in the crates above; this one is
//! contracts plus validation.

mod deck;
mod shape;
mod color;
mod validate;
mod error;

pub use deck::*;
pub use shape::*;
pub use color::*;
pub use validate::*;
pub use error::*;
