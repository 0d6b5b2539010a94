//! PPTX Export - deck document to presentation file
//!
//! Converts a deck's first slide into a self-contained `.pptx` on a fixed
//! 10in x 5.625in (16:9) surface. The pixel-to-inch transform is
//! anisotropic by design: a non-16:9 deck is distorted to fill the slide,
//! never letterboxed. Images are fetched at render time; a broken image
//! drops that shape and the export continues.

mod transform;
mod package;
mod slide_xml;
mod media;
mod writer;
mod error;

pub use transform::*;
pub use package::*;
pub use slide_xml::*;
pub use media::*;
pub use writer::*;
pub use error::*;
