//! Structural validation for decks and shapes
//!
//! The tagged enum already guarantees kind-specific fields are present, so
//! validation is about values: numbers must be finite, ids non-empty, and
//! the active index in range. Zero-sized shapes are valid data; renderers
//! may skip them as noise.

use crate::{Deck, DeckModelError, Result, Shape};

fn check_finite(id: &str, field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DeckModelError::NonFiniteField {
            id: id.to_string(),
            field,
        })
    }
}

/// Validate a single shape's values.
pub fn validate_shape(shape: &Shape) -> Result<()> {
    let base = shape.base();
    if base.id.is_empty() {
        return Err(DeckModelError::InvalidShape {
            id: String::from("<empty>"),
            reason: "shape id must not be empty".to_string(),
        });
    }

    let id = &base.id;
    check_finite(id, "x", base.x)?;
    check_finite(id, "y", base.y)?;
    check_finite(id, "w", base.w)?;
    check_finite(id, "h", base.h)?;
    if let Some(rot) = base.rotation {
        check_finite(id, "rotation", rot)?;
    }

    match shape {
        Shape::Text(s) => check_finite(id, "fontSize", s.font_size)?,
        Shape::Rect(s) => {
            if let Some(r) = s.corner_radius {
                check_finite(id, "cornerRadius", r)?;
            }
            if let Some(w) = s.stroke_width {
                check_finite(id, "strokeWidth", w)?;
            }
        }
        Shape::Line(s) => {
            check_finite(id, "x2", s.x2)?;
            check_finite(id, "y2", s.y2)?;
            if let Some(w) = s.stroke_width {
                check_finite(id, "strokeWidth", w)?;
            }
        }
        Shape::Image(_) => {}
    }

    Ok(())
}

/// Validate a whole deck document.
pub fn validate_deck(deck: &Deck) -> Result<()> {
    if !deck.width.is_finite() || deck.width <= 0.0 {
        return Err(DeckModelError::InvalidDeck(format!(
            "canvas width must be a positive finite number, got {}",
            deck.width
        )));
    }
    if !deck.height.is_finite() || deck.height <= 0.0 {
        return Err(DeckModelError::InvalidDeck(format!(
            "canvas height must be a positive finite number, got {}",
            deck.height
        )));
    }
    if !deck.slides.is_empty() && deck.active >= deck.slides.len() {
        return Err(DeckModelError::ActiveOutOfRange {
            active: deck.active,
            slides: deck.slides.len(),
        });
    }

    for slide in &deck.slides {
        for shape in &slide.shapes {
            validate_shape(shape)?;
        }
    }

    Ok(())
}
