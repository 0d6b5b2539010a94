//! Deck and slide containers

use crate::Shape;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default canvas size in pixels (16:9)
pub const DEFAULT_CANVAS_WIDTH: f64 = 1920.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1080.0;

/// Optional slide background
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One slide: stable id, optional background, shapes in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create an empty slide with a generated id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            background: None,
            shapes: Vec::new(),
        }
    }

    pub fn with_shapes(shapes: Vec<Shape>) -> Self {
        let mut slide = Self::new();
        slide.shapes = shapes;
        slide.sort_shapes_by_z();
        slide
    }

    /// Stable sort by ascending `z`; ties keep their original order, which
    /// is what makes paint order deterministic for duplicate keys.
    pub fn sort_shapes_by_z(&mut self) {
        self.shapes.sort_by_key(|s| s.z());
    }
}

impl Default for Slide {
    fn default() -> Self {
        Self::new()
    }
}

/// The top-level deck document: canonical pixel canvas plus slides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub width: f64,
    pub height: f64,
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub active: usize,
}

impl Deck {
    /// Create an empty deck at the given canvas size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            slides: Vec::new(),
            active: 0,
        }
    }

    /// The slide currently being edited, if any.
    pub fn active_slide(&self) -> Option<&Slide> {
        self.slides.get(self.active)
    }

    pub fn active_slide_mut(&mut self) -> Option<&mut Slide> {
        self.slides.get_mut(self.active)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RectShape, ShapeBase};

    fn rect(id: &str, z: i64) -> Shape {
        Shape::Rect(RectShape {
            base: ShapeBase {
                id: id.to_string(),
                x: 0.0,
                y: 0.0,
                w: 10.0,
                h: 10.0,
                z,
                rotation: None,
            },
            corner_radius: None,
            fill: None,
            stroke: None,
            stroke_width: None,
        })
    }

    #[test]
    fn test_sort_by_z_ascending() {
        let mut slide = Slide::new();
        slide.shapes = vec![rect("a", 3), rect("b", 1), rect("c", 2)];
        slide.sort_shapes_by_z();

        let ids: Vec<&str> = slide.shapes.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut slide = Slide::new();
        slide.shapes = vec![rect("first", 5), rect("second", 5), rect("low", 1)];
        slide.sort_shapes_by_z();

        let ids: Vec<&str> = slide.shapes.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["low", "first", "second"]);
    }

    #[test]
    fn test_active_slide() {
        let mut deck = Deck::default();
        assert!(deck.active_slide().is_none());

        deck.slides.push(Slide::new());
        deck.slides.push(Slide::new());
        deck.active = 1;
        assert_eq!(deck.active_slide().unwrap().id, deck.slides[1].id);
    }

    #[test]
    fn test_deck_wire_round_trip() {
        let mut deck = Deck::new(1280.0, 720.0);
        deck.slides.push(Slide::with_shapes(vec![rect("r", 0)]));

        let json = serde_json::to_string(&deck).unwrap();
        let back: Deck = serde_json::from_str(&json).unwrap();
        assert_eq!(back, deck);
    }
}
