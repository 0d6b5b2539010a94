//! The editing-surface interface
//!
//! The live editor keeps its own shape records with surface-native property
//! bags and a fractional ordering key. We never reach into its internals;
//! everything goes through `EditingSurface`. `MemorySurface` is an
//! in-memory implementation for tests and headless use.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Surface-native per-kind properties.
///
/// `Geo` covers the editor's rectangle-like geometry shapes. `Draw`,
/// `Frame`, and `Group` exist on the surface but have no deck counterpart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SurfaceProps {
    Text {
        text: String,
        /// Explicit pixel size, when set on the shape
        font_size: Option<f64>,
        /// Named size token ("s", "m", "l", "xl", "xxl") otherwise
        size_token: Option<String>,
        font: Option<String>,
        /// Style string, may contain "bold" and/or "italic"
        font_style: Option<String>,
        align: Option<String>,
        color: Option<String>,
    },
    Geo {
        /// Geometry name, e.g. "rectangle" or "rounded-rectangle"
        geo: String,
        radius: Option<f64>,
        fill: Option<String>,
        stroke: Option<String>,
        stroke_width: Option<f64>,
    },
    Line {
        stroke: Option<String>,
        stroke_width: Option<f64>,
    },
    Image {
        url: String,
    },
    Draw,
    Frame,
    Group,
}

/// One shape as the editing surface sees it.
///
/// `w`/`h` are the surface's style-block dimensions, resolved to page
/// bounds when the shape has none of its own. `index` is the surface's
/// fractional ordering key; its digits form a monotonic paint-order value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceShape {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub rotation: f64,
    pub index: String,
    pub props: SurfaceProps,
}

/// Change notifications emitted by the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Created(String),
    Updated(String),
    Deleted(String),
}

/// The interface the rest of the system consumes the editor through.
pub trait EditingSurface {
    /// Current shapes in ascending paint order.
    fn shapes_in_paint_order(&self) -> Vec<SurfaceShape>;

    /// Look up a single shape by id.
    fn get_shape(&self, id: &str) -> Option<SurfaceShape>;

    /// Create a shape or replace the one with the same id.
    fn put_shape(&mut self, shape: SurfaceShape);

    /// Remove a shape by id. Unknown ids are a no-op.
    fn delete_shape(&mut self, id: &str);

    /// Apply a set of shape replacements as one visible update.
    fn apply_batch(&mut self, updates: Vec<SurfaceShape>);

    /// Subscribe to change notifications.
    fn subscribe(&self) -> broadcast::Receiver<SurfaceEvent>;
}

/// In-memory editing surface.
pub struct MemorySurface {
    shapes: Vec<SurfaceShape>,
    events: broadcast::Sender<SurfaceEvent>,
    /// Number of `apply_batch` calls, for asserting batch atomicity
    pub batch_calls: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            shapes: Vec::new(),
            events,
            batch_calls: 0,
        }
    }

    fn notify(&self, event: SurfaceEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl EditingSurface for MemorySurface {
    fn shapes_in_paint_order(&self) -> Vec<SurfaceShape> {
        let mut shapes = self.shapes.clone();
        shapes.sort_by(|a, b| a.index.cmp(&b.index));
        shapes
    }

    fn get_shape(&self, id: &str) -> Option<SurfaceShape> {
        self.shapes.iter().find(|s| s.id == id).cloned()
    }

    fn put_shape(&mut self, shape: SurfaceShape) {
        let id = shape.id.clone();
        match self.shapes.iter_mut().find(|s| s.id == shape.id) {
            Some(existing) => {
                *existing = shape;
                self.notify(SurfaceEvent::Updated(id));
            }
            None => {
                self.shapes.push(shape);
                self.notify(SurfaceEvent::Created(id));
            }
        }
    }

    fn delete_shape(&mut self, id: &str) {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        if self.shapes.len() != before {
            self.notify(SurfaceEvent::Deleted(id.to_string()));
        }
    }

    fn apply_batch(&mut self, updates: Vec<SurfaceShape>) {
        self.batch_calls += 1;
        for update in updates {
            let id = update.id.clone();
            if let Some(existing) = self.shapes.iter_mut().find(|s| s.id == update.id) {
                *existing = update;
                self.notify(SurfaceEvent::Updated(id));
            }
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<SurfaceEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(id: &str, index: &str) -> SurfaceShape {
        SurfaceShape {
            id: id.to_string(),
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 40.0,
            rotation: 0.0,
            index: index.to_string(),
            props: SurfaceProps::Text {
                text: "hi".to_string(),
                font_size: None,
                size_token: None,
                font: None,
                font_style: None,
                align: None,
                color: None,
            },
        }
    }

    #[test]
    fn test_paint_order_follows_index() {
        let mut surface = MemorySurface::new();
        surface.put_shape(text("b", "a3"));
        surface.put_shape(text("a", "a1"));
        surface.put_shape(text("c", "a2"));

        let ids: Vec<String> = surface
            .shapes_in_paint_order()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_put_replaces_by_id() {
        let mut surface = MemorySurface::new();
        surface.put_shape(text("a", "a1"));
        let mut moved = text("a", "a1");
        moved.x = 50.0;
        surface.put_shape(moved);

        assert_eq!(surface.shapes_in_paint_order().len(), 1);
        assert_eq!(surface.get_shape("a").unwrap().x, 50.0);
    }

    #[test]
    fn test_events_emitted() {
        let mut surface = MemorySurface::new();
        let mut rx = surface.subscribe();

        surface.put_shape(text("a", "a1"));
        surface.delete_shape("a");
        surface.delete_shape("missing");

        assert_eq!(rx.try_recv().unwrap(), SurfaceEvent::Created("a".to_string()));
        assert_eq!(rx.try_recv().unwrap(), SurfaceEvent::Deleted("a".to_string()));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_batch_skips_unknown_ids() {
        let mut surface = MemorySurface::new();
        surface.put_shape(text("a", "a1"));
        surface.apply_batch(vec![text("a", "a1"), text("ghost", "a9")]);

        assert_eq!(surface.batch_calls, 1);
        assert!(surface.get_shape("ghost").is_none());
    }
}
