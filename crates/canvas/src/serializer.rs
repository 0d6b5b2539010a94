//! Deck serializer
//!
//! Walks the editing surface in ascending paint order and maps each
//! supported kind into its deck model variant. Freehand ink, frames, and
//! groups are intentionally omitted; they have no export representation.
//! Serializing twice with no intervening edits yields structurally
//! identical output.

use crate::{EditingSurface, SurfaceProps, SurfaceShape};
use deck_model::{
    resolve_color, Deck, ImageShape, LineShape, RectShape, Shape, ShapeBase, Slide, TextAlign,
    TextShape,
};

/// Named text sizes used by the surface when no explicit pixel size is set.
const SIZE_TOKENS: &[(&str, f64)] = &[
    ("s", 16.0),
    ("m", 22.0),
    ("l", 28.0),
    ("xl", 36.0),
    ("xxl", 48.0),
];

const DEFAULT_FONT_SIZE: f64 = 22.0;
const DEFAULT_TEXT_COLOR: &str = "#0B1220";
const DEFAULT_FILL: &str = "#FFFFFF";
const DEFAULT_STROKE: &str = "#111111";
const ROUNDED_RECT_RADIUS: f64 = 12.0;

/// The serializer always emits a single current slide with this id, so
/// repeated serialization is structurally identical.
const CURRENT_SLIDE_ID: &str = "slide-0";

/// Derive the numeric paint-order key from the surface's fractional index.
/// The index string grows monotonically; its digits do too.
fn z_from_index(index: &str) -> i64 {
    let digits: String = index.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

fn resolve_or(color: Option<&str>, fallback: &str) -> String {
    color
        .and_then(resolve_color)
        .unwrap_or_else(|| fallback.to_string())
}

fn font_size_of(font_size: Option<f64>, size_token: Option<&str>) -> f64 {
    if let Some(px) = font_size {
        return px;
    }
    size_token
        .and_then(|t| SIZE_TOKENS.iter().find(|(name, _)| *name == t))
        .map(|(_, px)| *px)
        .unwrap_or(DEFAULT_FONT_SIZE)
}

fn align_of(align: Option<&str>) -> TextAlign {
    match align {
        Some("center") => TextAlign::Center,
        Some("right") => TextAlign::Right,
        _ => TextAlign::Left,
    }
}

fn base_of(shape: &SurfaceShape) -> ShapeBase {
    ShapeBase {
        id: shape.id.clone(),
        x: shape.x,
        y: shape.y,
        w: shape.w,
        h: shape.h,
        z: z_from_index(&shape.index),
        rotation: if shape.rotation == 0.0 {
            None
        } else {
            Some(shape.rotation)
        },
    }
}

fn convert(shape: &SurfaceShape) -> Option<Shape> {
    match &shape.props {
        SurfaceProps::Text {
            text,
            font_size,
            size_token,
            font,
            font_style,
            align,
            color,
        } => {
            let style = font_style.as_deref().unwrap_or("");
            Some(Shape::Text(TextShape {
                base: base_of(shape),
                text: text.clone(),
                font_size: font_size_of(*font_size, size_token.as_deref()),
                font_family: Some(font.clone().unwrap_or_else(|| "Calibri".to_string())),
                bold: Some(style.contains("bold")),
                italic: Some(style.contains("italic")),
                align: Some(align_of(align.as_deref())),
                color: Some(resolve_or(color.as_deref(), DEFAULT_TEXT_COLOR)),
            }))
        }
        SurfaceProps::Geo {
            geo,
            radius,
            fill,
            stroke,
            stroke_width,
        } => {
            let corner_radius = radius.unwrap_or(if geo == "rounded-rectangle" {
                ROUNDED_RECT_RADIUS
            } else {
                0.0
            });
            Some(Shape::Rect(RectShape {
                base: base_of(shape),
                corner_radius: Some(corner_radius),
                fill: Some(resolve_or(fill.as_deref(), DEFAULT_FILL)),
                stroke: Some(resolve_or(stroke.as_deref(), DEFAULT_STROKE)),
                stroke_width: Some(stroke_width.unwrap_or(2.0)),
            }))
        }
        SurfaceProps::Line {
            stroke,
            stroke_width,
        } => Some(Shape::Line(LineShape {
            base: base_of(shape),
            x2: shape.x + shape.w,
            y2: shape.y + shape.h,
            stroke: Some(resolve_or(stroke.as_deref(), DEFAULT_STROKE)),
            stroke_width: Some(stroke_width.unwrap_or(2.0)),
        })),
        SurfaceProps::Image { url } => Some(Shape::Image(ImageShape {
            base: base_of(shape),
            url: url.clone(),
        })),
        SurfaceProps::Draw | SurfaceProps::Frame | SurfaceProps::Group => {
            tracing::debug!(id = %shape.id, "skipping surface shape with no deck counterpart");
            None
        }
    }
}

/// Serialize the surface's current page into a one-slide deck at the given
/// canvas size.
pub fn serialize_surface<S: EditingSurface>(surface: &S, canvas_w: f64, canvas_h: f64) -> Deck {
    let mut shapes: Vec<Shape> = surface
        .shapes_in_paint_order()
        .iter()
        .filter_map(convert)
        .collect();
    shapes.sort_by_key(|s| s.z());

    Deck {
        width: canvas_w,
        height: canvas_h,
        slides: vec![Slide {
            id: CURRENT_SLIDE_ID.to_string(),
            background: None,
            shapes,
        }],
        active: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySurface;

    fn surface_shape(id: &str, index: &str, props: SurfaceProps) -> SurfaceShape {
        SurfaceShape {
            id: id.to_string(),
            x: 10.0,
            y: 20.0,
            w: 300.0,
            h: 80.0,
            rotation: 0.0,
            index: index.to_string(),
            props,
        }
    }

    fn populated_surface() -> MemorySurface {
        let mut surface = MemorySurface::new();
        surface.put_shape(surface_shape(
            "t1",
            "a2",
            SurfaceProps::Text {
                text: "Title".to_string(),
                font_size: None,
                size_token: Some("xl".to_string()),
                font: None,
                font_style: Some("bold".to_string()),
                align: Some("center".to_string()),
                color: Some("ink".to_string()),
            },
        ));
        surface.put_shape(surface_shape(
            "r1",
            "a1",
            SurfaceProps::Geo {
                geo: "rounded-rectangle".to_string(),
                radius: None,
                fill: Some("white".to_string()),
                stroke: None,
                stroke_width: Some(1.5),
            },
        ));
        surface.put_shape(surface_shape("d1", "a3", SurfaceProps::Draw));
        surface.put_shape(surface_shape(
            "i1",
            "a4",
            SurfaceProps::Image {
                url: "https://example.com/x.png".to_string(),
            },
        ));
        surface
    }

    #[test]
    fn test_unsupported_kinds_omitted() {
        let surface = populated_surface();
        let deck = serialize_surface(&surface, 1920.0, 1080.0);

        let ids: Vec<&str> = deck.slides[0].shapes.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["r1", "t1", "i1"]);
    }

    #[test]
    fn test_z_derived_from_index() {
        let surface = populated_surface();
        let deck = serialize_surface(&surface, 1920.0, 1080.0);

        let zs: Vec<i64> = deck.slides[0].shapes.iter().map(|s| s.z()).collect();
        assert_eq!(zs, vec![1, 2, 4]);
    }

    #[test]
    fn test_text_mapping() {
        let surface = populated_surface();
        let deck = serialize_surface(&surface, 1920.0, 1080.0);

        let Shape::Text(text) = &deck.slides[0].shapes[1] else {
            panic!("expected text shape");
        };
        assert_eq!(text.font_size, 36.0);
        assert_eq!(text.bold, Some(true));
        assert_eq!(text.italic, Some(false));
        assert_eq!(text.align, Some(TextAlign::Center));
        assert_eq!(text.color.as_deref(), Some("#0B1220"));
        assert_eq!(text.font_family.as_deref(), Some("Calibri"));
    }

    #[test]
    fn test_rounded_rect_default_radius() {
        let surface = populated_surface();
        let deck = serialize_surface(&surface, 1920.0, 1080.0);

        let Shape::Rect(rect) = &deck.slides[0].shapes[0] else {
            panic!("expected rect shape");
        };
        assert_eq!(rect.corner_radius, Some(12.0));
        assert_eq!(rect.fill.as_deref(), Some("#FFFFFF"));
        assert_eq!(rect.stroke.as_deref(), Some("#111111"));
    }

    #[test]
    fn test_line_endpoints_from_bounds() {
        let mut surface = MemorySurface::new();
        surface.put_shape(surface_shape(
            "l1",
            "a1",
            SurfaceProps::Line {
                stroke: None,
                stroke_width: None,
            },
        ));
        let deck = serialize_surface(&surface, 1920.0, 1080.0);

        let Shape::Line(line) = &deck.slides[0].shapes[0] else {
            panic!("expected line shape");
        };
        assert_eq!(line.x2, 310.0);
        assert_eq!(line.y2, 100.0);
        assert_eq!(line.stroke_width, Some(2.0));
    }

    #[test]
    fn test_idempotence() {
        let surface = populated_surface();
        let first = serialize_surface(&surface, 1920.0, 1080.0);
        let second = serialize_surface(&surface, 1920.0, 1080.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialize_of_serialized_deck_is_fixed_point() {
        // Round the deck through JSON as the wire would and compare
        let surface = populated_surface();
        let deck = serialize_surface(&surface, 1920.0, 1080.0);
        let json = serde_json::to_string(&deck).unwrap();
        let back: Deck = serde_json::from_str(&json).unwrap();
        assert_eq!(back, deck);
    }

    #[test]
    fn test_z_from_index_parsing() {
        assert_eq!(z_from_index("a1"), 1);
        assert_eq!(z_from_index("a12b3"), 123);
        assert_eq!(z_from_index("zz"), 0);
    }
}
