//! Shape types for deck slides
//!
//! A shape is a positioned, typed visual element within a slide. The union
//! is a serde internally-tagged enum over `kind` so every consumer
//! (serializer, store, renderer) dispatches exhaustively instead of probing
//! untyped property bags.

use serde::{Deserialize, Serialize};

/// Fields shared by every shape kind.
///
/// Coordinates are deck-canvas pixels, origin top-left. `z` is the paint
/// order key, ascending, not required to be unique; ties keep original
/// order. `rotation` is in radians around the shape center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeBase {
    /// Stable, caller-assigned identifier
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub z: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl Default for TextAlign {
    fn default() -> Self {
        TextAlign::Left
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShape {
    #[serde(flatten)]
    pub base: ShapeBase,
    pub text: String,
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectShape {
    #[serde(flatten)]
    pub base: ShapeBase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineShape {
    #[serde(flatten)]
    pub base: ShapeBase,
    pub x2: f64,
    pub y2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageShape {
    #[serde(flatten)]
    pub base: ShapeBase,
    pub url: String,
}

/// The shape union, discriminated by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Text(TextShape),
    Rect(RectShape),
    Line(LineShape),
    Image(ImageShape),
}

impl Shape {
    /// The shared base fields of any kind.
    pub fn base(&self) -> &ShapeBase {
        match self {
            Shape::Text(s) => &s.base,
            Shape::Rect(s) => &s.base,
            Shape::Line(s) => &s.base,
            Shape::Image(s) => &s.base,
        }
    }

    /// Mutable access to the shared base fields.
    pub fn base_mut(&mut self) -> &mut ShapeBase {
        match self {
            Shape::Text(s) => &mut s.base,
            Shape::Rect(s) => &mut s.base,
            Shape::Line(s) => &mut s.base,
            Shape::Image(s) => &mut s.base,
        }
    }

    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn z(&self) -> i64 {
        self.base().z
    }

    /// Kind discriminant as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Text(_) => "text",
            Shape::Rect(_) => "rect",
            Shape::Line(_) => "line",
            Shape::Image(_) => "image",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(id: &str, z: i64) -> ShapeBase {
        ShapeBase {
            id: id.to_string(),
            x: 10.0,
            y: 20.0,
            w: 100.0,
            h: 50.0,
            z,
            rotation: None,
        }
    }

    #[test]
    fn test_tagged_wire_format() {
        let shape = Shape::Rect(RectShape {
            base: base("r1", 3),
            corner_radius: Some(12.0),
            fill: Some("#FFFFFF".to_string()),
            stroke: None,
            stroke_width: None,
        });

        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["kind"], "rect");
        assert_eq!(json["id"], "r1");
        assert_eq!(json["cornerRadius"], 12.0);
        assert_eq!(json["z"], 3);
        // Unset optionals stay off the wire
        assert!(json.get("stroke").is_none());
        assert!(json.get("rotation").is_none());
    }

    #[test]
    fn test_round_trip_all_kinds() {
        let shapes = vec![
            Shape::Text(TextShape {
                base: base("t1", 0),
                text: "Hello".to_string(),
                font_size: 22.0,
                font_family: Some("Calibri".to_string()),
                bold: Some(true),
                italic: None,
                align: Some(TextAlign::Center),
                color: Some("#0B1220".to_string()),
            }),
            Shape::Rect(RectShape {
                base: base("r1", 1),
                corner_radius: None,
                fill: None,
                stroke: Some("#111111".to_string()),
                stroke_width: Some(2.0),
            }),
            Shape::Line(LineShape {
                base: base("l1", 2),
                x2: 110.0,
                y2: 70.0,
                stroke: None,
                stroke_width: None,
            }),
            Shape::Image(ImageShape {
                base: base("i1", 3),
                url: "https://example.com/pic.png".to_string(),
            }),
        ];

        for shape in shapes {
            let json = serde_json::to_string(&shape).unwrap();
            let back: Shape = serde_json::from_str(&json).unwrap();
            assert_eq!(back, shape);
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"kind":"sticker","id":"s1","x":0,"y":0,"w":1,"h":1,"z":0}"#;
        assert!(serde_json::from_str::<Shape>(json).is_err());
    }

    #[test]
    fn test_align_serialization() {
        assert_eq!(serde_json::to_string(&TextAlign::Center).unwrap(), "\"center\"");
        assert_eq!(
            serde_json::from_str::<TextAlign>("\"right\"").unwrap(),
            TextAlign::Right
        );
    }
}
