//! Beautify applier
//!
//! The layout-suggestion service returns per-shape patches. Geometry fields
//! move the shape; style fields change how it draws. The two live in
//! explicit sub-structs so there is no ambiguity about where a field
//! applies. The whole batch commits through the surface's batching
//! primitive so no shape updates visibly before another.

use crate::{EditingSurface, SurfaceProps, SurfaceShape};
use serde::{Deserialize, Serialize};

/// Fields that apply at the shape's top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GeometryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
}

/// Fields that apply inside the shape's style block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One suggestion from the layout service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeSuggestion {
    pub shape_id: String,
    #[serde(default)]
    pub geometry: GeometryPatch,
    #[serde(default)]
    pub style: StylePatch,
}

/// Parse the layout service's JSON response (`{"patches": [...]}`).
pub fn parse_suggestions(body: &str) -> crate::Result<Vec<ShapeSuggestion>> {
    #[derive(Deserialize)]
    struct Response {
        patches: Vec<ShapeSuggestion>,
    }
    let response: Response = serde_json::from_str(body)?;
    Ok(response.patches)
}

fn apply_style(shape: &mut SurfaceShape, style: &StylePatch) {
    if let Some(w) = style.w {
        shape.w = w;
    }
    if let Some(h) = style.h {
        shape.h = h;
    }

    match &mut shape.props {
        SurfaceProps::Text {
            font_size,
            align,
            color,
            ..
        } => {
            if let Some(size) = style.font_size {
                *font_size = Some(size);
            }
            if let Some(a) = &style.align {
                *align = Some(a.clone());
            }
            if let Some(c) = &style.color {
                *color = Some(c.clone());
            }
        }
        SurfaceProps::Geo { radius, fill, .. } => {
            if let Some(r) = style.corner_radius {
                *radius = Some(r);
            }
            if let Some(c) = &style.color {
                *fill = Some(c.clone());
            }
        }
        SurfaceProps::Line { stroke, .. } => {
            if let Some(c) = &style.color {
                *stroke = Some(c.clone());
            }
        }
        _ => {}
    }
}

/// Apply a batch of suggestions to the live surface.
///
/// Shapes deleted since the suggestions were computed are skipped; one
/// missing id never fails the batch. Returns the number of shapes updated.
pub fn apply_suggestions<S: EditingSurface>(
    surface: &mut S,
    suggestions: &[ShapeSuggestion],
) -> usize {
    let mut updates = Vec::with_capacity(suggestions.len());

    for suggestion in suggestions {
        let Some(mut shape) = surface.get_shape(&suggestion.shape_id) else {
            tracing::debug!(id = %suggestion.shape_id, "suggestion targets a deleted shape, skipping");
            continue;
        };

        if let Some(x) = suggestion.geometry.x {
            shape.x = x;
        }
        if let Some(y) = suggestion.geometry.y {
            shape.y = y;
        }
        if let Some(rotation) = suggestion.geometry.rotation {
            shape.rotation = rotation;
        }
        apply_style(&mut shape, &suggestion.style);

        updates.push(shape);
    }

    let applied = updates.len();
    surface.apply_batch(updates);
    applied
}
