//! Pixel to slide-surface coordinate transform
//!
//! The physical slide is fixed at 10in x 5.625in. Horizontal pixel
//! quantities scale by the deck width, vertical ones by the deck height,
//! independently. The transform is anisotropic on purpose: a non-16:9
//! deck fills the slide distorted rather than letterboxed.

/// Physical slide surface, inches
pub const SLIDE_WIDTH_IN: f64 = 10.0;
pub const SLIDE_HEIGHT_IN: f64 = 5.625;

/// English Metric Units per inch / per point
pub const EMU_PER_INCH: i64 = 914_400;
pub const EMU_PER_PT: i64 = 12_700;

/// Rotation units: 60,000ths of a degree
const ROT_UNITS_PER_DEGREE: f64 = 60_000.0;

/// The transform from one deck's pixel canvas onto the slide surface.
#[derive(Debug, Clone, Copy)]
pub struct SlideSpace {
    deck_width: f64,
    deck_height: f64,
}

impl SlideSpace {
    pub fn new(deck_width: f64, deck_height: f64) -> Self {
        Self {
            deck_width,
            deck_height,
        }
    }

    /// Horizontal pixels (x, w) to inches.
    pub fn x_in(&self, px: f64) -> f64 {
        px / self.deck_width * SLIDE_WIDTH_IN
    }

    /// Vertical pixels (y, h) to inches.
    pub fn y_in(&self, px: f64) -> f64 {
        px / self.deck_height * SLIDE_HEIGHT_IN
    }

    pub fn x_emu(&self, px: f64) -> i64 {
        (self.x_in(px) * EMU_PER_INCH as f64).round() as i64
    }

    pub fn y_emu(&self, px: f64) -> i64 {
        (self.y_in(px) * EMU_PER_INCH as f64).round() as i64
    }
}

/// Stroke width in points to EMU.
pub fn pt_emu(pt: f64) -> i64 {
    (pt * EMU_PER_PT as f64).round() as i64
}

/// Radians to the drawing layer's 60,000ths-of-a-degree units.
pub fn rot_units(radians: f64) -> i64 {
    (radians.to_degrees() * ROT_UNITS_PER_DEGREE).round() as i64
}

/// Corner radius in pixels re-expressed as the geometry adjustment value:
/// a fraction of the shape's smaller side, clamped below self-intersection,
/// scaled to the drawing layer's 0..100000 range.
pub fn corner_adj(radius_px: f64, w: f64, h: f64) -> i64 {
    let smaller = w.min(h);
    if smaller <= 0.0 {
        return 0;
    }
    let frac = (radius_px / smaller).clamp(0.0, 0.49);
    (frac * 100_000.0).round() as i64
}
