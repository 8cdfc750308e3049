use palette::{IntoColor, LinSrgb, Mix, Srgb};
use serde::{Deserialize, Serialize};

use crate::data::model::Stack;

// ---------------------------------------------------------------------------
// Magma lookup table
// ---------------------------------------------------------------------------

/// Evenly spaced anchor colours of the magma map, dark to light.
const MAGMA_ANCHORS: [[u8; 3]; 9] = [
    [0x00, 0x00, 0x04],
    [0x1c, 0x10, 0x44],
    [0x4f, 0x12, 0x7b],
    [0x81, 0x25, 0x81],
    [0xb5, 0x36, 0x7a],
    [0xe5, 0x50, 0x64],
    [0xfb, 0x87, 0x61],
    [0xfe, 0xc2, 0x87],
    [0xfc, 0xfd, 0xbf],
];

/// Number of entries in a rendered lookup table.
pub const LUT_SIZE: usize = 256;

/// A fixed scalar → colour mapping, piecewise linear (in linear light)
/// between anchors.
#[derive(Debug, Clone)]
pub struct Colormap {
    anchors: Vec<LinSrgb>,
}

impl Colormap {
    /// The perceptually uniform "magma" map.
    pub fn magma() -> Self {
        Self::from_anchors(&MAGMA_ANCHORS)
    }

    /// Build a colormap from at least two evenly spaced 8-bit anchors.
    pub fn from_anchors(anchors: &[[u8; 3]]) -> Self {
        assert!(anchors.len() >= 2, "a colormap needs at least two anchors");
        Colormap {
            anchors: anchors
                .iter()
                .map(|&[r, g, b]| {
                    let rgb: Srgb = Srgb::new(r, g, b).into_format();
                    IntoColor::<LinSrgb>::into_color(rgb)
                })
                .collect(),
        }
    }

    /// Colour for `t` in `[0, 1]`. Values outside are clamped, NaN maps to 0.
    pub fn map(&self, t: f64) -> [u8; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 };
        let segments = (self.anchors.len() - 1) as f32;
        let pos = t * segments;
        let lo = (pos.floor() as usize).min(self.anchors.len() - 2);
        let factor = pos - lo as f32;

        let mixed = self.anchors[lo].mix(self.anchors[lo + 1], factor);
        let rgb: Srgb = mixed.into_color();
        [to_u8(rgb.red), to_u8(rgb.green), to_u8(rgb.blue)]
    }

    /// Sample the map into a [`LUT_SIZE`]-entry table.
    pub fn lut(&self) -> Vec<[u8; 3]> {
        (0..LUT_SIZE)
            .map(|i| self.map(i as f64 / (LUT_SIZE - 1) as f64))
            .collect()
    }
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Default for Colormap {
    fn default() -> Self {
        Colormap::magma()
    }
}

// ---------------------------------------------------------------------------
// Display range: sample value → [0, 1]
// ---------------------------------------------------------------------------

/// Which sample values map to the two ends of the colormap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayRange {
    /// Finite min/max over the whole stack.
    #[default]
    Auto,
    Fixed { min: f64, max: f64 },
}

impl DisplayRange {
    /// Concrete `(min, max)` for `stack`. An all-NaN stack resolves to `(0, 0)`.
    pub fn resolve(&self, stack: &Stack) -> (f64, f64) {
        match *self {
            DisplayRange::Auto => stack.min_max().unwrap_or((0.0, 0.0)),
            DisplayRange::Fixed { min, max } => (min, max),
        }
    }
}

/// Scale `value` into `[0, 1]` against `(min, max)`; a degenerate range gives 0.
pub fn normalize(value: f64, (min, max): (f64, f64)) -> f64 {
    let span = max - min;
    if !(span > 0.0) || !span.is_finite() {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Frame;

    #[test]
    fn test_endpoints_match_anchors() {
        let cmap = Colormap::magma();
        assert_eq!(cmap.map(0.0), MAGMA_ANCHORS[0]);
        assert_eq!(cmap.map(1.0), MAGMA_ANCHORS[8]);
        assert_eq!(cmap.map(0.5), MAGMA_ANCHORS[4]);
    }

    #[test]
    fn test_map_clamps() {
        let cmap = Colormap::magma();
        assert_eq!(cmap.map(-3.0), cmap.map(0.0));
        assert_eq!(cmap.map(7.0), cmap.map(1.0));
        assert_eq!(cmap.map(f64::NAN), cmap.map(0.0));
    }

    #[test]
    fn test_lut_spans_the_map() {
        let lut = Colormap::magma().lut();
        assert_eq!(lut.len(), LUT_SIZE);
        assert_eq!(lut[0], MAGMA_ANCHORS[0]);
        assert_eq!(lut[LUT_SIZE - 1], MAGMA_ANCHORS[8]);
    }

    #[test]
    fn test_midpoint_lies_between_anchors() {
        let cmap = Colormap::from_anchors(&[[0, 0, 0], [200, 100, 50]]);
        let mid = cmap.map(0.5);
        assert!(mid[0] > 100 && mid[0] < 200);
        assert!(mid[1] > 50 && mid[1] < 100);
        assert!(mid[2] > 25 && mid[2] < 50);
        assert_eq!(cmap.map(1.0), [200, 100, 50]);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, (0.0, 10.0)), 0.5);
        assert_eq!(normalize(-1.0, (0.0, 10.0)), 0.0);
        assert_eq!(normalize(11.0, (0.0, 10.0)), 1.0);
        assert_eq!(normalize(3.0, (3.0, 3.0)), 0.0);
        assert_eq!(normalize(3.0, (0.0, f64::NAN)), 0.0);
    }

    #[test]
    fn test_display_range_resolve() {
        let stack = Stack::new(Frame::from_rows(&[[1.0, f64::NAN], [4.0, -2.0]]).unwrap());
        assert_eq!(DisplayRange::Auto.resolve(&stack), (-2.0, 4.0));
        assert_eq!(
            DisplayRange::Fixed { min: 0.0, max: 1.0 }.resolve(&stack),
            (0.0, 1.0)
        );
    }
}
