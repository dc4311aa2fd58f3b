//! Per render configuration.

use crate::types::Point;

/// Default limit on the number of operators executed for one glyph,
/// including those in subroutines and seac components.
pub const DEFAULT_STEP_LIMIT: usize = 65536;

/// Options that control glyph rendering.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderSettings {
    /// Apply font and glyph hints.
    pub hinting: bool,
    /// Base 2 logarithm of the oversampling factor in each direction.
    pub log2_scale: Point<u8>,
    /// Upper bound for the flatness derived from the device transform, in
    /// device pixels.
    pub flatness: f64,
    /// Maximum number of operators executed per glyph.
    pub step_limit: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            hinting: true,
            log2_scale: Point::new(0, 0),
            flatness: 1.0,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}

impl RenderSettings {
    /// Settings for unhinted rendering, as used when producing a character
    /// path rather than a bitmap.
    pub fn unhinted() -> Self {
        Self {
            hinting: false,
            ..Default::default()
        }
    }

    /// Returns the settings with the given oversampling.
    pub fn with_log2_scale(self, x: u8, y: u8) -> Self {
        Self {
            log2_scale: Point::new(x.min(8), y.min(8)),
            ..self
        }
    }
}
