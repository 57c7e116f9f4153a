//! Tolerances and canvas configuration.
//!
//! The numeric tolerances are fixed: saved drawings and user muscle memory
//! depend on picking behaving exactly the same way.

use serde::{Deserialize, Serialize};

/// Squared pick radius for a single point (10 px).
pub const PICK_RADIUS_SQ: f64 = 100.0;

/// Vertex pick radius for polygons.
pub const POLYGON_PICK_RADIUS: f64 = 10.0;

/// Upper bound on the cross-product magnitude for segment and ray hits.
pub const SEGMENT_DET_TOLERANCE: f64 = 2000.0;

/// Cross-product slack for long lines.
pub const LINE_LONG_TOLERANCE: f64 = 1500.0;

/// Lines longer than this use [`LINE_LONG_TOLERANCE`], shorter ones `4 * len`.
pub const LINE_LONG_THRESHOLD: f64 = 200.0;

/// Allowed gap between `floor(d²)` and `floor(R²)` on an unfilled circle.
pub const CIRCLE_CURVE_EPS: f64 = 2000.0;

/// Vertical offset of a distance label from the measured midpoint.
pub const LABEL_OFFSET_Y: f64 = -15.0;

/// Angle labels sit at the vertex scaled by this factor.
pub const ANGLE_LABEL_SCALE: f64 = 1.02;

/// Estimated glyph advance relative to the font size, used for text hit boxes.
pub const GLYPH_ADVANCE: f64 = 0.5;

/// Drawing surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f64,
    pub height: f64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Canvas {
    /// Multiplier used to push "infinite" line endpoints off-canvas.
    #[must_use]
    pub fn lambda(&self) -> f64 {
        self.width + self.height
    }
}

/// Engine-wide configuration owned by the shape registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub canvas: Canvas,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lambda() {
        assert_eq!(EngineConfig::default().canvas.lambda(), 1400.0);
    }

    #[test]
    fn config_from_json() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{ "canvas": { "width": 1000, "height": 500 } }"#).unwrap();
        assert_eq!(cfg.canvas.lambda(), 1500.0);

        let empty: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, EngineConfig::default());
    }
}
