//! Easing curves shared by trajectories and elevation arcs.

use serde::{Deserialize, Serialize};

/// Quadratic easing curves.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl EasingType {
    /// Applies the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }

    /// CSS timing function of the curve.
    ///
    /// `EaseIn` and `EaseOut` are exact (a quadratic is a degenerate cubic
    /// Bézier); `EaseInOut` is the usual cubic approximation.
    pub fn css(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "cubic-bezier(0.333, 0, 0.667, 0.333)",
            Self::EaseOut => "cubic-bezier(0.333, 0.667, 0.667, 1)",
            Self::EaseInOut => "cubic-bezier(0.455, 0.03, 0.515, 0.955)",
        }
    }
}
