//! Easing curves

use serde::{Deserialize, Serialize};

/// Cubic ease `-6x³ + 9x² - 2x`.
///
/// Passes through 0 at `x = 0` and 1 at `x = 1` but dips below zero just
/// after 0, so callers clamp the result.
#[inline]
pub fn smooth(x: f32) -> f32 {
    -6.0 * x.powi(3) + 9.0 * x.powi(2) - 2.0 * x
}

/// Parabola `1 - (1 - 2x)²`: zero at both ends, one at `x = 0.5`.
#[inline]
pub fn round_step(x: f32) -> f32 {
    1.0 - (1.0 - 2.0 * x).powi(2)
}

/// Easing applied to a timeline stage's local progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    #[default]
    Linear,
    /// `1 - (1 - t)²`
    QuadOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Ease::Linear => t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}
