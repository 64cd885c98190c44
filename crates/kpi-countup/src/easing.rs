//! Easing curves for count-up runs.
//!
//! A curve maps normalized elapsed time `t` in `[0, 1]` onto the fraction of
//! the target magnitude that should be displayed. Every curve starts at 0 and
//! ends at 1, and all of them are non-decreasing so a count-up never runs
//! backwards for a non-negative target.

use serde::{Deserialize, Serialize};

/// Easing function applied to elapsed progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation
    Linear,
    /// Quadratic ease-out
    QuadOut,
    /// Cubic ease-out: `1 - (1 - t)^3`
    #[default]
    CubicOut,
}

impl Easing {
    /// Evaluate the curve at time t (0.0-1.0).
    ///
    /// Input outside the unit range is clamped first.
    #[must_use]
    pub fn evaluate(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadOut => t * (2.0 - t),
            Self::CubicOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

impl std::fmt::Display for Easing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::QuadOut => write!(f, "quad_out"),
            Self::CubicOut => write!(f, "cubic_out"),
        }
    }
}

/// Sample a curve at N equally spaced points, as `(t, value)` pairs.
#[must_use]
pub fn sample(easing: Easing, num_samples: usize) -> Vec<(f64, f64)> {
    match num_samples {
        0 => Vec::new(),
        1 => vec![(0.0, easing.evaluate(0.0))],
        n => (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                (t, easing.evaluate(t))
            })
            .collect(),
    }
}
