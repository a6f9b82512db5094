use serde::{Deserialize, Serialize};
use std::fmt;

/// Linear interpolation between `a` and `b` by progress `p`
pub fn lerp(a: f64, b: f64, p: f64) -> f64 {
    a + (b - a) * p
}

/// Timing curves applied to linear progress before interpolation.
///
/// Outputs are never clamped: `OutBack` overshoots past `1.0` before
/// settling, and that overshoot is passed through to the property setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EaseFunction {
    #[default]
    Linear,
    #[serde(rename = "outexpo")]
    OutExpo,
    #[serde(rename = "outback")]
    OutBack,
}

impl EaseFunction {
    /// Apply the curve to a normalized progress value
    pub fn apply(self, x: f64) -> f64 {
        match self {
            EaseFunction::Linear => x,
            EaseFunction::OutExpo => {
                if x == 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f64.powf(-10.0 * x)
                }
            }
            EaseFunction::OutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                1.0 + c3 * (x - 1.0).powi(3) + c1 * (x - 1.0).powi(2)
            }
        }
    }

    /// Look up a curve by name, case-insensitively.
    ///
    /// Unknown names degrade to `Linear`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "outexpo" => EaseFunction::OutExpo,
            "outback" => EaseFunction::OutBack,
            _ => EaseFunction::Linear,
        }
    }

    /// Look up a curve by its numeric selector (0, 1, 2); anything else is `Linear`
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => EaseFunction::OutExpo,
            2 => EaseFunction::OutBack,
            _ => EaseFunction::Linear,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EaseFunction::Linear => "linear",
            EaseFunction::OutExpo => "outexpo",
            EaseFunction::OutBack => "outback",
        }
    }
}

impl fmt::Display for EaseFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
