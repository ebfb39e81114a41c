//! Rule-based recommendation from short-term price movement

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound (inclusive) of the Hold band, in percent
pub const HOLD_UPPER: f64 = 2.0;

/// Lower bound (inclusive) of the Hold band, in percent
pub const HOLD_LOWER: f64 = -2.0;

/// Categorical label derived from the latest 1-period percentage change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongBuy,
    Hold,
    Sell,
    InsufficientData,
}

impl Recommendation {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongBuy => "Strong Buy",
            Self::Hold => "Hold",
            Self::Sell => "Sell",
            Self::InsufficientData => "Insufficient Data",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a 1-period percentage change to a [`Recommendation`]
///
/// | change                 | label              |
/// |------------------------|--------------------|
/// | `None` / not finite    | `InsufficientData` |
/// | `> 2.0`                | `StrongBuy`        |
/// | `-2.0 ..= 2.0`         | `Hold`             |
/// | `< -2.0`               | `Sell`             |
pub fn recommend(one_period_change: Option<f64>) -> Recommendation {
    match one_period_change {
        Some(p) if p.is_finite() => {
            if p > HOLD_UPPER {
                Recommendation::StrongBuy
            } else if p < HOLD_LOWER {
                Recommendation::Sell
            } else {
                Recommendation::Hold
            }
        }
        _ => Recommendation::InsufficientData,
    }
}
