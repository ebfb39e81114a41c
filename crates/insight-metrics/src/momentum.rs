//! Momentum indicators computed from the close series

use serde::{Deserialize, Serialize};
use ta::Next;
use ta::indicators::{MovingAverageConvergenceDivergence, RelativeStrengthIndex};

use crate::series::PriceSeries;

/// Default RSI lookback
pub const RSI_PERIOD: usize = 14;

/// Default MACD fast EMA period
pub const MACD_FAST: usize = 12;

/// Default MACD slow EMA period
pub const MACD_SLOW: usize = 26;

/// Default MACD signal EMA period
pub const MACD_SIGNAL: usize = 9;

/// Latest MACD reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    /// Fast EMA minus slow EMA
    pub macd: f64,
    /// EMA of the MACD line
    pub signal: f64,
    /// MACD minus signal
    pub histogram: f64,
}

/// Relative Strength Index of the close over `period` points
///
/// `None` until the series holds `period + 1` closes.
pub fn rsi(series: &PriceSeries, period: usize) -> Option<f64> {
    if period == 0 || series.len() < period + 1 {
        return None;
    }

    let mut indicator = RelativeStrengthIndex::new(period).ok()?;
    let mut current = None;
    for close in series.closes() {
        current = Some(indicator.next(close));
    }
    current.filter(|v| v.is_finite())
}

/// Moving Average Convergence Divergence of the close
///
/// `None` until the series holds `slow` closes, or when `fast >= slow`.
pub fn macd(series: &PriceSeries, fast: usize, slow: usize, signal: usize) -> Option<Macd> {
    if fast == 0 || signal == 0 || fast >= slow || series.len() < slow {
        return None;
    }

    let mut indicator = MovingAverageConvergenceDivergence::new(fast, slow, signal).ok()?;
    series
        .closes()
        .map(|close| indicator.next(close))
        .last()
        .map(|output| Macd {
            macd: output.macd,
            signal: output.signal,
            histogram: output.histogram,
        })
}
