//! Windowed statistics over a [`PriceSeries`]
//!
//! All functions return `None` when the series is too short for the request.

use ta::Next;
use ta::indicators::SimpleMovingAverage;

use crate::series::PriceSeries;

/// Close of the most recent point
pub fn latest_close(series: &PriceSeries) -> Option<f64> {
    series.last().map(|p| p.close)
}

/// Percentage change of the close over the last `periods` points
///
/// `None` when fewer than `periods + 1` points exist or the base close is zero.
pub fn percent_change(series: &PriceSeries, periods: usize) -> Option<f64> {
    let points = series.points();
    let needed = periods.checked_add(1)?;
    if points.len() < needed {
        return None;
    }

    let current = points[points.len() - 1].close;
    let base = points[points.len() - needed].close;
    change_between(base, current)
}

/// Mean of the last `window` closes
///
/// `None` when fewer than `window` points exist. A zero window has no mean.
pub fn rolling_average(series: &PriceSeries, window: usize) -> Option<f64> {
    if window == 0 || series.len() < window {
        return None;
    }

    let mut sma = SimpleMovingAverage::new(window).ok()?;
    series.closes().map(|close| sma.next(close)).last()
}

/// Sample standard deviation of period-over-period returns, in percent
///
/// Returns whose base close is zero are undefined and skipped. At least two
/// defined returns are needed for a sample deviation.
pub fn volatility(series: &PriceSeries) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }

    let returns: Vec<f64> = series
        .points()
        .windows(2)
        .filter_map(|pair| change_between(pair[0].close, pair[1].close))
        .collect();

    sample_std_dev(&returns)
}

/// Mean traded volume across the whole series
pub fn average_volume(series: &PriceSeries) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    let total: f64 = series.points().iter().map(|p| p.volume as f64).sum();
    Some(total / series.len() as f64)
}

/// Volume of the most recent point
pub fn latest_volume(series: &PriceSeries) -> Option<u64> {
    series.last().map(|p| p.volume)
}

fn change_between(base: f64, current: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    Some((current - base) * 100.0 / base)
}

fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}
