//! Aggregate of every derived field for one series

use serde::{Deserialize, Serialize};

use crate::engine::{
    average_volume, latest_close, latest_volume, percent_change, rolling_average, volatility,
};
use crate::momentum::{MACD_FAST, MACD_SIGNAL, MACD_SLOW, Macd, RSI_PERIOD, macd, rsi};
use crate::recommendation::{Recommendation, recommend};
use crate::series::PriceSeries;

/// Short rolling-average window
pub const SHORT_AVERAGE_WINDOW: usize = 50;

/// Long rolling-average window
pub const LONG_AVERAGE_WINDOW: usize = 200;

/// Read-only summary derived from a [`PriceSeries`]
///
/// Each numeric field is `None` when the series is too short to define it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub latest_close: Option<f64>,
    pub change_1_period: Option<f64>,
    pub change_3_period: Option<f64>,
    pub change_6_period: Option<f64>,
    pub average_volume: Option<f64>,
    pub latest_volume: Option<u64>,
    pub average_50: Option<f64>,
    pub average_200: Option<f64>,
    pub volatility: Option<f64>,
    pub rsi_14: Option<f64>,
    pub macd: Option<Macd>,
    pub recommendation: Recommendation,
}

impl MetricsSnapshot {
    /// Derive every field from `series`
    pub fn compute(series: &PriceSeries) -> Self {
        let change_1_period = percent_change(series, 1);

        Self {
            latest_close: latest_close(series),
            change_1_period,
            change_3_period: percent_change(series, 3),
            change_6_period: percent_change(series, 6),
            average_volume: average_volume(series),
            latest_volume: latest_volume(series),
            average_50: rolling_average(series, SHORT_AVERAGE_WINDOW),
            average_200: rolling_average(series, LONG_AVERAGE_WINDOW),
            volatility: volatility(series),
            rsi_14: rsi(series, RSI_PERIOD),
            macd: macd(series, MACD_FAST, MACD_SLOW, MACD_SIGNAL),
            recommendation: recommend(change_1_period),
        }
    }
}
