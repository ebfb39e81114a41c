//! Display formatting of metrics and the JSON response payload

use insight_metrics::{MetricsSnapshot, PriceSeries, Recommendation};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::prompts::PromptFact;

/// Shown when a figure cannot be computed
pub const NOT_AVAILABLE: &str = "N/A";

/// Footer attached to every report
pub const DISCLAIMER: &str = "This stock analysis is for informational purposes only and should not be considered financial advice. Please conduct your own research before making investment decisions.";

/// Sentence shown for a recommendation
pub fn recommendation_message(recommendation: Recommendation) -> &'static str {
    match recommendation {
        Recommendation::StrongBuy => "📈 Strong Buy: The stock is showing a positive trend.",
        Recommendation::Hold => "📊 Hold: The stock is relatively stable.",
        Recommendation::Sell => "📉 Sell: The stock is experiencing a decline.",
        Recommendation::InsufficientData => "⚠️ Insufficient data to provide a recommendation.",
    }
}

/// `$123.45`
pub fn format_currency(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("${v:.2}"))
}

/// `2.00%`
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}%"))
}

/// Two decimal places, no unit
pub fn format_decimal(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"))
}

/// Rounded to a whole number with thousands separators, e.g. `1,234,567`
pub fn format_volume(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => group_thousands(v.round() as u64),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoricalPerformance {
    #[serde(rename = "1 Day")]
    pub one_day: String,
    #[serde(rename = "3 Days")]
    pub three_days: String,
    #[serde(rename = "6 Days")]
    pub six_days: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeChanges {
    #[serde(rename = "Average Volume")]
    pub average: String,
    #[serde(rename = "Current Volume")]
    pub current: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovingAverages {
    #[serde(rename = "50-Day")]
    pub day_50: String,
    #[serde(rename = "200-Day")]
    pub day_200: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MomentumIndicators {
    #[serde(rename = "RSI (14)")]
    pub rsi_14: String,
    #[serde(rename = "MACD")]
    pub macd: String,
}

/// Human-readable summary of a [`MetricsSnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDetails {
    #[serde(rename = "Stock Symbol")]
    pub symbol: String,
    #[serde(rename = "Current Stock Price")]
    pub current_price: String,
    #[serde(rename = "Historical Performance")]
    pub performance: HistoricalPerformance,
    #[serde(rename = "Volume Changes")]
    pub volume: VolumeChanges,
    #[serde(rename = "Moving Averages")]
    pub moving_averages: MovingAverages,
    #[serde(rename = "Volatility")]
    pub volatility: String,
    #[serde(rename = "Momentum Indicators")]
    pub momentum: MomentumIndicators,
}

impl KeyDetails {
    /// Format every field of `snapshot`
    pub fn from_snapshot(symbol: &str, snapshot: &MetricsSnapshot) -> Self {
        Self {
            symbol: symbol.to_string(),
            current_price: format_currency(snapshot.latest_close),
            performance: HistoricalPerformance {
                one_day: format_percent(snapshot.change_1_period),
                three_days: format_percent(snapshot.change_3_period),
                six_days: format_percent(snapshot.change_6_period),
            },
            volume: VolumeChanges {
                average: format_volume(snapshot.average_volume),
                current: format_volume(snapshot.latest_volume.map(|v| v as f64)),
            },
            moving_averages: MovingAverages {
                day_50: format_currency(snapshot.average_50),
                day_200: format_currency(snapshot.average_200),
            },
            volatility: format_percent(snapshot.volatility),
            momentum: MomentumIndicators {
                rsi_14: format_decimal(snapshot.rsi_14),
                macd: format_decimal(snapshot.macd.map(|m| m.macd)),
            },
        }
    }

    /// Flatten into labelled lines for prompt injection, skipping unknowns
    pub fn facts(&self) -> Vec<PromptFact> {
        [
            ("Current Stock Price", &self.current_price),
            ("1-Day Change", &self.performance.one_day),
            ("3-Day Change", &self.performance.three_days),
            ("6-Day Change", &self.performance.six_days),
            ("Average Volume", &self.volume.average),
            ("Current Volume", &self.volume.current),
            ("50-Day Moving Average", &self.moving_averages.day_50),
            ("200-Day Moving Average", &self.moving_averages.day_200),
            ("Volatility (std of daily returns)", &self.volatility),
            ("RSI (14)", &self.momentum.rsi_14),
            ("MACD (12, 26, 9)", &self.momentum.macd),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_str() != NOT_AVAILABLE)
        .map(|(label, value)| PromptFact::new(label, value.clone()))
        .collect()
    }
}

/// Price history keyed by column, then by `YYYY-MM-DD` date
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StockData {
    #[serde(rename = "Open")]
    pub open: BTreeMap<String, f64>,
    #[serde(rename = "High")]
    pub high: BTreeMap<String, f64>,
    #[serde(rename = "Low")]
    pub low: BTreeMap<String, f64>,
    #[serde(rename = "Close")]
    pub close: BTreeMap<String, f64>,
    #[serde(rename = "Volume")]
    pub volume: BTreeMap<String, u64>,
}

impl From<&PriceSeries> for StockData {
    fn from(series: &PriceSeries) -> Self {
        let mut data = Self::default();
        for point in series.points() {
            let date = point.date.format("%Y-%m-%d").to_string();
            data.open.insert(date.clone(), point.open);
            data.high.insert(date.clone(), point.high);
            data.low.insert(date.clone(), point.low);
            data.close.insert(date.clone(), point.close);
            data.volume.insert(date, point.volume);
        }
        data
    }
}

/// Payload returned by `POST /get_stock_data`
#[derive(Debug, Clone, Serialize)]
pub struct StockReport {
    pub stock_data: StockData,
    pub news: String,
    pub analysis: String,
    /// Inline SVG markup
    pub stock_plot: String,
    pub key_details: KeyDetails,
    pub recommendation: String,
    pub disclaimer: String,
}
