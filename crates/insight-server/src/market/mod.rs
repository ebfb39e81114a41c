//! Market data sources
//!
//! [`MarketDataSource`] is the seam between the pipeline and whatever serves
//! price history. [`YahooFinanceClient`] is the production implementation;
//! [`crate::cache::CachedMarketData`] wraps any source with a TTL cache.

mod yahoo;

pub use yahoo::YahooFinanceClient;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use insight_metrics::PricePoint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{Result, ServiceError};

/// Longest accepted ticker, e.g. `BRK-B` or `^GSPC`
const MAX_TICKER_LEN: usize = 12;

/// Trailing window of history to fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryRange {
    #[serde(rename = "5d")]
    FiveDays,
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "ytd")]
    YearToDate,
}

impl HistoryRange {
    /// Every supported range
    pub const ALL: [Self; 8] = [
        Self::FiveDays,
        Self::OneMonth,
        Self::ThreeMonths,
        Self::SixMonths,
        Self::OneYear,
        Self::TwoYears,
        Self::FiveYears,
        Self::YearToDate,
    ];

    /// Short code, e.g. `"1mo"`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FiveDays => "5d",
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::YearToDate => "ytd",
        }
    }

    /// Phrase used in prompts and chart titles, e.g. `"Last Month"`
    pub fn description(&self) -> &'static str {
        match self {
            Self::FiveDays => "Last 5 Days",
            Self::OneMonth => "Last Month",
            Self::ThreeMonths => "Last 3 Months",
            Self::SixMonths => "Last 6 Months",
            Self::OneYear => "Last Year",
            Self::TwoYears => "Last 2 Years",
            Self::FiveYears => "Last 5 Years",
            Self::YearToDate => "Year to Date",
        }
    }

    /// Start of the window ending at `end`
    pub fn start_from(&self, end: DateTime<Utc>) -> DateTime<Utc> {
        let days = match self {
            Self::FiveDays => 5,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::OneYear => 365,
            Self::TwoYears => 730,
            Self::FiveYears => 1825,
            Self::YearToDate => {
                let today = end.date_naive();
                let jan_first = today.with_ordinal(1).unwrap_or(today);
                return jan_first.and_time(NaiveTime::MIN).and_utc();
            }
        };
        end - Duration::days(days)
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryRange {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|range| range.as_str() == code)
            .ok_or_else(|| ServiceError::InvalidRange(s.to_string()))
    }
}

/// Source of daily OHLCV history
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch daily points for `ticker` over `range`
    ///
    /// An unknown ticker may yield an empty vector rather than an error.
    async fn fetch_history(&self, ticker: &str, range: HistoryRange) -> Result<Vec<PricePoint>>;
}

/// Normalize a user-supplied ticker
///
/// Uppercases and trims; rejects empty input, overlong input and characters
/// that never appear in exchange symbols.
pub fn normalize_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_ascii_uppercase();

    let valid = !ticker.is_empty()
        && ticker.len() <= MAX_TICKER_LEN
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));

    if valid {
        Ok(ticker)
    } else {
        Err(ServiceError::InvalidSymbol(raw.to_string()))
    }
}

/// Sort by date, keep the last record per date and drop rows with unusable prices
///
/// Providers occasionally repeat the live bar or emit placeholder rows; the
/// result is always acceptable to `PriceSeries::new`.
pub fn sanitize_points(mut points: Vec<PricePoint>) -> Vec<PricePoint> {
    let before = points.len();

    points.retain(|p| {
        [p.open, p.high, p.low, p.close]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    });
    points.sort_by_key(|p| p.date);

    let mut cleaned: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        match cleaned.last_mut() {
            Some(last) if last.date == point.date => *last = point,
            _ => cleaned.push(point),
        }
    }

    if cleaned.len() != before {
        warn!(
            "Dropped {} unusable or duplicate price rows",
            before - cleaned.len()
        );
    }

    cleaned
}
