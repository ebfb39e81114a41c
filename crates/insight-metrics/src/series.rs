//! Price data model: single trading-day records and validated series

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{MalformedReason, MetricsError, Result};

/// One trading-day OHLCV record
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PricePoint {
    /// Create a new price point
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    fn invalid_price(&self) -> Option<MalformedReason> {
        [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite() || *value < 0.0)
        .map(|(field, value)| MalformedReason::InvalidPrice { field, value })
    }
}

/// Date-ordered sequence of [`PricePoint`]s
///
/// Dates are strictly ascending (no duplicates) and every price is finite and
/// non-negative. The series is immutable once built; an empty series is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validate and wrap a list of points
    ///
    /// Fails fast on the first point that is out of order, repeats the
    /// previous date, or carries an invalid price.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        for (index, point) in points.iter().enumerate() {
            if let Some(reason) = point.invalid_price() {
                return Err(MetricsError::malformed(index, reason));
            }

            if index == 0 {
                continue;
            }

            let previous = points[index - 1].date;
            if point.date == previous {
                return Err(MetricsError::malformed(
                    index,
                    MalformedReason::DuplicateDate(point.date),
                ));
            }
            if point.date < previous {
                return Err(MetricsError::malformed(
                    index,
                    MalformedReason::OutOfOrder {
                        previous,
                        current: point.date,
                    },
                ));
            }
        }

        Ok(Self { points })
    }

    /// An empty series
    pub fn empty() -> Self {
        Self::default()
    }

    /// All points, oldest first
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Most recent point
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Closing prices, oldest first
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = MetricsError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points
    }
}
