//! Derived price statistics for a single OHLCV series
//!
//! This crate is the deterministic core of stock-insight. It takes a validated,
//! date-ordered [`PriceSeries`] and derives:
//!
//! - Latest close and percentage change over trailing windows
//! - Rolling averages of the close
//! - Volatility of period-over-period returns
//! - Volume statistics
//! - Momentum indicators (RSI, MACD)
//! - A rule-based [`Recommendation`]
//!
//! Every operation is pure. A window that reaches past the available history
//! yields `None` instead of an error; the only failure is constructing a
//! [`PriceSeries`] from malformed input.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use insight_metrics::{MetricsSnapshot, PricePoint, PriceSeries, Recommendation};
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
//! let series = PriceSeries::new(vec![
//!     PricePoint::new(day(1), 100.0, 101.0, 99.0, 100.0, 1_000),
//!     PricePoint::new(day(4), 100.0, 103.0, 99.5, 102.0, 1_100),
//! ])
//! .unwrap();
//!
//! let snapshot = MetricsSnapshot::compute(&series);
//! assert_eq!(snapshot.latest_close, Some(102.0));
//! assert_eq!(snapshot.recommendation, Recommendation::Hold);
//! ```

pub mod engine;
pub mod error;
pub mod momentum;
pub mod recommendation;
pub mod series;
pub mod snapshot;

pub use engine::{
    average_volume, latest_close, latest_volume, percent_change, rolling_average, volatility,
};
pub use error::{MalformedReason, MetricsError, Result};
pub use momentum::{Macd, macd, rsi};
pub use recommendation::{Recommendation, recommend};
pub use series::{PricePoint, PriceSeries};
pub use snapshot::MetricsSnapshot;
