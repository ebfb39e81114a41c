//! Error types for series construction

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for metrics operations
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Errors raised when a price series violates its preconditions
///
/// Insufficient history is not an error; windowed operations return `None`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// A point in the input breaks the ordering or value contract
    #[error("Malformed input at index {index}: {reason}")]
    MalformedInput {
        index: usize,
        reason: MalformedReason,
    },
}

/// Why a point was rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedReason {
    /// Date is earlier than the one before it
    #[error("date {current} comes before {previous}")]
    OutOfOrder {
        previous: NaiveDate,
        current: NaiveDate,
    },

    /// Date repeats the one before it
    #[error("duplicate date {0}")]
    DuplicateDate(NaiveDate),

    /// Price is NaN, infinite or negative
    #[error("{field} price {value} is not a finite non-negative number")]
    InvalidPrice { field: &'static str, value: f64 },
}

impl MetricsError {
    pub(crate) fn malformed(index: usize, reason: MalformedReason) -> Self {
        Self::MalformedInput { index, reason }
    }
}
