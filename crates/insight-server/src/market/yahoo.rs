//! Yahoo Finance history client

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use insight_metrics::PricePoint;
use std::num::NonZeroU32;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

use super::{HistoryRange, MarketDataSource};
use crate::error::{Result, ServiceError};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Default requests per minute against Yahoo
pub const DEFAULT_RATE_LIMIT: u32 = 60;

/// Yahoo Finance client
pub struct YahooFinanceClient {
    connector: yahoo::YahooConnector,
    rate_limiter: SharedRateLimiter,
}

impl YahooFinanceClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `rate_limit` - Requests per minute (default 60)
    pub fn new(rate_limit: Option<u32>) -> Result<Self> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| ServiceError::MarketData(e.to_string()))?;

        let per_minute = NonZeroU32::new(rate_limit.unwrap_or(DEFAULT_RATE_LIMIT)).ok_or_else(
            || ServiceError::Config("Market rate limit must be greater than 0".to_string()),
        )?;
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Ok(Self {
            connector,
            rate_limiter,
        })
    }

    async fn quote_history(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PricePoint>> {
        self.rate_limiter.until_ready().await;

        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| ServiceError::MarketData(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| ServiceError::MarketData(format!("Invalid end timestamp: {e}")))?;

        let response = match self.connector.get_quote_history(ticker, start_odt, end_odt).await {
            Ok(response) => response,
            Err(e) if is_unknown_symbol(&e) => {
                debug!("Yahoo has no history for {}: {}", ticker, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(ServiceError::MarketData(e.to_string())),
        };

        match response.quotes() {
            Ok(quotes) => Ok(quotes.iter().filter_map(to_price_point).collect()),
            Err(e) if is_unknown_symbol(&e) => {
                debug!("No quotes in response for {}", ticker);
                Ok(Vec::new())
            }
            Err(e) => Err(ServiceError::MarketData(e.to_string())),
        }
    }
}

/// Whether Yahoo's error means the symbol has no price history
///
/// Unknown or delisted symbols come back as a `Not Found` API error or as an
/// empty result set. These surface as an empty history, not an upstream fault.
fn is_unknown_symbol(err: &yahoo::YahooError) -> bool {
    match err {
        yahoo::YahooError::NoResult | yahoo::YahooError::NoQuotes => true,
        yahoo::YahooError::ApiError(message) => {
            message.code.as_deref().is_some_and(is_not_found_code)
        }
        yahoo::YahooError::FetchFailed(reason) => is_not_found_code(reason),
        _ => false,
    }
}

fn is_not_found_code(code: &str) -> bool {
    code.to_ascii_lowercase().contains("not found")
}

fn to_price_point(quote: &yahoo::Quote) -> Option<PricePoint> {
    let timestamp = i64::try_from(quote.timestamp).ok()?;
    let date = DateTime::from_timestamp(timestamp, 0)?.date_naive();
    Some(PricePoint::new(
        date,
        quote.open,
        quote.high,
        quote.low,
        quote.close,
        quote.volume,
    ))
}

#[async_trait]
impl MarketDataSource for YahooFinanceClient {
    #[instrument(skip(self), fields(range = %range))]
    async fn fetch_history(&self, ticker: &str, range: HistoryRange) -> Result<Vec<PricePoint>> {
        let end = Utc::now();
        let start = range.start_from(end);

        let points = self.quote_history(ticker, start, end).await?;
        debug!("Fetched {} quotes", points.len());

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(YahooFinanceClient::new(None).is_ok());
        assert!(YahooFinanceClient::new(Some(120)).is_ok());
        assert!(matches!(
            YahooFinanceClient::new(Some(0)),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_symbol_errors() {
        assert!(is_unknown_symbol(&yahoo::YahooError::NoResult));
        assert!(is_unknown_symbol(&yahoo::YahooError::NoQuotes));
        assert!(is_unknown_symbol(&yahoo::YahooError::FetchFailed(
            "Ticker ZZQXJ not found".to_string()
        )));
    }

    #[test]
    fn test_upstream_faults_are_not_unknown_symbols() {
        assert!(!is_unknown_symbol(&yahoo::YahooError::Unauthorized));
        assert!(!is_unknown_symbol(&yahoo::YahooError::NoResponse));
        assert!(!is_unknown_symbol(&yahoo::YahooError::TooManyRequests(
            "chart".to_string()
        )));
        assert!(!is_unknown_symbol(&yahoo::YahooError::FetchFailed(
            "HTTP error: 500 Internal Server Error".to_string()
        )));
    }

    #[test]
    fn test_not_found_code() {
        assert!(is_not_found_code("Not Found"));
        assert!(is_not_found_code("not found"));
        assert!(!is_not_found_code("Bad Request"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_unknown_symbol_is_empty() {
        let client = YahooFinanceClient::new(None).unwrap();
        let points = client
            .fetch_history("ZZQXJ", HistoryRange::OneMonth)
            .await
            .unwrap();

        assert!(points.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_history() {
        let client = YahooFinanceClient::new(None).unwrap();
        let points = client
            .fetch_history("AAPL", HistoryRange::OneMonth)
            .await
            .unwrap();

        assert!(!points.is_empty());
        assert!(points.iter().all(|p| p.close > 0.0));
    }
}
