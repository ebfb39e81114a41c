//! Caching layer for price history to reduce upstream calls

use async_trait::async_trait;
use cached::{Cached, TimedCache};
use insight_metrics::PricePoint;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Result;
use crate::market::{HistoryRange, MarketDataSource, sanitize_points};

/// Cache key for history requests
pub type CacheKey = (String, HistoryRange);

/// Thread-safe TTL cache of sanitized price history
#[derive(Clone)]
pub struct HistoryCache {
    cache: Arc<RwLock<TimedCache<CacheKey, Vec<PricePoint>>>>,
}

impl HistoryCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<Vec<PricePoint>> {
        // TimedCache evicts on read, so lookups need the write lock
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: Vec<PricePoint>) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// [`MarketDataSource`] decorator that sanitizes and caches results
///
/// Empty histories are not cached so a symbol that starts trading (or a
/// transient upstream gap) is retried on the next request.
pub struct CachedMarketData {
    inner: Arc<dyn MarketDataSource>,
    cache: HistoryCache,
}

impl CachedMarketData {
    /// Wrap `inner` with a cache of the given TTL
    pub fn new(inner: Arc<dyn MarketDataSource>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: HistoryCache::new(ttl),
        }
    }

    /// Access the underlying cache
    pub fn cache(&self) -> &HistoryCache {
        &self.cache
    }
}

#[async_trait]
impl MarketDataSource for CachedMarketData {
    async fn fetch_history(&self, ticker: &str, range: HistoryRange) -> Result<Vec<PricePoint>> {
        let key = (ticker.to_string(), range);

        if let Some(points) = self.cache.get(&key).await {
            debug!("Cache hit for {} ({})", ticker, range);
            return Ok(points);
        }

        debug!("Cache miss for {} ({})", ticker, range);

        let points = sanitize_points(self.inner.fetch_history(ticker, range).await?);
        if !points.is_empty() {
            self.cache.insert(key, points.clone()).await;
        }

        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::market::MockMarketDataSource;
    use chrono::NaiveDate;

    fn points() -> Vec<PricePoint> {
        let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
        vec![
            PricePoint::new(day(2), 101.0, 102.0, 100.0, 101.5, 1_200),
            PricePoint::new(day(1), 100.0, 101.0, 99.0, 100.5, 1_000),
        ]
    }

    #[tokio::test]
    async fn test_cache_insert_and_get() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        let key = ("AAPL".to_string(), HistoryRange::OneMonth);

        cache.insert(key.clone(), points()).await;

        assert_eq!(cache.get(&key).await, Some(points()));
        assert_eq!(cache.get(&("AAPL".to_string(), HistoryRange::OneYear)).await, None);
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let cache = HistoryCache::new(Duration::from_secs(60));

        for ticker in ["AAPL", "MSFT", "TSLA"] {
            cache
                .insert((ticker.to_string(), HistoryRange::OneMonth), points())
                .await;
        }

        assert_eq!(cache.len().await, 3);

        cache.clear().await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_upstream() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_history()
            .times(1)
            .returning(|_, _| Ok(points()));

        let cached = CachedMarketData::new(Arc::new(source), Duration::from_secs(60));

        let first = tokio_test::assert_ok!(cached.fetch_history("AAPL", HistoryRange::OneMonth).await);
        let second = tokio_test::assert_ok!(cached.fetch_history("AAPL", HistoryRange::OneMonth).await);

        assert_eq!(first, second);
        // Sanitized into date order
        assert!(first[0].date < first[1].date);
        assert_eq!(cached.cache().len().await, 1);
    }

    #[tokio::test]
    async fn test_empty_history_not_cached() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_history()
            .times(2)
            .returning(|_, _| Ok(Vec::new()));

        let cached = CachedMarketData::new(Arc::new(source), Duration::from_secs(60));

        for _ in 0..2 {
            let points = cached
                .fetch_history("ZZZZ", HistoryRange::OneMonth)
                .await
                .unwrap();
            assert!(points.is_empty());
        }
        assert!(cached.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_fetch_history()
            .returning(|_, _| Err(ServiceError::MarketData("connection reset".to_string())));

        let cached = CachedMarketData::new(Arc::new(source), Duration::from_secs(60));
        let result = cached.fetch_history("AAPL", HistoryRange::OneMonth).await;

        assert!(matches!(result, Err(ServiceError::MarketData(_))));
    }
}
