//! Company news headlines
//!
//! [`NewsSource`] supplies recent headlines that are rendered into the news
//! agent's prompt next to the computed figures. [`FinnhubClient`] is the
//! production implementation.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::{Result, ServiceError};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Finnhub REST endpoint
pub const FINNHUB_API_BASE: &str = "https://finnhub.io/api/v1";

/// Free tier allowance
const DEFAULT_RATE_LIMIT: u32 = 60;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// One news item about a ticker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Headline {
    pub title: String,
    pub source: String,
    pub published: NaiveDate,
    pub url: String,
    pub summary: String,
}

/// Source of recent company news
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// At most `limit` headlines about `ticker`, newest first
    async fn recent_headlines(&self, ticker: &str, limit: usize) -> Result<Vec<Headline>>;
}

/// Article as returned by `/company-news`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FinnhubArticle {
    /// Publish time (UNIX timestamp)
    pub datetime: i64,
    pub headline: String,
    pub source: String,
    pub summary: String,
    pub url: String,
}

/// Finnhub company news client
pub struct FinnhubClient {
    client: Client,
    api_key: String,
    api_base: String,
    lookback_days: u32,
    rate_limiter: SharedRateLimiter,
}

impl FinnhubClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_key` - Finnhub API key
    /// * `rate_limit` - Requests per minute (default 60)
    pub fn new(api_key: impl Into<String>, rate_limit: Option<u32>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ServiceError::Config(format!("Failed to build news client: {e}")))?;

        let per_minute = NonZeroU32::new(rate_limit.unwrap_or(DEFAULT_RATE_LIMIT)).ok_or_else(
            || ServiceError::Config("News rate limit must be greater than 0".to_string()),
        )?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_base: FINNHUB_API_BASE.to_string(),
            lookback_days: 7,
            rate_limiter: Arc::new(RateLimiter::direct(Quota::per_minute(per_minute))),
        })
    }

    /// Point the client at another base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Set how many days of news to request
    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days.max(1);
        self
    }

    /// Articles about `symbol` published between `from` and `to`
    pub async fn company_news(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FinnhubArticle>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/company-news", self.api_base.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", symbol.to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
                ("token", self.api_key.clone()),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::News(format!("Finnhub request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::News(format!("Finnhub API error {status}: {body}")));
        }

        response
            .json::<Vec<FinnhubArticle>>()
            .await
            .map_err(|e| ServiceError::News(format!("Failed to parse Finnhub response: {e}")))
    }
}

#[async_trait]
impl NewsSource for FinnhubClient {
    #[instrument(skip(self))]
    async fn recent_headlines(&self, ticker: &str, limit: usize) -> Result<Vec<Headline>> {
        let to = Utc::now().date_naive();
        let from = to - Duration::days(i64::from(self.lookback_days));

        let articles = self.company_news(ticker, from, to).await?;
        debug!(articles = articles.len(), "Fetched company news");

        Ok(headlines_from_articles(articles, limit))
    }
}

/// Keep titled articles with a valid timestamp, newest first, at most `limit`
pub fn headlines_from_articles(articles: Vec<FinnhubArticle>, limit: usize) -> Vec<Headline> {
    let mut dated: Vec<(i64, Headline)> = articles
        .into_iter()
        .filter(|a| !a.headline.trim().is_empty())
        .filter_map(|a| {
            let published = DateTime::from_timestamp(a.datetime, 0)?.date_naive();
            Some((
                a.datetime,
                Headline {
                    title: a.headline.trim().to_string(),
                    source: a.source,
                    published,
                    url: a.url,
                    summary: a.summary,
                },
            ))
        })
        .collect();

    dated.sort_by(|a, b| b.0.cmp(&a.0));
    dated.into_iter().take(limit).map(|(_, h)| h).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(datetime: i64, headline: &str) -> FinnhubArticle {
        FinnhubArticle {
            datetime,
            headline: headline.to_string(),
            source: "Reuters".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_finnhub_client_creation() {
        let client = FinnhubClient::new("test_key", None)
            .unwrap()
            .with_api_base("http://localhost:9999/")
            .with_lookback_days(0);
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.api_base, "http://localhost:9999/");
        assert_eq!(client.lookback_days, 1);
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        assert!(matches!(
            FinnhubClient::new("k", Some(0)),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn test_headlines_newest_first_and_limited() {
        let articles = vec![
            article(1_700_000_000, "Older story"),
            article(1_700_500_000, "Newest story"),
            article(1_700_200_000, "  "),
            article(1_700_300_000, "Middle story"),
        ];

        let headlines = headlines_from_articles(articles, 2);

        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "Newest story");
        assert_eq!(headlines[1].title, "Middle story");
        assert_eq!(
            headlines[0].published,
            NaiveDate::from_ymd_opt(2023, 11, 20).unwrap()
        );
        assert_eq!(headlines[0].source, "Reuters");
    }

    #[test]
    fn test_article_missing_fields() {
        let articles: Vec<FinnhubArticle> =
            serde_json::from_str(r#"[{"datetime": 1700000000, "headline": "Earnings beat"}]"#)
                .unwrap();

        let headlines = headlines_from_articles(articles, 10);
        assert_eq!(headlines.len(), 1);
        assert_eq!(headlines[0].source, "");
        assert_eq!(headlines[0].url, "");
    }

    #[test]
    fn test_out_of_range_timestamp_dropped() {
        let headlines = headlines_from_articles(vec![article(i64::MAX, "Bad date")], 10);
        assert!(headlines.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access and FINNHUB_API_KEY
    async fn test_recent_headlines() {
        let key = std::env::var("FINNHUB_API_KEY").unwrap();
        let client = FinnhubClient::new(key, None).unwrap();
        let headlines = client.recent_headlines("AAPL", 5).await.unwrap();

        assert!(headlines.len() <= 5);
        assert!(headlines.windows(2).all(|w| w[0].published >= w[1].published));
    }
}
