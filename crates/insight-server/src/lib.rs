//! Web backend for stock-insight
//!
//! Given a ticker, the backend fetches recent daily prices, computes derived
//! statistics with [`insight_metrics`], asks two LLM agents for a news summary
//! and an analysis, renders an SVG price chart, and returns everything as JSON.
//!
//! # Endpoints
//!
//! - `GET /` and static assets from the configured directory
//! - `GET /health`
//! - `POST /get_stock_data` with `{"ticker": "AAPL", "range": "1mo"}`
//!
//! # Example
//!
//! ```no_run
//! use insight_server::{ServerConfig, build_router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ServerConfig::from_env()?;
//! let app = build_router(&config)?;
//!
//! let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod agents;
pub mod cache;
pub mod chart;
pub mod config;
pub mod error;
pub mod market;
pub mod news;
pub mod prompts;
pub mod report;
pub mod routes;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use error::{Result, ServiceError};
pub use market::{HistoryRange, MarketDataSource, YahooFinanceClient};
pub use news::{FinnhubClient, Headline, NewsSource};
pub use report::{KeyDetails, StockReport};
pub use service::StockInsightService;

use axum::Router;
use insight_llm::providers::{OpenAIConfig, OpenAIProvider};
use std::sync::Arc;
use tracing::info;

use crate::agents::AgentSettings;
use crate::cache::CachedMarketData;

/// Wire the production collaborators from `config` into a router
///
/// Uses Yahoo Finance behind a TTL cache and the OpenAI-compatible provider
/// pointed at `config.groq_api_base`. Finnhub headlines are added to the
/// news prompt when `config.finnhub_api_key` is set.
pub fn build_router(config: &ServerConfig) -> Result<Router> {
    let provider = OpenAIProvider::with_config(
        OpenAIConfig::new(config.require_api_key()?)
            .with_api_base(config.groq_api_base.clone())
            .with_timeout(config.llm_timeout.as_secs()),
    )?;

    let yahoo = YahooFinanceClient::new(Some(config.market_rate_limit))?;
    let market = CachedMarketData::new(Arc::new(yahoo), config.cache_ttl);

    let settings = AgentSettings {
        model: config.model.clone(),
        max_tokens: config.llm_max_tokens,
        temperature: config.llm_temperature,
    };

    let mut service = StockInsightService::new(
        Arc::new(market),
        Arc::new(provider),
        &settings,
        config.history_range,
    )?;

    if let Some(key) = &config.finnhub_api_key {
        let finnhub = FinnhubClient::new(key.clone(), None)?
            .with_api_base(config.finnhub_api_base.clone())
            .with_lookback_days(config.news_lookback_days);
        service = service.with_news_source(Arc::new(finnhub), config.news_limit);
    } else {
        info!("FINNHUB_API_KEY not set, news prompt will carry figures only");
    }

    Ok(routes::router(Arc::new(service), &config.static_dir))
}
