//! Per-request analysis pipeline

use insight_core::{Agent, Context};
use insight_llm::LLMProvider;
use insight_metrics::{MetricsSnapshot, PriceSeries};
use std::sync::Arc;
use tracing::{Span, info, instrument, warn};
use uuid::Uuid;

use crate::agents::{AgentSettings, AnalysisAgent, NewsAgent};
use crate::chart::{ChartOptions, render_price_chart};
use crate::error::{Result, ServiceError};
use crate::market::{HistoryRange, MarketDataSource, normalize_ticker};
use crate::news::{Headline, NewsSource};
use crate::prompts::{NewsPromptVars, PromptLibrary};
use crate::report::{DISCLAIMER, KeyDetails, StockData, StockReport, recommendation_message};

/// Ticker used when a request names none
pub const DEFAULT_TICKER: &str = "TSLA";

/// Headlines rendered into the news prompt by default
pub const DEFAULT_NEWS_LIMIT: usize = 10;

/// Fetches history, computes metrics, runs both agents and assembles the report
pub struct StockInsightService {
    market: Arc<dyn MarketDataSource>,
    news: Option<Arc<dyn NewsSource>>,
    news_limit: usize,
    news_agent: NewsAgent,
    analysis_agent: AnalysisAgent,
    prompts: PromptLibrary,
    default_range: HistoryRange,
}

impl StockInsightService {
    /// Create a new service
    pub fn new(
        market: Arc<dyn MarketDataSource>,
        provider: Arc<dyn LLMProvider>,
        settings: &AgentSettings,
        default_range: HistoryRange,
    ) -> Result<Self> {
        Ok(Self {
            market,
            news: None,
            news_limit: DEFAULT_NEWS_LIMIT,
            news_agent: NewsAgent::new(Arc::clone(&provider), settings),
            analysis_agent: AnalysisAgent::new(provider, settings),
            prompts: PromptLibrary::new()?,
            default_range,
        })
    }

    /// Render up to `limit` headlines from `news` into the news prompt
    pub fn with_news_source(mut self, news: Arc<dyn NewsSource>, limit: usize) -> Self {
        self.news = Some(news);
        self.news_limit = limit;
        self
    }

    /// Range used when a request names none
    pub fn default_range(&self) -> HistoryRange {
        self.default_range
    }

    /// Build the full report for `ticker`
    ///
    /// Fails with [`ServiceError::NoData`] before any LLM call when the
    /// history is empty.
    #[instrument(skip(self, range), fields(request_id = tracing::field::Empty, range = tracing::field::Empty))]
    pub async fn analyze(&self, ticker: &str, range: Option<HistoryRange>) -> Result<StockReport> {
        let ticker = normalize_ticker(ticker)?;
        let range = range.unwrap_or(self.default_range);
        let request_id = Uuid::new_v4().to_string();

        let span = Span::current();
        span.record("request_id", request_id.as_str());
        span.record("range", range.as_str());

        let points = self.market.fetch_history(&ticker, range).await?;
        if points.is_empty() {
            return Err(ServiceError::NoData(ticker));
        }

        let series = PriceSeries::new(points)?;
        let snapshot = MetricsSnapshot::compute(&series);
        let key_details = KeyDetails::from_snapshot(&ticker, &snapshot);
        info!(
            points = series.len(),
            recommendation = %snapshot.recommendation,
            "Computed metrics"
        );

        let facts = key_details.facts();
        let headlines = self.headlines(&ticker).await;
        let prompt = self.prompts.news_prompt(&NewsPromptVars {
            ticker: &ticker,
            period: range.description(),
            facts: &facts,
            headlines: &headlines,
        })?;

        let mut context = Context::new()
            .with_ticker(ticker.clone())
            .with_range(range.as_str())
            .with_request_id(request_id);

        let news = self.news_agent.process(prompt, &mut context).await?;
        let analysis = self
            .analysis_agent
            .process(news.clone(), &mut context)
            .await?;

        let chart_options =
            ChartOptions::default().with_title(format!("Stock Price Over the {}", range.description()));
        let stock_plot = render_price_chart(&series, &chart_options);

        info!("Report ready");

        Ok(StockReport {
            stock_data: StockData::from(&series),
            news,
            analysis,
            stock_plot,
            key_details,
            recommendation: recommendation_message(snapshot.recommendation).to_string(),
            disclaimer: DISCLAIMER.to_string(),
        })
    }

    /// Recent headlines, or none when the source is absent or failing
    async fn headlines(&self, ticker: &str) -> Vec<Headline> {
        let Some(news) = &self.news else {
            return Vec::new();
        };
        if self.news_limit == 0 {
            return Vec::new();
        }

        match news.recent_headlines(ticker, self.news_limit).await {
            Ok(headlines) => {
                info!(headlines = headlines.len(), "Fetched news headlines");
                headlines
            }
            Err(e) => {
                warn!("Continuing without headlines: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::MockMarketDataSource;
    use crate::news::MockNewsSource;
    use chrono::NaiveDate;
    use crate::test_support::{MockProvider, agent_settings, points_from_closes, scripted_provider};
    use insight_metrics::Recommendation;
    use mockall::predicate::eq;

    fn service(market: MockMarketDataSource, provider: MockProvider) -> StockInsightService {
        StockInsightService::new(
            Arc::new(market),
            Arc::new(provider),
            &agent_settings(),
            HistoryRange::OneMonth,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_full_report() {
        let mut market = MockMarketDataSource::new();
        market
            .expect_fetch_history()
            .with(eq("AAPL"), eq(HistoryRange::OneMonth))
            .times(1)
            .returning(|_, _| Ok(points_from_closes(&[100.0, 102.0])));

        let report = service(market, scripted_provider())
            .analyze(" aapl ", None)
            .await
            .unwrap();

        assert_eq!(report.key_details.symbol, "AAPL");
        assert_eq!(report.key_details.performance.one_day, "2.00%");
        assert_eq!(
            report.recommendation,
            recommendation_message(Recommendation::Hold)
        );
        assert_eq!(report.news, "| Ticker | AAPL |");
        assert_eq!(report.analysis, "Recommendation\n| Hold |");
        assert!(report.stock_plot.contains("Stock Price Over the Last Month"));
        assert_eq!(report.stock_data.close.len(), 2);
        assert_eq!(report.disclaimer, DISCLAIMER);
    }

    #[tokio::test]
    async fn test_news_prompt_carries_metrics() {
        let mut market = MockMarketDataSource::new();
        market
            .expect_fetch_history()
            .returning(|_, _| Ok(points_from_closes(&[100.0, 95.0])));

        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .withf(|req| {
                let text = req.prompt.as_str();
                !req.system.starts_with("Analyze")
                    && text.contains("MSFT")
                    && text.contains("1-Day Change: -5.00%")
                    && text.contains("last 3 months")
            })
            .times(1)
            .returning(|_| Ok(crate::test_support::reply("news")));
        provider
            .expect_complete()
            .withf(|req| req.prompt == "news")
            .times(1)
            .returning(|_| Ok(crate::test_support::reply("analysis")));

        let report = service(market, provider)
            .analyze("MSFT", Some(HistoryRange::ThreeMonths))
            .await
            .unwrap();

        assert_eq!(
            report.recommendation,
            recommendation_message(Recommendation::Sell)
        );
    }

    fn headline(title: &str) -> Headline {
        Headline {
            title: title.to_string(),
            source: "Bloomberg".to_string(),
            published: NaiveDate::from_ymd_opt(2024, 10, 1).unwrap(),
            url: String::new(),
            summary: String::new(),
        }
    }

    #[tokio::test]
    async fn test_headlines_reach_news_prompt() {
        let mut market = MockMarketDataSource::new();
        market
            .expect_fetch_history()
            .returning(|_, _| Ok(points_from_closes(&[100.0, 101.0])));

        let mut news = MockNewsSource::new();
        news.expect_recent_headlines()
            .with(eq("NVDA"), eq(3))
            .times(1)
            .returning(|_, _| Ok(vec![headline("Chip demand surges")]));

        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .withf(|req| {
                req.prompt.contains("1-Day Change: 1.00%")
                    && req.prompt.contains("- 2024-10-01 | Bloomberg: Chip demand surges")
            })
            .times(1)
            .returning(|_| Ok(crate::test_support::reply("news")));
        provider
            .expect_complete()
            .withf(|req| req.prompt == "news")
            .times(1)
            .returning(|_| Ok(crate::test_support::reply("analysis")));

        let report = service(market, provider)
            .with_news_source(Arc::new(news), 3)
            .analyze("nvda", None)
            .await
            .unwrap();

        assert_eq!(report.news, "news");
    }

    #[tokio::test]
    async fn test_news_failure_is_not_fatal() {
        let mut market = MockMarketDataSource::new();
        market
            .expect_fetch_history()
            .returning(|_, _| Ok(points_from_closes(&[100.0, 101.0])));

        let mut news = MockNewsSource::new();
        news.expect_recent_headlines()
            .times(1)
            .returning(|_, _| Err(ServiceError::News("HTTP 429".to_string())));

        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .withf(|req| !req.prompt.contains("Recent news headlines"))
            .times(2)
            .returning(|_| Ok(crate::test_support::reply("ok")));

        let result = service(market, provider)
            .with_news_source(Arc::new(news), 5)
            .analyze("AMD", None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_empty_history_skips_llm() {
        let mut market = MockMarketDataSource::new();
        market.expect_fetch_history().returning(|_, _| Ok(Vec::new()));

        let mut provider = MockProvider::new();
        provider.expect_complete().never();

        let result = service(market, provider).analyze("ZZZZ", None).await;
        assert!(matches!(result, Err(ServiceError::NoData(t)) if t == "ZZZZ"));
    }

    #[tokio::test]
    async fn test_invalid_ticker_skips_fetch() {
        let mut market = MockMarketDataSource::new();
        market.expect_fetch_history().never();

        let result = service(market, MockProvider::new())
            .analyze("not a ticker", None)
            .await;
        assert!(matches!(result, Err(ServiceError::InvalidSymbol(_))));
    }

    #[tokio::test]
    async fn test_out_of_order_history_is_malformed() {
        let mut market = MockMarketDataSource::new();
        market.expect_fetch_history().returning(|_, _| {
            let mut points = points_from_closes(&[100.0, 101.0]);
            points.reverse();
            Ok(points)
        });

        let result = service(market, MockProvider::new())
            .analyze("AAPL", None)
            .await;
        assert!(matches!(result, Err(ServiceError::MalformedSeries(_))));
    }
}
