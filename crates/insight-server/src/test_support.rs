//! Shared fixtures for unit tests

use chrono::NaiveDate;
use insight_llm::{CompletionRequest, CompletionResponse, LLMProvider};
use insight_metrics::PricePoint;
use mockall::mock;

use crate::agents::AgentSettings;

mock! {
    pub Provider {}

    #[async_trait::async_trait]
    impl LLMProvider for Provider {
        async fn complete(&self, request: CompletionRequest) -> insight_llm::Result<CompletionResponse>;
        fn name(&self) -> &str;
    }
}

pub fn reply(text: &str) -> CompletionResponse {
    CompletionResponse::finished(text)
}

pub fn agent_settings() -> AgentSettings {
    AgentSettings {
        model: "llama-3.3-70b-versatile".to_string(),
        max_tokens: 512,
        temperature: 0.3,
    }
}

/// Answers the news agent with a table and the analysis agent with a
/// markdown-decorated verdict
pub fn scripted_provider() -> MockProvider {
    let mut provider = MockProvider::new();
    provider.expect_complete().returning(|req| {
        let is_analysis = req.system.starts_with("Analyze the given stock data.");
        if is_analysis {
            Ok(reply("### Recommendation\n| Hold |\n"))
        } else {
            Ok(reply("<think>look up news</think>\n| Ticker | AAPL |\n"))
        }
    });
    provider
}

/// Consecutive daily points starting 2024-01-01 with volume 1000, 1100, ...
pub fn points_from_closes(closes: &[f64]) -> Vec<PricePoint> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    closes
        .iter()
        .zip(start.iter_days())
        .enumerate()
        .map(|(i, (&close, date))| {
            PricePoint::new(date, close, close + 1.0, close - 1.0, close, 1_000 + i as u64 * 100)
        })
        .collect()
}
