//! News and market-context agent

use insight_core::{Agent, Context, Result};
use insight_llm::{LLMProvider, LlmAgent};
use std::sync::Arc;
use tracing::debug;

use super::{AgentSettings, strip_reasoning};

const SYSTEM_PROMPT: &str = r"You are a finance research assistant covering listed equities.

When asked about a stock:
1. Summarize price and volume behaviour over the requested period
2. Report recent news that could move the stock
3. Discuss moving averages, volatility and momentum
4. Give a Buy, Hold or Sell view with the main reasons

Use tables to represent data. Prefer the figures supplied in the request over
anything you recall, and say so when information may be out of date.
";

/// Agent that gathers price context and news for a ticker
pub struct NewsAgent {
    agent: LlmAgent,
}

impl NewsAgent {
    /// Create a new news agent
    pub fn new(provider: Arc<dyn LLMProvider>, settings: &AgentSettings) -> Self {
        let agent = LlmAgent::new(provider, settings.agent_config(SYSTEM_PROMPT), "news");
        Self { agent }
    }
}

#[async_trait::async_trait]
impl Agent for NewsAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        debug!(ticker = context.ticker().unwrap_or("-"), "Collecting market news");
        let raw = self.agent.process(input, context).await?;
        Ok(strip_reasoning(&raw).trim().to_string())
    }

    fn name(&self) -> &str {
        "NewsAgent"
    }
}
