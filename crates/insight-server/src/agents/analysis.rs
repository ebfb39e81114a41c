//! Analysis and recommendation agent

use insight_core::{Agent, Context, Result};
use insight_llm::{LLMProvider, LlmAgent};
use std::sync::Arc;
use tracing::debug;

use super::{AgentSettings, clean_output};

const SYSTEM_PROMPT: &str = r"Analyze the given stock data.
Identify trends, volatility, and key indicators such as moving averages.
Based on the analysis, provide a recommendation (Buy, Hold, Sell).
Ensure the output is structured in a table format with all key details.
";

/// Agent that turns collected market context into a recommendation table
pub struct AnalysisAgent {
    agent: LlmAgent,
}

impl AnalysisAgent {
    /// Create a new analysis agent
    pub fn new(provider: Arc<dyn LLMProvider>, settings: &AgentSettings) -> Self {
        let agent = LlmAgent::new(provider, settings.agent_config(SYSTEM_PROMPT), "analysis");
        Self { agent }
    }
}

#[async_trait::async_trait]
impl Agent for AnalysisAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        debug!(input_len = input.len(), "Analyzing collected data");
        let raw = self.agent.process(input, context).await?;
        Ok(clean_output(&raw))
    }

    fn name(&self) -> &str {
        "AnalysisAgent"
    }
}
