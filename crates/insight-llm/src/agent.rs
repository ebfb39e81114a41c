//! Prompt-in / text-out agent backed by an [`LLMProvider`]

use crate::completion::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::{CompletionRequest, LLMProvider};
use async_trait::async_trait;
use insight_core::{Agent, Context, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Default Groq model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Configuration for an [`LlmAgent`]
#[derive(Debug, Clone)]
pub struct LlmAgentConfig {
    /// Model to use
    pub model: String,

    /// System prompt
    pub system_prompt: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Temperature for sampling
    pub temperature: f32,
}

impl Default for LlmAgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: "You are a helpful assistant.".to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl LlmAgentConfig {
    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// An agent that sends its input as a single user turn and returns the reply
///
/// # Example
///
/// ```no_run
/// use insight_core::{Agent, Context};
/// use insight_llm::providers::OpenAIProvider;
/// use insight_llm::{LlmAgent, LlmAgentConfig};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = Arc::new(OpenAIProvider::new("gsk-...")?);
/// let config = LlmAgentConfig::default()
///     .with_system_prompt("Analyze the given stock data.");
///
/// let agent = LlmAgent::new(provider, config, "analysis");
/// let mut context = Context::new().with_ticker("TSLA");
/// let reply = agent.process("...".to_string(), &mut context).await?;
/// # Ok(())
/// # }
/// ```
pub struct LlmAgent {
    provider: Arc<dyn LLMProvider>,
    config: LlmAgentConfig,
    name: String,
}

impl LlmAgent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        config: LlmAgentConfig,
        name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            config,
            name: name.into(),
        }
    }
}

#[async_trait]
impl Agent for LlmAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        let request = CompletionRequest::new(
            self.config.model.clone(),
            self.config.system_prompt.clone(),
            input,
        )
        .with_max_tokens(self.config.max_tokens)
        .with_temperature(self.config.temperature);

        let response = self.provider.complete(request).await?;
        let request_id = context.request_id().unwrap_or("-");

        if response.is_truncated() {
            warn!(
                agent = %self.name,
                request_id,
                max_tokens = self.config.max_tokens,
                "Completion hit the token limit"
            );
        }
        debug!(
            agent = %self.name,
            request_id,
            tokens = response.usage.total(),
            "Completion received"
        );

        Ok(response.text)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
