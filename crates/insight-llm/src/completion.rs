//! Single-turn completion request and response

/// Default cap on generated tokens
pub const DEFAULT_MAX_TOKENS: usize = 2048;

/// Default sampling temperature, low so reports stay factual
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// One prompt under a system instruction
///
/// Every agent in the pipeline asks a single question and reads a single
/// answer, so there is no conversation history.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model identifier (provider-specific)
    pub model: String,

    /// Instruction sent ahead of the prompt
    pub system: String,

    /// User prompt
    pub prompt: String,

    pub max_tokens: usize,

    /// Sampling temperature (0.0-2.0)
    pub temperature: f32,
}

impl CompletionRequest {
    /// Create a request with default limits
    pub fn new(
        model: impl Into<String>,
        system: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            prompt: prompt.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Generated text plus bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub text: String,
    pub stop_reason: StopReason,
    pub usage: TokenUsage,
}

impl CompletionResponse {
    /// A finished answer with unknown token usage
    pub fn finished(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    /// Whether generation was cut off by the token cap
    pub fn is_truncated(&self) -> bool {
        self.stop_reason == StopReason::MaxTokens
    }
}

/// Reason the LLM stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Natural completion
    EndTurn,

    /// Hit the max tokens limit
    MaxTokens,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl TokenUsage {
    /// Total tokens used (input + output)
    pub fn total(&self) -> usize {
        self.input_tokens + self.output_tokens
    }
}
