//! LLM agents used by the analysis pipeline
//!
//! The news agent collects market context for a ticker; the analysis agent
//! turns that text into a structured recommendation table.

mod analysis;
mod news;

pub use analysis::AnalysisAgent;
pub use news::NewsAgent;

use insight_llm::LlmAgentConfig;
use regex::Regex;
use std::sync::LazyLock;

/// Settings shared by both agents
#[derive(Debug, Clone)]
pub struct AgentSettings {
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl AgentSettings {
    fn agent_config(&self, system_prompt: &str) -> LlmAgentConfig {
        LlmAgentConfig::default()
            .with_model(self.model.clone())
            .with_system_prompt(system_prompt)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
    }
}

/// `<think>` block, or an unterminated one running to the end of the text
static REASONING_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?(?:</think>|\z)").ok());

/// Remove `<think>…</think>` reasoning blocks emitted by reasoning models
///
/// An unterminated block swallows the rest of the text.
pub fn strip_reasoning(text: &str) -> String {
    match REASONING_BLOCK.as_ref() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Strip reasoning blocks and markdown heading / rule markers, then trim
pub fn clean_output(text: &str) -> String {
    strip_reasoning(text)
        .replace("###", "")
        .replace("----", "")
        .trim()
        .to_string()
}
