//! Prompt templates for the analysis agents
//!
//! Templates use MiniJinja syntax and are compiled once at startup.

use minijinja::Environment;
use serde::Serialize;

use crate::error::Result;
use crate::news::Headline;

/// Template name of the news agent's user message
pub const NEWS_PROMPT: &str = "news.user";

const NEWS_PROMPT_TEMPLATE: &str = r#"Collect stock data and market insights for {{ ticker }}.
1. Summarize historical stock prices, volume changes, and performance over the {{ period | lower }}.
2. Search for recent news articles related to {{ ticker }} that might impact its stock performance.
3. Analyze key financial indicators such as moving averages, volatility, and momentum.
4. Based on historical trends and recent news, provide a stock recommendation (Buy, Hold, or Sell).
5. At last, display the disclaimer: "Please do your own research before making any financial decisions."
{% if facts %}
Use these figures computed from the {{ period | lower }} of daily prices:
{% for fact in facts -%}
- {{ fact.label }}: {{ fact.value }}
{% endfor %}{% endif %}{% if headlines %}
Recent news headlines for {{ ticker }}:
{% for h in headlines -%}
- {{ h.published }} | {{ h.source }}: {{ h.title }}
{% endfor %}{% endif %}"#;

/// One labelled figure injected into a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptFact {
    pub label: String,
    pub value: String,
}

impl PromptFact {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Variables of the news prompt
#[derive(Debug, Clone, Serialize)]
pub struct NewsPromptVars<'a> {
    pub ticker: &'a str,
    /// e.g. "Last Month"
    pub period: &'a str,
    pub facts: &'a [PromptFact],
    /// Newest first; empty when no news source is configured
    pub headlines: &'a [Headline],
}

/// Compiled prompt templates
pub struct PromptLibrary {
    env: Environment<'static>,
}

impl PromptLibrary {
    /// Compile the built-in templates
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(NEWS_PROMPT, NEWS_PROMPT_TEMPLATE)?;
        Ok(Self { env })
    }

    /// Render the news agent's user message
    pub fn news_prompt(&self, vars: &NewsPromptVars<'_>) -> Result<String> {
        let template = self.env.get_template(NEWS_PROMPT)?;
        Ok(template.render(vars)?)
    }
}

impl std::fmt::Debug for PromptLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptLibrary")
            .field("templates", &[NEWS_PROMPT])
            .finish()
    }
}
