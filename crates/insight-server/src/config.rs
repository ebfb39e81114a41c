//! Configuration for the web backend

use insight_llm::agent::DEFAULT_MODEL;
use insight_llm::providers::openai::GROQ_API_BASE;
use insight_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, ServiceError};
use crate::market::HistoryRange;
use crate::news::FINNHUB_API_BASE;
use crate::service::DEFAULT_NEWS_LIMIT;

/// Configuration for the web backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Directory holding `index.html` and front-end assets
    pub static_dir: PathBuf,

    /// History window used when a request names none
    pub history_range: HistoryRange,

    /// Lifetime of cached price history
    pub cache_ttl: Duration,

    /// Requests per minute against the market data provider
    pub market_rate_limit: u32,

    /// Groq API key
    #[serde(skip_serializing)]
    pub groq_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    pub groq_api_base: String,

    /// Model used by both agents
    pub model: String,

    /// Max tokens per completion
    pub llm_max_tokens: usize,

    /// Sampling temperature
    pub llm_temperature: f32,

    /// LLM request timeout
    pub llm_timeout: Duration,

    /// Finnhub API key; news headlines are skipped when unset
    #[serde(skip_serializing)]
    pub finnhub_api_key: Option<String>,

    /// Base URL of the Finnhub REST API
    pub finnhub_api_base: String,

    /// Most headlines rendered into the news prompt
    pub news_limit: usize,

    /// Days of company news to look back over
    pub news_lookback_days: u32,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_dir: PathBuf::from("static"),
            history_range: HistoryRange::OneMonth,
            cache_ttl: Duration::from_secs(300), // 5 minutes
            market_rate_limit: 60,
            groq_api_key: None,
            groq_api_base: GROQ_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            llm_max_tokens: 2048,
            llm_temperature: 0.3,
            llm_timeout: Duration::from_secs(120),
            finnhub_api_key: None,
            finnhub_api_base: FINNHUB_API_BASE.to_string(),
            news_limit: DEFAULT_NEWS_LIMIT,
            news_lookback_days: 7,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    /// Create a new configuration builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Unset keys keep their defaults; set but unparsable keys are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_var(&get, "PORT")?.unwrap_or(defaults.port),
            static_dir: get("STATIC_DIR").map_or(defaults.static_dir, PathBuf::from),
            history_range: get("HISTORY_RANGE")
                .map(|v| v.parse::<HistoryRange>())
                .transpose()?
                .unwrap_or(defaults.history_range),
            cache_ttl: parse_var(&get, "CACHE_TTL_SECS")?
                .map_or(defaults.cache_ttl, Duration::from_secs),
            market_rate_limit: parse_var(&get, "MARKET_RATE_LIMIT")?
                .unwrap_or(defaults.market_rate_limit),
            groq_api_key: get("GROQ_API_KEY"),
            groq_api_base: get("GROQ_API_BASE").unwrap_or(defaults.groq_api_base),
            model: get("GROQ_MODEL").unwrap_or(defaults.model),
            llm_max_tokens: parse_var(&get, "LLM_MAX_TOKENS")?.unwrap_or(defaults.llm_max_tokens),
            llm_temperature: parse_var(&get, "LLM_TEMPERATURE")?
                .unwrap_or(defaults.llm_temperature),
            llm_timeout: parse_var(&get, "LLM_TIMEOUT_SECS")?
                .map_or(defaults.llm_timeout, Duration::from_secs),
            finnhub_api_key: get("FINNHUB_API_KEY"),
            finnhub_api_base: get("FINNHUB_API_BASE").unwrap_or(defaults.finnhub_api_base),
            news_limit: parse_var(&get, "NEWS_LIMIT")?.unwrap_or(defaults.news_limit),
            news_lookback_days: parse_var(&get, "NEWS_LOOKBACK_DAYS")?
                .unwrap_or(defaults.news_lookback_days),
            log_format: get("LOG_FORMAT")
                .map(|v| v.parse::<LogFormat>().map_err(ServiceError::Config))
                .transpose()?
                .unwrap_or(defaults.log_format),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ServiceError::Config("host must not be empty".to_string()));
        }

        if self.market_rate_limit == 0 {
            return Err(ServiceError::Config(
                "market_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ServiceError::Config("model must not be empty".to_string()));
        }

        if self.llm_max_tokens == 0 {
            return Err(ServiceError::Config(
                "llm_max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm_temperature) {
            return Err(ServiceError::Config(format!(
                "llm_temperature must be between 0.0 and 2.0, got {}",
                self.llm_temperature
            )));
        }

        if self.news_lookback_days == 0 {
            return Err(ServiceError::Config(
                "news_lookback_days must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The Groq API key, or an error if it is not configured
    pub fn require_api_key(&self) -> Result<&str> {
        self.groq_api_key
            .as_deref()
            .ok_or_else(|| ServiceError::Config("GROQ_API_KEY is not set".to_string()))
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ServiceError::Config(format!("{key}={raw}: {e}")))
        })
        .transpose()
}

/// Builder for ServerConfig
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    base: Option<ServerConfig>,
    host: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
    history_range: Option<HistoryRange>,
    cache_ttl: Option<Duration>,
    market_rate_limit: Option<u32>,
    groq_api_key: Option<String>,
    model: Option<String>,
    finnhub_api_key: Option<String>,
    news_limit: Option<usize>,
    log_format: Option<LogFormat>,
}

impl ServerConfigBuilder {
    /// Start from an existing configuration instead of the defaults
    pub fn base(mut self, config: ServerConfig) -> Self {
        self.base = Some(config);
        self
    }

    /// Set the bind host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the bind port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the static asset directory
    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Set the default history range
    pub fn history_range(mut self, range: HistoryRange) -> Self {
        self.history_range = Some(range);
        self
    }

    /// Set the cache TTL
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Set the market data rate limit
    pub fn market_rate_limit(mut self, per_minute: u32) -> Self {
        self.market_rate_limit = Some(per_minute);
        self
    }

    /// Set the Groq API key
    pub fn groq_api_key(mut self, key: impl Into<String>) -> Self {
        self.groq_api_key = Some(key.into());
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the Finnhub API key
    pub fn finnhub_api_key(mut self, key: impl Into<String>) -> Self {
        self.finnhub_api_key = Some(key.into());
        self
    }

    /// Set the number of headlines per prompt
    pub fn news_limit(mut self, limit: usize) -> Self {
        self.news_limit = Some(limit);
        self
    }

    /// Set the log format
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ServerConfig> {
        let defaults = self.base.unwrap_or_default();

        let config = ServerConfig {
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            static_dir: self.static_dir.unwrap_or(defaults.static_dir),
            history_range: self.history_range.unwrap_or(defaults.history_range),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            market_rate_limit: self.market_rate_limit.unwrap_or(defaults.market_rate_limit),
            groq_api_key: self.groq_api_key.or(defaults.groq_api_key),
            model: self.model.unwrap_or(defaults.model),
            finnhub_api_key: self.finnhub_api_key.or(defaults.finnhub_api_key),
            news_limit: self.news_limit.unwrap_or(defaults.news_limit),
            log_format: self.log_format.unwrap_or(defaults.log_format),
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.history_range, HistoryRange::OneMonth);
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ServerConfig::builder()
            .host("0.0.0.0")
            .port(8080)
            .history_range(HistoryRange::ThreeMonths)
            .cache_ttl(Duration::from_secs(30))
            .build()
            .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.history_range, HistoryRange::ThreeMonths);
        assert_eq!(config.cache_ttl, Duration::from_secs(30));
    }

    #[test]
    fn test_builder_over_base() {
        let base = ServerConfig::from_lookup(lookup(&[("PORT", "9000"), ("GROQ_API_KEY", "k")]))
            .unwrap();
        let config = ServerConfig::builder().base(base).host("::1").build().unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "::1");
        assert_eq!(config.require_api_key().unwrap(), "k");
    }

    #[test]
    fn test_from_lookup() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("PORT", "8000"),
            ("HISTORY_RANGE", "6mo"),
            ("CACHE_TTL_SECS", "10"),
            ("GROQ_API_KEY", "gsk-test"),
            ("GROQ_MODEL", "mixtral-8x7b"),
            ("LLM_TEMPERATURE", "0.7"),
            ("LOG_FORMAT", "json"),
            ("STATIC_DIR", ""),
            ("FINNHUB_API_KEY", "fh-test"),
            ("NEWS_LIMIT", "3"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8000);
        assert_eq!(config.history_range, HistoryRange::SixMonths);
        assert_eq!(config.cache_ttl, Duration::from_secs(10));
        assert_eq!(config.groq_api_key.as_deref(), Some("gsk-test"));
        assert_eq!(config.model, "mixtral-8x7b");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.finnhub_api_key.as_deref(), Some("fh-test"));
        assert_eq!(config.news_limit, 3);
        assert_eq!(config.news_lookback_days, 7);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("PORT", "http")])),
            Err(ServiceError::Config(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("HISTORY_RANGE", "10y")])),
            Err(ServiceError::InvalidRange(_))
        ));
        assert!(matches!(
            ServerConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml")])),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn test_validation() {
        let config = ServerConfig {
            llm_temperature: 3.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            market_rate_limit: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            news_lookback_days: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_api_key() {
        let config = ServerConfig::default();
        assert!(matches!(
            config.require_api_key(),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = ServerConfig::builder()
            .groq_api_key("secret")
            .finnhub_api_key("news-secret")
            .build()
            .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
