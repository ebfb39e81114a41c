//! Execution context for agents
//!
//! The `Context` struct is a key-value store carried through one analysis
//! request, so agents can tag their logs with request details.

use std::collections::HashMap;

/// Well-known context keys
pub mod keys {
    /// Ticker symbol under analysis
    pub const TICKER: &str = "ticker";
    /// History range requested (e.g., "1mo")
    pub const RANGE: &str = "range";
    /// Request ID for tracing
    pub const REQUEST_ID: &str = "request_id";
}

/// Context passed to agents during execution
///
/// # Example
///
/// ```
/// use insight_core::Context;
///
/// let ctx = Context::new()
///     .with_ticker("AAPL")
///     .with_request_id("req-123");
///
/// assert_eq!(ctx.ticker(), Some("AAPL"));
/// assert_eq!(ctx.request_id(), Some("req-123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ticker symbol
    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.insert(keys::TICKER, serde_json::json!(ticker.into()));
        self
    }

    /// Set the history range
    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.insert(keys::RANGE, serde_json::json!(range.into()));
        self
    }

    /// Set the request ID
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.insert(keys::REQUEST_ID, serde_json::json!(request_id.into()));
        self
    }

    /// Get the ticker symbol
    pub fn ticker(&self) -> Option<&str> {
        self.get(keys::TICKER).and_then(|v| v.as_str())
    }

    /// Get the history range
    pub fn range(&self) -> Option<&str> {
        self.get(keys::RANGE).and_then(|v| v.as_str())
    }

    /// Get the request ID
    pub fn request_id(&self) -> Option<&str> {
        self.get(keys::REQUEST_ID).and_then(|v| v.as_str())
    }

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Check if a key exists in the context
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Get the number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
