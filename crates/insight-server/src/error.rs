//! Error types for the web backend

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use insight_llm::LLMError;
use insight_metrics::MetricsError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced by the analysis pipeline and HTTP handlers
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request body could not be parsed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Ticker failed basic validation
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// History range not in the supported set
    #[error("Unsupported range: {0}")]
    InvalidRange(String),

    /// Upstream returned an empty history
    #[error("No stock data available for {0}. Please check the ticker symbol and try again.")]
    NoData(String),

    /// Market data provider failure
    #[error("Market data error: {0}")]
    MarketData(String),

    /// News headline provider failure
    #[error("News source error: {0}")]
    News(String),

    /// Upstream series could not be validated
    #[error("Malformed price history: {0}")]
    MalformedSeries(#[from] MetricsError),

    /// LLM agent failure
    #[error("Analysis failed: {0}")]
    Agent(#[from] insight_core::Error),

    /// LLM provider failure outside an agent
    #[error("LLM error: {0}")]
    Llm(#[from] LLMError),

    /// Prompt template failure
    #[error("Prompt error: {0}")]
    Prompt(#[from] minijinja::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for backend operations
pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    /// HTTP status reported to the client
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_)
            | Self::InvalidSymbol(_)
            | Self::InvalidRange(_)
            | Self::NoData(_) => StatusCode::BAD_REQUEST,
            Self::MarketData(_)
            | Self::News(_)
            | Self::MalformedSeries(_)
            | Self::Agent(_)
            | Self::Llm(_) => StatusCode::BAD_GATEWAY,
            Self::Prompt(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = %status, "Request failed: {}", self);
        } else {
            warn!(status = %status, "Request rejected: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
