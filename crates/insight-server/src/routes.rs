//! HTTP routes

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::{Result, ServiceError};
use crate::market::HistoryRange;
use crate::report::StockReport;
use crate::service::{DEFAULT_TICKER, StockInsightService};

/// Body of `POST /get_stock_data`
#[derive(Debug, Deserialize)]
pub struct StockRequest {
    #[serde(default = "default_ticker")]
    pub ticker: String,
    #[serde(default)]
    pub range: Option<String>,
}

fn default_ticker() -> String {
    DEFAULT_TICKER.to_string()
}

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    service: Arc<StockInsightService>,
}

/// Build the application router
///
/// Unmatched paths are served from `static_dir`, so `/` returns its
/// `index.html`.
pub fn router(service: Arc<StockInsightService>, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/get_stock_data", post(get_stock_data))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(AppState { service })
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_stock_data(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StockRequest>, JsonRejection>,
) -> Result<Json<StockReport>> {
    let Json(request) = payload.map_err(|e| ServiceError::InvalidRequest(e.body_text()))?;

    let range = request
        .range
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .map(str::parse::<HistoryRange>)
        .transpose()?;

    let report = state.service.analyze(&request.ticker, range).await?;
    Ok(Json(report))
}
