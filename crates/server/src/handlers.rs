// ABOUTME: HTTP request handlers: health check, single scrape, and batch scrape.
// ABOUTME: Validates request JSON by hand so every rejection carries the exact contract message.

//! Request handling for the scrape API.
//!
//! Validation failures return 400 with Spanish contract messages; fetch and
//! extraction failures are business outcomes and still return 200 with
//! sentinel-shaped data. Batch requests are capped at
//! [`MAX_BATCH_URLS`] URLs and processed sequentially.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use prensa_extractor::{ensure_scheme, site_key, Scraper};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

/// Maximum URLs accepted by one batch request.
pub const MAX_BATCH_URLS: usize = 10;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The scraping pipeline every request runs through.
    pub scraper: Arc<Scraper>,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

/// Validation error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Unix time as fractional seconds.
fn unix_timestamp() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

/// GET / - liveness check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "News Scraper API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /scrape - extract one article.
///
/// The body must be a non-empty JSON object with a non-empty string `url`.
/// A URL without a scheme is assumed to be https.
async fn scrape(State(state): State<AppState>, payload: Option<Json<Value>>) -> Response {
    let data = match payload {
        Some(Json(data)) => data,
        None => return bad_request("No se proporcionaron datos JSON"),
    };
    let fields = match data.as_object() {
        Some(fields) if !fields.is_empty() => fields,
        _ => return bad_request("No se proporcionaron datos JSON"),
    };
    let url = match fields.get("url").and_then(Value::as_str) {
        Some(url) if !url.is_empty() => url,
        _ => return bad_request("URL requerida"),
    };

    let url = ensure_scheme(url);
    info!(url = %url, "processing scrape request");

    let article = state.scraper.fetch_and_extract(&url).await;
    let domain = site_key(&url);

    Json(json!({
        "success": true,
        "data": {
            "title": article.title,
            "body": article.body,
            "url": url,
            "domain": domain,
        },
        "timestamp": unix_timestamp(),
    }))
    .into_response()
}

/// POST /batch-scrape - extract up to [`MAX_BATCH_URLS`] articles.
///
/// URLs are processed sequentially; each entry in `data` mirrors the
/// single-scrape payload.
async fn batch_scrape(State(state): State<AppState>, payload: Option<Json<Value>>) -> Response {
    let data = match payload {
        Some(Json(data)) => data,
        None => return bad_request("Lista de URLs requerida"),
    };
    let urls_value = match data.as_object() {
        Some(fields) if !fields.is_empty() => fields.get("urls"),
        _ => None,
    };
    let urls = match urls_value {
        Some(urls) => urls,
        None => return bad_request("Lista de URLs requerida"),
    };
    let entries = match urls.as_array() {
        Some(entries) => entries,
        None => return bad_request("URLs debe ser una lista"),
    };
    if entries.len() > MAX_BATCH_URLS {
        return bad_request("Máximo 10 URLs por request");
    }
    let mut targets = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_str() {
            Some(url) => targets.push(url.to_string()),
            None => return bad_request("URLs debe ser una lista"),
        }
    }

    info!(count = targets.len(), "processing batch scrape request");

    let mut results = Vec::with_capacity(targets.len());
    for raw in &targets {
        let url = ensure_scheme(raw);
        let article = state.scraper.fetch_and_extract(&url).await;
        let domain = site_key(&url);
        results.push(json!({
            "url": url,
            "title": article.title,
            "body": article.body,
            "domain": domain,
        }));
    }

    let count = results.len();
    Json(json!({
        "success": true,
        "data": results,
        "count": count,
        "timestamp": unix_timestamp(),
    }))
    .into_response()
}

/// Creates the axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/scrape", post(scrape))
        .route("/batch-scrape", post(batch_scrape))
        .with_state(state)
}
