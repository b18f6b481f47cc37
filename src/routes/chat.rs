//! Proxied generation endpoint
//!
//! Serves the OpenAI-compatible chat completions route in normalized mode and
//! the raw Gemini route in pass-through mode. Both hand the parsed body to the
//! dispatcher.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{error::AppError, AppState};

/// Handle a proxied POST request
pub async fn proxy_request(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejecting request with unparseable body");
        AppError::BadRequest(format!("Invalid JSON body: {}", e))
    })?;

    debug!(mode = %state.dispatcher.mode().as_str(), "Processing proxied request");

    state.dispatcher.handle(body).await.map(Json)
}

/// CORS preflight for clients that send OPTIONS without preflight headers
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any method the endpoint does not serve
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
