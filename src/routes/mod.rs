//! HTTP routes for Gemini Relay
//!
//! This module defines all HTTP endpoints exposed by the proxy.

pub mod chat;
pub mod health;

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

use crate::{error::AppError, AppState};

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut endpoint = post(chat::proxy_request);
    if state.config.cors_enabled {
        endpoint = endpoint.options(chat::preflight);
    }
    let endpoint = endpoint.fallback(chat::method_not_allowed);

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .route(&state.config.route, endpoint)
        // Global middleware (applied to all routes)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http());

    if state.config.cors_enabled {
        router = router.layer(cors_layer());
    }

    router.with_state(state)
}

/// Permissive CORS for browser clients
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Render a handler panic as a generic 500
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    error!(panic = %details, "Request handler panicked");

    AppError::Internal(anyhow::anyhow!("handler panicked")).into_response()
}
