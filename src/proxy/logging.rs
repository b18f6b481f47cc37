//! Request logging utilities for the dispatcher
//!
//! Provides structured logging with correlation IDs. Credentials are referred
//! to by their configured slot index only.

use std::time::Instant;
use tracing::{debug, info, warn, Span};
use uuid::Uuid;

use crate::config::ProxyMode;

/// Context for tracking a request through the dispatcher
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request (for log correlation)
    pub trace_id: String,
    /// When the request started
    pub start_time: Instant,
    /// Provider handling this request
    pub provider: String,
    /// Body handling mode
    pub mode: ProxyMode,
    /// Model being used
    pub model: String,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(provider: &str, mode: ProxyMode, model: &str) -> Self {
        Self {
            trace_id: Uuid::new_v4().to_string()[..8].to_string(), // Short ID for readability
            start_time: Instant::now(),
            provider: provider.to_string(),
            mode,
            model: model.to_string(),
        }
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.start_time.elapsed().as_millis()
    }

    /// Log request initiation
    pub fn log_request_start(&self, candidates: usize) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            mode = %self.mode.as_str(),
            model = %self.model,
            candidates = %candidates,
            "Request started"
        );
    }

    /// Log an outbound attempt with a credential slot
    pub fn log_attempt(&self, attempt: usize, key_index: usize) {
        debug!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            attempt = %attempt,
            key_index = %key_index,
            elapsed_ms = %self.elapsed_ms(),
            "Sending request to provider"
        );
    }

    /// Log a fallback to the next credential
    pub fn log_fallback(&self, key_index: usize, reason: &str) {
        warn!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            key_index = %key_index,
            reason = %reason,
            elapsed_ms = %self.elapsed_ms(),
            "Credential failed, falling back to next"
        );
    }

    /// Log a provider error that is relayed to the caller
    pub fn log_rejected(&self, key_index: usize, status: u16, reason: &str) {
        warn!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            key_index = %key_index,
            status = %status,
            reason = %reason,
            elapsed_ms = %self.elapsed_ms(),
            "Provider rejected request"
        );
    }

    /// Log exhaustion of every candidate
    pub fn log_exhausted(&self, attempts: usize) {
        warn!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            attempts = %attempts,
            elapsed_ms = %self.elapsed_ms(),
            "All credentials exhausted"
        );
    }

    /// Log successful request completion
    pub fn log_request_complete(&self, key_index: usize, attempts: usize) {
        info!(
            trace_id = %self.trace_id,
            provider = %self.provider,
            mode = %self.mode.as_str(),
            model = %self.model,
            key_index = %key_index,
            attempts = %attempts,
            elapsed_ms = %self.elapsed_ms(),
            "Request completed successfully"
        );
    }

    /// Create a tracing span for this request
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "dispatch",
            trace_id = %self.trace_id,
            provider = %self.provider,
            mode = %self.mode.as_str(),
        )
    }
}
