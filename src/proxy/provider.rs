//! Generative provider abstraction
//!
//! Defines the seam between the dispatcher and the remote generative-content
//! API so the fallback logic can run against a scripted provider in tests.

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::Value;

/// Why a single provider call did not succeed
#[derive(Debug, Clone)]
pub enum ProviderFailure {
    /// The provider answered with a non-success status and a JSON body
    Rejected { status: StatusCode, body: Value },
    /// The call never produced a usable answer (network, timeout, non-JSON body)
    Transport(String),
}

impl ProviderFailure {
    /// The provider-supplied `error.message`, if any
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            ProviderFailure::Rejected { body, .. } => {
                body.pointer("/error/message").and_then(Value::as_str)
            }
            ProviderFailure::Transport(_) => None,
        }
    }

    /// Whether this rejection signals an exhausted quota
    ///
    /// Detection is a case-insensitive substring match on `error.message`.
    /// Gemini exposes no structured quota code on this path.
    pub fn is_quota_exhausted(&self) -> bool {
        self.provider_message()
            .map(|message| message.to_lowercase().contains("quota"))
            .unwrap_or(false)
    }

    /// Short description for logs and the exhaustion response
    pub fn describe(&self) -> String {
        match self {
            ProviderFailure::Rejected { status, .. } => self
                .provider_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("Provider returned {}", status)),
            ProviderFailure::Transport(reason) => reason.clone(),
        }
    }
}

/// Trait implemented by generative-content backends
///
/// # Security
///
/// Implementations receive the credential per call and MUST NOT include it in
/// any `ProviderFailure` they return.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Issue one `generateContent` call with the given credential
    ///
    /// Returns the parsed JSON body on a success status.
    async fn generate_content(
        &self,
        body: &Value,
        api_key: &str,
    ) -> Result<Value, ProviderFailure>;
}
