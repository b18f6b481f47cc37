//! Request dispatcher
//!
//! Validates and translates an inbound body, then walks the configured
//! credentials in order until the provider accepts one. Only quota
//! exhaustion and transport faults advance to the next credential; any other
//! provider error is relayed to the caller unchanged.

use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;
use tracing::{error, Instrument};

use crate::{
    config::{Config, CredentialList, KeyStrategy, ProxyMode},
    error::{AppError, AppResult},
    proxy::{
        logging::RequestContext,
        provider::{GenerativeProvider, ProviderFailure},
    },
    translate::{apply_safety_override, translate_request, translate_response},
};

/// Single entry point for proxied requests
pub struct Dispatcher {
    provider: Arc<dyn GenerativeProvider>,
    credentials: CredentialList,
    strategy: KeyStrategy,
    mode: ProxyMode,
    model: String,
}

impl Dispatcher {
    /// Create a dispatcher over an explicit provider and configuration
    pub fn new(provider: Arc<dyn GenerativeProvider>, config: &Config) -> Self {
        Self {
            provider,
            credentials: config.credentials.clone(),
            strategy: config.key_strategy,
            mode: config.mode,
            model: config.gemini_model.clone(),
        }
    }

    pub fn mode(&self) -> ProxyMode {
        self.mode
    }

    /// Number of credentials a request may try
    pub fn credential_count(&self) -> usize {
        self.credentials.candidates(self.strategy).len()
    }

    /// Handle one inbound JSON body and produce the response body
    pub async fn handle(&self, body: Value) -> AppResult<Value> {
        let candidates = self.credentials.candidates(self.strategy);
        if candidates.is_empty() {
            error!("No provider credentials configured");
            return Err(AppError::MissingCredentials);
        }

        let payload = match self.mode {
            ProxyMode::Normalize => serde_json::to_value(translate_request(&body)?)
                .context("Failed to serialize Gemini request")?,
            ProxyMode::PassThrough => apply_safety_override(body)?,
        };

        let ctx = RequestContext::new(self.provider.name(), self.mode, &self.model);
        let span = ctx.create_span();
        let response = self
            .dispatch(&ctx, &candidates, &payload)
            .instrument(span)
            .await?;

        match self.mode {
            ProxyMode::Normalize => Ok(serde_json::to_value(translate_response(
                &response,
                &self.model,
            ))
            .context("Failed to serialize chat completion")?),
            ProxyMode::PassThrough => Ok(response),
        }
    }

    /// Try each candidate in order, one call in flight at a time
    async fn dispatch(
        &self,
        ctx: &RequestContext,
        candidates: &[(usize, &str)],
        payload: &Value,
    ) -> AppResult<Value> {
        ctx.log_request_start(candidates.len());
        let mut last_error: Option<String> = None;

        for (attempt, &(key_index, api_key)) in candidates.iter().enumerate() {
            ctx.log_attempt(attempt + 1, key_index);

            let failure = match self.provider.generate_content(payload, api_key).await {
                Ok(response) => {
                    ctx.log_request_complete(key_index, attempt + 1);
                    return Ok(response);
                }
                Err(failure) => failure,
            };

            let reason = failure.describe();
            // a single-key deployment relays quota errors like any other rejection
            let retryable = failure.is_quota_exhausted() && self.strategy == KeyStrategy::Fallback;
            match failure {
                ProviderFailure::Rejected { status, body } if !retryable => {
                    ctx.log_rejected(key_index, status.as_u16(), &reason);
                    return Err(AppError::Provider { status, body });
                }
                // quota exhaustion or transport fault
                _ => {
                    ctx.log_fallback(key_index, &reason);
                    last_error = Some(reason);
                }
            }
        }

        ctx.log_exhausted(candidates.len());
        Err(AppError::CredentialsExhausted {
            details: last_error,
        })
    }
}
