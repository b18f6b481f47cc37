//! Gemini API client
//!
//! Issues `generateContent` calls against the Google Generative Language API.
//! The credential travels as the `key` query parameter, so every error that
//! leaves this module has its URL stripped.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    config::Config,
    proxy::provider::{GenerativeProvider, ProviderFailure},
};

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.gemini_api_url.clone(),
            model: config.gemini_model.clone(),
        }
    }

    /// Endpoint URL without the credential
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build default headers for Gemini requests
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }
}

fn transport_failure(context: &str, err: reqwest::Error) -> ProviderFailure {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else {
        "failed"
    };
    ProviderFailure::Transport(format!("{} {}: {}", context, kind, err.without_url()))
}

#[async_trait]
impl GenerativeProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate_content(
        &self,
        body: &Value,
        api_key: &str,
    ) -> Result<Value, ProviderFailure> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .headers(self.default_headers())
            .json(body)
            .send()
            .await
            .map_err(|e| transport_failure("Gemini request", e))?;

        let status = response.status();
        debug!(status = %status, "Gemini response status");

        let bytes = response
            .bytes()
            .await
            .map_err(|e| transport_failure("Reading Gemini response", e))?;

        let parsed: Value = serde_json::from_slice(&bytes).map_err(|e| {
            ProviderFailure::Transport(format!(
                "Gemini returned a non-JSON body with status {}: {}",
                status, e
            ))
        })?;

        if !status.is_success() {
            return Err(ProviderFailure::Rejected {
                status,
                body: parsed,
            });
        }

        Ok(parsed)
    }
}
