//! Gemini Relay - OpenAI-compatible proxy for the Gemini API
//!
//! This library provides the core functionality for the relay server. It
//! translates chat completion requests into Gemini `generateContent` calls,
//! falls back across API keys when one runs out of quota, and translates the
//! reply back.

pub mod config;
pub mod error;
pub mod proxy;
pub mod routes;
pub mod translate;
pub mod types;

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

pub use crate::config::Config;
pub use crate::proxy::{Dispatcher, GeminiClient, GenerativeProvider};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Dispatcher owning the credential list and the provider
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Create a new application state backed by the Gemini API
    pub fn new(config: Config) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(100)
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        let provider: Arc<dyn GenerativeProvider> =
            Arc::new(GeminiClient::new(http_client, &config));

        Ok(Self::with_provider(config, provider))
    }

    /// Create an application state around an explicit provider
    pub fn with_provider(config: Config, provider: Arc<dyn GenerativeProvider>) -> Self {
        let dispatcher = Dispatcher::new(provider, &config);

        Self {
            config,
            start_time: Instant::now(),
            dispatcher,
        }
    }
}
