//! Configuration management for Gemini Relay
//!
//! Configuration is loaded from environment variables once at startup and
//! handed to the dispatcher; request handling never reads the environment.

use anyhow::{bail, Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Environment variables holding provider credentials, in fallback order
pub const CREDENTIAL_VARS: [&str; 5] = [
    "GOOGLE_API_KEY",
    "GOOGLE_API_KEY_2",
    "GOOGLE_API_KEY_3",
    "GOOGLE_API_KEY_4",
    "GOOGLE_API_KEY_5",
];

/// How request and response bodies are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMode {
    /// Translate OpenAI chat completions to Gemini and back
    Normalize,
    /// Forward a Gemini body as-is, overriding only the safety settings
    PassThrough,
}

impl ProxyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProxyMode::Normalize => "normalize",
            ProxyMode::PassThrough => "passthrough",
        }
    }

    /// Route served when `RELAY_ROUTE` is not set
    pub fn default_route(&self) -> &'static str {
        match self {
            ProxyMode::Normalize => "/api/v1/chat/completions",
            ProxyMode::PassThrough => "/api/gemini",
        }
    }
}

impl FromStr for ProxyMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normalize" | "normalized" => Ok(ProxyMode::Normalize),
            "passthrough" | "pass-through" => Ok(ProxyMode::PassThrough),
            other => bail!("unknown proxy mode '{}'", other),
        }
    }
}

/// Which configured credentials a request may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStrategy {
    /// Only the first configured credential
    Single,
    /// Every configured credential, advancing on quota errors
    Fallback,
}

impl FromStr for KeyStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(KeyStrategy::Single),
            "fallback" => Ok(KeyStrategy::Fallback),
            other => bail!("unknown key strategy '{}'", other),
        }
    }
}

/// Ordered provider credentials
///
/// Slots keep their configured position so logs can refer to a credential by
/// index. Blank slots are never offered as candidates. The `Debug` output only
/// reports counts.
#[derive(Clone, Default)]
pub struct CredentialList {
    slots: Vec<Option<String>>,
}

impl CredentialList {
    /// Build a list from raw slot values, treating blank values as absent
    pub fn from_slots<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let slots = slots
            .into_iter()
            .map(|slot| {
                slot.map(Into::into)
                    .map(|value: String| value.trim().to_string())
                    .filter(|value| !value.is_empty())
            })
            .collect();
        Self { slots }
    }

    /// Credentials to try for one request, as `(slot index, secret)` pairs
    pub fn candidates(&self, strategy: KeyStrategy) -> Vec<(usize, &str)> {
        let present = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_deref().map(|key| (index, key)));

        match strategy {
            KeyStrategy::Single => present.take(1).collect(),
            KeyStrategy::Fallback => present.collect(),
        }
    }

    /// Number of non-blank credentials
    pub fn configured(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.configured() == 0
    }
}

impl fmt::Debug for CredentialList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialList")
            .field("configured", &self.configured())
            .field("slots", &self.slots.len())
            .finish()
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// Body handling mode
    pub mode: ProxyMode,
    /// Credential selection strategy
    pub key_strategy: KeyStrategy,
    /// Path of the proxied endpoint
    pub route: String,
    /// Serve permissive CORS headers and OPTIONS preflight
    pub cors_enabled: bool,

    /// Gemini API base URL (up to and including the API version)
    pub gemini_api_url: String,
    /// Gemini model used in the outbound path and reported back to clients
    pub gemini_model: String,
    /// Bound on each outbound call
    pub request_timeout_seconds: u64,

    /// Provider credentials
    pub credentials: CredentialList,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode: ProxyMode = lookup("RELAY_MODE")
            .unwrap_or_else(|| "normalize".to_string())
            .parse()
            .context("Invalid RELAY_MODE")?;

        Ok(Self {
            host: lookup("RELAY_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("RELAY_PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("Invalid RELAY_PORT")?,

            mode,
            key_strategy: lookup("RELAY_KEY_STRATEGY")
                .unwrap_or_else(|| "fallback".to_string())
                .parse()
                .context("Invalid RELAY_KEY_STRATEGY")?,
            route: lookup("RELAY_ROUTE")
                .filter(|route| route.starts_with('/'))
                .unwrap_or_else(|| mode.default_route().to_string()),
            cors_enabled: lookup("RELAY_CORS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),

            gemini_api_url: lookup("GEMINI_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            gemini_model: lookup("GEMINI_MODEL")
                .unwrap_or_else(|| "gemini-2.5-flash".to_string()),
            request_timeout_seconds: lookup("GEMINI_TIMEOUT_SECONDS")
                .unwrap_or_else(|| "60".to_string())
                .parse()
                .context("Invalid GEMINI_TIMEOUT_SECONDS")?,

            credentials: CredentialList::from_slots(
                CREDENTIAL_VARS.iter().map(|name| lookup(name)),
            ),
        })
    }
}
