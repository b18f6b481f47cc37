//! Mock Gemini API for testing
//!
//! Provides wiremock-based mocks for `POST /v1beta/models/{model}:generateContent`.
//! Every mock is keyed on the `key` query parameter so tests can script a
//! different outcome per credential.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::mocks::gemini::MockGemini;
//!
//! #[tokio::test]
//! async fn test_with_gemini_mock() {
//!     let gemini = MockGemini::start().await;
//!     gemini.mock_quota_exceeded("key-1").await;
//!     gemini.mock_success("key-2", "Hello!").await;
//!
//!     // Use gemini.api_url() as GEMINI_API_URL
//! }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

/// Model every mock answers for
pub const MOCK_MODEL: &str = "gemini-2.5-flash";

/// Mock Gemini server wrapper
pub struct MockGemini {
    server: MockServer,
}

impl MockGemini {
    /// Start a new mock Gemini server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Base URL to use as `GEMINI_API_URL`
    pub fn api_url(&self) -> String {
        format!("{}/v1beta", self.server.uri())
    }

    fn generate_path() -> String {
        format!("/v1beta/models/{}:generateContent", MOCK_MODEL)
    }

    async fn mount_for_key(&self, key: &str, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(Self::generate_path()))
            .and(query_param("key", key))
            .and(header("Content-Type", "application/json"))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    // =========================================================================
    // POST /v1beta/models/{model}:generateContent
    // =========================================================================

    /// Mock a successful generation returning `text`
    pub async fn mock_success(&self, key: &str, text: &str) {
        self.mock_raw_success(key, GenerateContentResponseMock::with_text(text))
            .await;
    }

    /// Mock a successful generation with an arbitrary body
    pub async fn mock_raw_success<T: Serialize>(&self, key: &str, body: T) {
        self.mount_for_key(key, ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    /// Mock 429 RESOURCE_EXHAUSTED with a quota message
    pub async fn mock_quota_exceeded(&self, key: &str) {
        self.mock_error(
            key,
            429,
            "RESOURCE_EXHAUSTED",
            "Quota exceeded for quota metric 'Generate Content API requests per minute'",
        )
        .await;
    }

    /// Mock an arbitrary Gemini error response
    pub async fn mock_error(&self, key: &str, status: u16, status_text: &str, message: &str) {
        let body = GeminiErrorResponseMock {
            error: GeminiErrorMock {
                code: status,
                message: message.to_string(),
                status: status_text.to_string(),
            },
        };
        self.mount_for_key(key, ResponseTemplate::new(status).set_body_json(&body))
            .await;
    }

    /// Mock a response whose body is not JSON
    pub async fn mock_malformed(&self, key: &str) {
        self.mount_for_key(
            key,
            ResponseTemplate::new(502)
                .set_body_string("<html><body>Bad Gateway</body></html>")
                .insert_header("Content-Type", "text/html"),
        )
        .await;
    }

    /// Mock a success that only arrives after `delay`
    pub async fn mock_slow_success(&self, key: &str, text: &str, delay: Duration) {
        self.mount_for_key(
            key,
            ResponseTemplate::new(200)
                .set_body_json(GenerateContentResponseMock::with_text(text))
                .set_delay(delay),
        )
        .await;
    }

    // =========================================================================
    // Request inspection
    // =========================================================================

    /// Credentials of every received request, in arrival order
    pub async fn received_keys(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| {
                request
                    .url
                    .query_pairs()
                    .find(|(name, _)| name == "key")
                    .map(|(_, value)| value.into_owned())
            })
            .collect()
    }

    /// JSON bodies of every received request, in arrival order
    pub async fn received_bodies(&self) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                serde_json::from_slice(&request.body).expect("Relay sent a non-JSON body")
            })
            .collect()
    }
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartMock {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentMock {
    pub role: String,
    pub parts: Vec<PartMock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateMock {
    pub content: ContentMock,
    pub finish_reason: String,
    pub index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadataMock {
    pub prompt_token_count: u32,
    pub candidates_token_count: u32,
    pub total_token_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponseMock {
    pub candidates: Vec<CandidateMock>,
    pub usage_metadata: UsageMetadataMock,
    pub model_version: String,
}

impl GenerateContentResponseMock {
    pub fn with_text(text: &str) -> Self {
        Self {
            candidates: vec![CandidateMock {
                content: ContentMock {
                    role: "model".to_string(),
                    parts: vec![PartMock {
                        text: text.to_string(),
                    }],
                },
                finish_reason: "STOP".to_string(),
                index: 0,
            }],
            usage_metadata: UsageMetadataMock {
                prompt_token_count: 7,
                candidates_token_count: 5,
                total_token_count: 12,
            },
            model_version: MOCK_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiErrorMock {
    pub code: u16,
    pub message: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiErrorResponseMock {
    pub error: GeminiErrorMock,
}
