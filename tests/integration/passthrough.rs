//! Pass-through mode integration tests
//!
//! The client sends a Gemini body; only `safetySettings` is replaced and the
//! provider response comes back untouched.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{constants::GEMINI_ROUTE, test_data, TestHarness};
use crate::mocks::gemini::GenerateContentResponseMock;

async fn passthrough_harness(keys: &[&str]) -> TestHarness {
    TestHarness::with_vars(keys, &[("RELAY_MODE", "passthrough")]).await
}

#[tokio::test]
async fn test_passthrough_returns_provider_body() {
    let harness = passthrough_harness(&["key-1"]).await;
    harness.gemini.mock_success("key-1", "raw answer").await;

    let response = harness
        .server
        .post(GEMINI_ROUTE)
        .json(&test_data::valid_gemini_request())
        .await;

    response.assert_status_ok();
    let expected =
        serde_json::to_value(GenerateContentResponseMock::with_text("raw answer")).unwrap();
    assert_eq!(response.json::<Value>(), expected);
}

#[tokio::test]
async fn test_passthrough_overrides_only_safety_settings() {
    let harness = passthrough_harness(&["key-1"]).await;
    harness.gemini.mock_success("key-1", "ok").await;

    let mut request = test_data::valid_gemini_request();
    request["safetySettings"] = json!([
        {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_ONLY_HIGH"}
    ]);
    request["systemInstruction"] = json!({"parts": [{"text": "Be brief."}]});

    harness
        .server
        .post(GEMINI_ROUTE)
        .json(&request)
        .await
        .assert_status_ok();

    let bodies = harness.gemini.received_bodies().await;
    assert_eq!(bodies.len(), 1);
    let sent = &bodies[0];
    assert_eq!(sent["contents"], request["contents"]);
    assert_eq!(sent["generationConfig"], request["generationConfig"]);
    assert_eq!(sent["systemInstruction"], request["systemInstruction"]);

    let safety = sent["safetySettings"].as_array().unwrap();
    assert_eq!(safety.len(), 5);
    assert!(safety.iter().all(|s| s["threshold"] == "BLOCK_NONE"));
}

#[tokio::test]
async fn test_passthrough_falls_back_on_quota() {
    let harness = passthrough_harness(&["key-1", "key-2"]).await;
    harness.gemini.mock_quota_exceeded("key-1").await;
    harness.gemini.mock_success("key-2", "second key").await;

    let response = harness
        .server
        .post(GEMINI_ROUTE)
        .json(&test_data::valid_gemini_request())
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["candidates"][0]["content"]["parts"][0]["text"], "second key");
    assert_eq!(harness.gemini.received_keys().await, vec!["key-1", "key-2"]);
}

#[tokio::test]
async fn test_passthrough_relays_provider_error_status() {
    let harness = passthrough_harness(&["key-1"]).await;
    harness
        .gemini
        .mock_error(
            "key-1",
            403,
            "PERMISSION_DENIED",
            "API key not valid. Please pass a valid API key.",
        )
        .await;

    let response = harness
        .server
        .post(GEMINI_ROUTE)
        .json(&test_data::valid_gemini_request())
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let json: Value = response.json();
    assert_eq!(json["error"]["status"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn test_passthrough_rejects_body_without_contents() {
    let harness = passthrough_harness(&["key-1"]).await;

    let response = harness
        .server
        .post(GEMINI_ROUTE)
        .json(&test_data::valid_chat_request())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>(),
        json!({"error": "Missing or invalid contents array"})
    );
    assert!(harness.gemini.received_keys().await.is_empty());
}
