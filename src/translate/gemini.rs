//! Gemini translator implementation
//!
//! Gemini only knows the `user` and `model` roles, nests generation
//! parameters under `generationConfig`, and reports text under
//! `candidates[].content.parts[]`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use super::TranslationError;
use crate::types::{
    ChatCompletionChoice, ChatCompletionResponse, ChatMessage, GenerationParameters,
    ResponseMessage, Role, Usage, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P,
};

/// Gemini content role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    User,
    Model,
}

impl From<Role> for ContentRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Assistant => ContentRole::Model,
            _ => ContentRole::User,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: ContentRole,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_CIVIC_INTEGRITY")]
    CivicIntegrity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmBlockThreshold {
    #[serde(rename = "BLOCK_NONE")]
    BlockNone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

const PERMISSIVE_SAFETY_SETTINGS: [SafetySetting; 5] = [
    SafetySetting {
        category: HarmCategory::HateSpeech,
        threshold: HarmBlockThreshold::BlockNone,
    },
    SafetySetting {
        category: HarmCategory::SexuallyExplicit,
        threshold: HarmBlockThreshold::BlockNone,
    },
    SafetySetting {
        category: HarmCategory::DangerousContent,
        threshold: HarmBlockThreshold::BlockNone,
    },
    SafetySetting {
        category: HarmCategory::Harassment,
        threshold: HarmBlockThreshold::BlockNone,
    },
    SafetySetting {
        category: HarmCategory::CivicIntegrity,
        threshold: HarmBlockThreshold::BlockNone,
    },
];

/// The fixed safety policy attached to every outbound request
pub fn permissive_safety_settings() -> Vec<SafetySetting> {
    PERMISSIVE_SAFETY_SETTINGS.to_vec()
}

/// Gemini `generateContent` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

/// Parse and translate an inbound chat completion body
///
/// Only the shape is checked: `messages` must be an array. Entries that are
/// not objects become empty user turns, and missing or mistyped parameters
/// take their defaults.
pub fn translate_request(body: &Value) -> Result<GenerateContentRequest, TranslationError> {
    let messages = body
        .get("messages")
        .and_then(Value::as_array)
        .ok_or(TranslationError::MissingMessages)?;

    let messages = messages
        .iter()
        .map(|message| ChatMessage::deserialize(message).unwrap_or_default())
        .collect::<Vec<_>>();

    let params = GenerationParameters::deserialize(body).unwrap_or_default();

    let contents = messages
        .into_iter()
        .map(|message| Content {
            role: message.role.into(),
            parts: vec![Part {
                text: message.content.as_text(),
            }],
        })
        .collect();

    Ok(GenerateContentRequest {
        contents,
        generation_config: GenerationConfig {
            temperature: params.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            top_p: params.top_p.unwrap_or(DEFAULT_TOP_P),
            max_output_tokens: params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        },
        safety_settings: permissive_safety_settings(),
    })
}

/// Overwrite `safetySettings` on a Gemini body supplied by the client
///
/// The body must be an object with a `contents` array; everything else is
/// forwarded untouched.
pub fn apply_safety_override(mut body: Value) -> Result<Value, TranslationError> {
    let object = body
        .as_object_mut()
        .filter(|object| object.get("contents").is_some_and(Value::is_array))
        .ok_or(TranslationError::MissingContents)?;

    object.insert("safetySettings".to_string(), json!(PERMISSIVE_SAFETY_SETTINGS));

    Ok(body)
}

/// Map a Gemini finish reason to its chat completion equivalent
pub fn translate_finish_reason(reason: Option<&str>) -> &'static str {
    match reason {
        Some("MAX_TOKENS") => "length",
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT")
        | Some("SPII") => "content_filter",
        _ => "stop",
    }
}

/// Wrap a Gemini response into a chat completion
///
/// Missing fields never fail: absent text becomes an empty string.
pub fn translate_response(response: &Value, model: &str) -> ChatCompletionResponse {
    let candidate = response.pointer("/candidates/0");
    let text = candidate
        .and_then(|c| c.pointer("/content/parts/0/text"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    let finish_reason = translate_finish_reason(
        candidate
            .and_then(|c| c.get("finishReason"))
            .and_then(Value::as_str),
    );

    ChatCompletionResponse {
        id: format!("chatcmpl-{}", Uuid::new_v4().simple()),
        object: "chat.completion".to_string(),
        created: chrono::Utc::now().timestamp(),
        model: model.to_string(),
        choices: vec![ChatCompletionChoice {
            index: 0,
            message: ResponseMessage {
                role: "assistant".to_string(),
                content: text.to_string(),
            },
            finish_reason: finish_reason.to_string(),
        }],
        usage: Usage::default(),
    }
}
