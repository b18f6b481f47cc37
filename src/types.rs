//! OpenAI-compatible chat completion types
//!
//! The vendor-neutral shape accepted from clients and returned in normalized
//! mode.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_TOP_P: f64 = 0.95;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Chat message role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    /// Any role this proxy has no special handling for (tool, function,
    /// missing, not a string)
    #[default]
    #[serde(other)]
    Other,
}

/// One part of a multi-part message content
///
/// A part without `type` counts as text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub part_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentPart {
    fn is_text(&self) -> bool {
        matches!(self.part_type.as_deref(), None | Some("text"))
    }
}

/// Message content: a plain string or a list of typed parts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl MessageContent {
    /// Flatten to plain text; non-text parts are dropped
    pub fn as_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter(|part| part.is_text())
                .filter_map(|part| part.text.as_deref())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<Value> for MessageContent {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => MessageContent::default(),
            Value::String(text) => MessageContent::Text(text),
            Value::Array(items) => {
                MessageContent::Parts(items.into_iter().filter_map(content_part).collect())
            }
            other => MessageContent::Text(other.to_string()),
        }
    }
}

fn content_part(item: Value) -> Option<ContentPart> {
    match item {
        Value::String(text) => Some(ContentPart {
            part_type: None,
            text: Some(text),
        }),
        Value::Object(part) => Some(ContentPart {
            part_type: part.get("type").and_then(Value::as_str).map(str::to_string),
            text: part.get("text").and_then(Value::as_str).map(str::to_string),
        }),
        _ => None,
    }
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    let role = match Value::deserialize(deserializer)? {
        Value::String(role) => match role.as_str() {
            "system" => Role::System,
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other,
        },
        _ => Role::Other,
    };
    Ok(role)
}

fn lenient_content<'de, D>(deserializer: D) -> Result<MessageContent, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(MessageContent::from)
}

/// Chat message
///
/// Deserialization accepts any object: a missing or unrecognized `role` is
/// `Role::Other`, and content of any JSON type is flattened to text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Role,
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: MessageContent,
}

/// Generation parameters of a chat completion request
///
/// Other request fields (`model`, `stream`, ...) are accepted and ignored. A
/// parameter of the wrong JSON type reads as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationParameters {
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub temperature: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub top_p: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_tokens: Option<u32>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| value.as_f64())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer)
        .map(|value| value.as_u64().and_then(|count| u32::try_from(count).ok()))
}

/// Usage statistics
///
/// Always zero: Gemini token counts are not carried over.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Assistant message in a response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub role: String,
    pub content: String,
}

/// Chat completion choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChoice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: String,
}

/// Chat completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    pub usage: Usage,
}
