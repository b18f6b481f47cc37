//! Translation layer between the OpenAI chat completion format and Gemini
//!
//! Requests are shape-checked and reshaped into Gemini `generateContent` bodies;
//! responses are reduced to their first text part and wrapped back into a
//! chat completion.

pub mod gemini;

use thiserror::Error;

/// Errors that can occur while translating an inbound body
#[derive(Debug, Error)]
pub enum TranslationError {
    /// `messages` is absent or not an array
    #[error("Missing or invalid messages array")]
    MissingMessages,

    /// Pass-through body without a `contents` array
    #[error("Missing or invalid contents array")]
    MissingContents,
}

pub use gemini::{
    apply_safety_override, permissive_safety_settings, translate_request, translate_response,
    GenerateContentRequest,
};
