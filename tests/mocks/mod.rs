//! Mock infrastructure for testing external services
//!
//! Currently only the Gemini generateContent API is mocked.

pub mod gemini;

pub use gemini::*;
