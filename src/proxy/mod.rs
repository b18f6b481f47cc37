//! Proxy module
//!
//! Handles request forwarding to the upstream generative-content provider.

pub mod dispatcher;
pub mod gemini;
pub mod logging;
pub mod provider;

pub use dispatcher::Dispatcher;
pub use gemini::GeminiClient;
pub use provider::{GenerativeProvider, ProviderFailure};
