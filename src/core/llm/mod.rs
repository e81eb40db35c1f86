//! Generation capability: provider trait, request/response types, and the
//! Gemini HTTP provider.

pub mod error;
pub mod provider;
pub mod providers;
pub mod types;

pub use error::{LLMError, Result};
pub use provider::LLMProvider;
pub use providers::GoogleProvider;
pub use types::{ChatMessage, ChatRequest, ChatResponse, MessageRole};
