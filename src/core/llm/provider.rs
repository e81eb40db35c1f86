//! LLM Provider Trait

use async_trait::async_trait;

use super::error::Result;
use super::types::{ChatRequest, ChatResponse};

/// An opaque request/response text generation service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Get the provider's unique identifier
    fn id(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;

    /// Send a completion request and wait for the full reply
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;
}
