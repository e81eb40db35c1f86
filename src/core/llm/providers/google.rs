//! Google Provider Implementation (API Key-based)
//!
//! Talks to the Generative Language API `generateContent` endpoint.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use crate::config::{LlmConfig, API_KEY_ENV};
use crate::core::llm::error::{LLMError, Result};
use crate::core::llm::provider::LLMProvider;
use crate::core::llm::types::{ChatRequest, ChatResponse, MessageRole};

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Value shipped in sample env files; treated the same as no key.
pub const PLACEHOLDER_API_KEY: &str = "your_gemini_api_key_here";

/// Google provider (API key-based)
pub struct GoogleProvider {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: Client,
}

impl GoogleProvider {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        // Trim at construction so usability checks and headers agree
        Ok(Self {
            api_key: api_key.map(|k| k.trim().to_string()),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        Self::new(
            config.api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Whether a key is present, non-blank and not the sample placeholder.
    ///
    /// This is a local check only; validity is decided by the API.
    pub fn is_usable_api_key(key: Option<&str>) -> bool {
        match key.map(str::trim) {
            Some(k) => !k.is_empty() && k != PLACEHOLDER_API_KEY,
            None => false,
        }
    }

    pub fn has_usable_key(&self) -> bool {
        Self::is_usable_api_key(self.api_key.as_deref())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_body(&self, request: &ChatRequest) -> serde_json::Value {
        let contents: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|msg| {
                let role = match msg.role() {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "model",
                };
                serde_json::json!({
                    "role": role,
                    "parts": [{ "text": msg.content() }]
                })
            })
            .collect();

        serde_json::json!({ "contents": contents })
    }
}

#[async_trait]
impl LLMProvider for GoogleProvider {
    fn id(&self) -> &str {
        "google"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let api_key = match self.api_key.as_deref() {
            Some(key) if self.has_usable_key() => key,
            _ => return Err(LLMError::NotConfigured(API_KEY_ENV.to_string())),
        };

        let body = self.build_body(&request);

        let start = Instant::now();
        let resp = self
            .client
            .post(self.endpoint())
            .header("content-type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let latency = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LLMError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let json: serde_json::Value = resp.json().await?;
        let candidate = json["candidates"].as_array().and_then(|arr| arr.first());

        let content = candidate
            .and_then(|c| c["content"]["parts"].as_array())
            .map(|parts| {
                parts
                    .iter()
                    .filter_map(|p| p["text"].as_str())
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| LLMError::InvalidResponse("Missing content".to_string()))?;

        log::debug!(
            "Gemini {} replied in {latency}ms ({} chars)",
            self.model,
            content.len()
        );

        Ok(ChatResponse {
            content,
            model: self.model.clone(),
            provider: "google".to_string(),
            finish_reason: candidate
                .and_then(|c| c["finishReason"].as_str())
                .map(|s| s.to_string()),
            latency_ms: latency,
        })
    }
}
