use std::sync::Arc;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::llm::{GoogleProvider, LLMError, LLMProvider};

use super::events::AppEvent;

/// Centralized handle to the backend the panel talks to.
///
/// Created once at startup and passed by reference to the views.
pub struct Services {
    pub llm: Arc<dyn LLMProvider>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Build the Gemini provider from config. The API key is captured here
    /// and never looked up again.
    pub fn init(
        config: &AppConfig,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Result<Self, LLMError> {
        let provider = GoogleProvider::from_config(&config.llm)?;
        if provider.has_usable_key() {
            log::info!("Gemini provider ready (model {})", provider.model());
        } else {
            log::warn!("No Gemini API key configured; replies will explain how to add one");
        }

        Ok(Self::new(Arc::new(provider), event_tx))
    }

    pub fn new(llm: Arc<dyn LLMProvider>, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { llm, event_tx }
    }
}
