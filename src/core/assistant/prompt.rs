//! Prompt framing for the resume assistant persona.

use crate::config::AssistantConfig;

/// Wraps raw user text in the instructional template sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    persona: String,
    focus: String,
    word_limit: u32,
}

impl PromptTemplate {
    pub fn new(persona: impl Into<String>, focus: impl Into<String>, word_limit: u32) -> Self {
        Self {
            persona: persona.into(),
            focus: focus.into(),
            word_limit,
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(
            config.persona.clone(),
            config.focus.clone(),
            config.word_limit,
        )
    }

    /// Interpolates `user_text` verbatim. No escaping is applied.
    pub fn render(&self, user_text: &str) -> String {
        format!(
            "You are {persona}.\n\
             The user is asking: \"{user_text}\"\n\
             \n\
             Please provide a concise, helpful response related to {focus}.\n\
             Keep your response under {limit} words.",
            persona = self.persona,
            focus = self.focus,
            limit = self.word_limit,
        )
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::from_config(&AssistantConfig::default())
    }
}
