//! Generation failures as the user sees them.

use crate::config::API_KEY_ENV;
use crate::core::llm::LLMError;

/// Marker Google puts in the error details of a rejected key.
pub const INVALID_KEY_MARKER: &str = "API_KEY_INVALID";
/// Substring present in quota / rate exhaustion messages.
pub const QUOTA_MARKER: &str = "quota";

const APOLOGY: &str = "Sorry, I encountered an error.";

/// Why a reply could not be produced. Every variant is recovered into an
/// assistant message; none escapes the session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatFailure {
    #[error("API key not configured")]
    CredentialMissing,
    #[error("API key invalid")]
    CredentialInvalid,
    #[error("API quota exceeded")]
    QuotaExceeded,
    #[error("{0}")]
    Unknown(String),
}

impl ChatFailure {
    /// Classify a provider error. Ordered, first match wins.
    pub fn classify(err: &LLMError) -> Self {
        if let LLMError::NotConfigured(_) = err {
            return Self::CredentialMissing;
        }
        Self::from_message(&err.to_string())
    }

    /// Classify from raw error text.
    pub fn from_message(message: &str) -> Self {
        if message.contains(INVALID_KEY_MARKER) {
            Self::CredentialInvalid
        } else if message.contains(QUOTA_MARKER) {
            Self::QuotaExceeded
        } else {
            Self::Unknown(message.to_string())
        }
    }

    /// Short tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CredentialMissing => "credential_missing",
            Self::CredentialInvalid => "credential_invalid",
            Self::QuotaExceeded => "quota_exceeded",
            Self::Unknown(_) => "unknown",
        }
    }

    /// Text appended to the transcript as the assistant's reply.
    pub fn user_message(&self) -> String {
        match self {
            Self::CredentialMissing => format!(
                "{APOLOGY} Please add your Gemini API key to the config file or the \
                 {API_KEY_ENV} environment variable."
            ),
            Self::CredentialInvalid => format!(
                "{APOLOGY} Your API key appears to be invalid. Please check your Gemini API key."
            ),
            Self::QuotaExceeded => {
                format!("{APOLOGY} API quota exceeded. Please check your Gemini API usage.")
            }
            Self::Unknown(raw) => {
                let raw = if raw.trim().is_empty() {
                    "Unknown error"
                } else {
                    raw.as_str()
                };
                format!("{APOLOGY} Error: {raw}. Please try again.")
            }
        }
    }
}
