use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::llm::providers::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Environment variable that overrides `llm.api_key`.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub llm: LlmConfig,
    pub assistant: AssistantConfig,
    pub data: DataConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Enable mouse wheel scrolling of the transcript.
    pub mouse_enabled: bool,
}

/// Generation service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Gemini API key. `GEMINI_API_KEY` wins over this when set.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Transport timeout for a single generation call.
    pub timeout_secs: u64,
}

/// Persona and prompt framing for the assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub persona: String,
    pub focus: String,
    pub word_limit: u32,
    pub welcome: String,
}

/// Data directory configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory (logs live here).
    pub data_dir: Option<PathBuf>,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 50,
            mouse_enabled: false,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 300,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            persona: "a helpful assistant for a resume builder application".to_string(),
            focus: "resume building, job applications, or career advice".to_string(),
            word_limit: 150,
            welcome: "Hi! I'm your resume building assistant. How can I help you today?"
                .to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/resume-assistant/config.toml`,
    /// then apply environment overrides.
    ///
    /// Runs before logging is up, so nothing is logged here. A file that
    /// exists but cannot be read or parsed falls back to defaults and the
    /// error is handed back for the caller to report.
    pub fn load() -> (Self, Option<ConfigError>) {
        Self::load_from(&Self::config_path(), |name| std::env::var(name).ok())
    }

    pub fn load_from(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> (Self, Option<ConfigError>) {
        let (mut config, error) = match Self::from_file(path) {
            Ok(config) => (config, None),
            Err(ConfigError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                (Self::default(), None)
            }
            Err(e) => (Self::default(), Some(e)),
        };
        config.apply_env(lookup);
        (config, error)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay environment values. `lookup` is injected so tests never
    /// touch the process environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.llm.api_key = Some(key);
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("resume-assistant"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("resume-assistant").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
