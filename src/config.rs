//! Settings for the summary service.
//!
//! Values come from an optional YAML file; anything the file leaves out takes
//! the default below. The API key is deliberately not part of the file and
//! is supplied through `--api-key` / `OPENAI_API_KEY`.
//!
//! ```yaml
//! base_url: https://api.openai.com/v1
//! model: gpt-4o-mini
//! max_tokens: 500
//! temperature: 0.7
//! summary_length: 200
//! timeout_secs: 60
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use tracing::info;

/// Connection and sampling settings for the chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmSettings {
    /// API root; `chat/completions` is appended to it.
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Target summary length in characters.
    pub summary_length: usize,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 500,
            temperature: 0.7,
            summary_length: crate::summarizer::DEFAULT_SUMMARY_LENGTH,
            timeout_secs: 60,
        }
    }
}

impl LlmSettings {
    /// Load settings from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let settings = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        info!(path, model = %settings.model, "Loaded configuration");
        Ok(settings)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }
}
