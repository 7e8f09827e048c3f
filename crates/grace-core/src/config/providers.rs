use serde::{Deserialize, Serialize};

use super::defaults::*;

/// Provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfig {
    #[serde(default)]
    pub gemini: GeminiConfig,
}

/// Google Gemini settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key. Empty = not configured; `GEMINI_API_KEY` / `API_KEY` override it.
    #[serde(default)]
    pub api_key: String,
    /// Model for the persona reply.
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Model for the safety classifier.
    #[serde(default = "default_gemini_model")]
    pub classifier_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_gemini_model(),
            classifier_model: default_gemini_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            base_url: default_gemini_base_url(),
        }
    }
}

impl GeminiConfig {
    /// Whether an API key is present.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
