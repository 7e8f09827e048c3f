mod defaults;
mod prompts;
mod providers;

#[cfg(test)]
mod tests;

pub use prompts::*;
pub use providers::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::GraceError;
use defaults::*;

/// Environment variables checked, in order, for the Gemini API key.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Top-level Grace configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub grace: GraceConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub beta: BetaConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraceConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GraceConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Profile storage config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Private beta gating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetaConfig {
    /// Accepted access codes.
    #[serde(default = "default_beta_codes")]
    pub codes: Vec<String>,
    /// How long a profile may chat after joining.
    #[serde(default = "default_beta_duration_days")]
    pub duration_days: i64,
}

impl Default for BetaConfig {
    fn default() -> Self {
        Self {
            codes: default_beta_codes(),
            duration_days: default_beta_duration_days(),
        }
    }
}

impl BetaConfig {
    /// Whether `code` is one of the accepted access codes (surrounding whitespace ignored).
    pub fn accepts(&self, code: &str) -> bool {
        let code = code.trim();
        !code.is_empty() && self.codes.iter().any(|c| c == code)
    }

    /// The beta window as a duration.
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::days(self.duration_days.max(0))
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Fill the API key from the first non-empty variable `lookup` returns.
/// An environment key wins over the file.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for var in API_KEY_ENV_VARS {
        if let Some(key) = lookup(var).filter(|k| !k.trim().is_empty()) {
            config.provider.gemini.api_key = key.trim().to_string();
            return;
        }
    }
}

/// Load configuration from a TOML file, then apply environment overrides.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, GraceError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GraceError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str::<Config>(&content)
            .map_err(|e| GraceError::Config(format!("failed to parse config: {}", e)))?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok());
    Ok(config)
}
