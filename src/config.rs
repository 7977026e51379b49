//! Layered configuration.
//!
//! Sources, lowest priority first:
//! 1. compiled-in defaults
//! 2. `~/.exhibit/config.toml` (or the path passed with `--config`)
//! 3. `EXHIBIT_<SECTION>__<KEY>` environment variables

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::brain::provider::gemini;
use crate::brain::tools::github;

pub const ENV_PREFIX: &str = "EXHIBIT";

/// Environment variables consulted for the Gemini key when none is configured.
pub const API_KEY_ENV_FALLBACKS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_GENERATIVE_AI_API_KEY"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to write config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("Config file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub provider: ProviderConfig,
    pub github: GithubConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub enabled: bool,
    pub bind: String,
    pub port: u16,
    /// Echo the request id on internal errors instead of answering `id: null`.
    pub echo_id_on_internal_error: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind: "127.0.0.1".to_string(),
            port: 4111,
            echo_id_on_internal_error: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: gemini::DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: gemini::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ProviderConfig {
    /// The configured API key, falling back to the well-known env variables.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_FALLBACKS
                    .iter()
                    .find_map(|name| std::env::var(name).ok())
                    .filter(|k| !k.trim().is_empty())
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_base: String,
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: github::DEFAULT_API_BASE.to_string(),
            user_agent: format!("exhibit/{}", crate::VERSION),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` overrides it.
    pub level: String,
    pub json: bool,
    /// Directory for daily-rolling log files. Stderr only when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            dir: None,
        }
    }
}

/// `~/.exhibit/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".exhibit")
        .join("config.toml")
}

impl AppConfig {
    /// Load from the default file location and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path, true, None),
            None => Self::load_from(&default_config_path(), false, None),
        }
    }

    /// Load from `path`, overlaying environment variables.
    ///
    /// `env` replaces the process environment as the variable source when set.
    pub fn load_from(
        path: &Path,
        required: bool,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(required))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        tracing::debug!("Loaded configuration (file: {})", path.display());
        Ok(config)
    }

    /// Write the defaults as TOML to `path`.
    pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let rendered = toml::to_string_pretty(&AppConfig::default())?;
        std::fs::write(path, rendered)?;
        Ok(())
    }
}
