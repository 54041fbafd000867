use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    pub llm: Option<LlmConfig>,
    pub tarot: Option<TarotSection>,
    pub venice: Option<VeniceSection>,
    pub weather: Option<WeatherSection>,
    pub twitch: Option<TwitchSection>,
    pub youtube: Option<YouTubeSection>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory for reminders, notes, and generated files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lyra")
}

/// Provider used by the `models` CLI commands.
#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    pub provider: String,
    #[serde(default)]
    pub model: String,
    /// Supports ${ENV_VAR} substitution
    #[serde(default)]
    pub api_key: String,
    /// Overrides the provider registry base URL when set
    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TarotSection {
    /// Serverless function endpoint for tarot readings
    pub function_url: Option<String>,
    /// Supports ${ENV_VAR} substitution
    pub auth_token: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VeniceSection {
    /// Supports ${ENV_VAR} substitution
    pub api_key: Option<String>,
    #[serde(default = "default_venice_base_url")]
    pub base_url: String,
    #[serde(default = "default_venice_model")]
    pub model: String,
    #[serde(default = "default_venice_upscaler")]
    pub upscaler: String,
}

fn default_venice_base_url() -> String {
    "https://api.venice.ai/api/v1".to_string()
}

fn default_venice_model() -> String {
    "venice-uncensored".to_string()
}

fn default_venice_upscaler() -> String {
    "upscaler".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct WeatherSection {
    pub default_zip_code: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TwitchSection {
    /// Supports ${ENV_VAR} substitution
    pub client_id: Option<String>,
    pub default_streamer: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct YouTubeSection {
    /// Supports ${ENV_VAR} substitution
    pub api_key: Option<String>,
    pub default_channel: Option<String>,
}

// ── Resolved integration settings ────────────────────────

#[derive(Debug, Clone)]
pub struct TarotConfig {
    pub function_url: String,
    pub auth_token: String,
}

#[derive(Debug, Clone)]
pub struct VeniceConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub upscaler: String,
}

#[derive(Debug, Clone, Default)]
pub struct WeatherConfig {
    pub default_zip_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TwitchConfig {
    pub client_id: String,
    pub default_streamer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct YouTubeConfig {
    pub api_key: String,
    pub default_channel: Option<String>,
}

/// Integration settings consumed by skills.
///
/// Skills receive an `Arc<dyn ConfigLoader>` at construction and never read
/// global state, so handler tests can inject fakes.
pub trait ConfigLoader: Send + Sync {
    fn tarot_config(&self) -> Result<TarotConfig, ConfigError>;
    fn venice_config(&self) -> Result<VeniceConfig, ConfigError>;
    fn weather_config(&self) -> Result<WeatherConfig, ConfigError>;
    fn twitch_config(&self) -> Result<TwitchConfig, ConfigError>;
    fn youtube_config(&self) -> Result<YouTubeConfig, ConfigError>;
}

fn require(
    integration: &'static str,
    field: &'static str,
    value: Option<&str>,
) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::missing(integration, field)),
    }
}

fn require_http_url(integration: &'static str, field: &str, raw: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(raw).map_err(|e| ConfigError {
        integration,
        detail: format!("{field} is not a valid URL: {e}"),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError {
            integration,
            detail: format!("{field} must be http(s), got {}", parsed.scheme()),
        });
    }
    Ok(())
}

impl ConfigLoader for Config {
    fn tarot_config(&self) -> Result<TarotConfig, ConfigError> {
        let section = self
            .tarot
            .as_ref()
            .ok_or_else(|| ConfigError::missing("tarot", "function_url"))?;
        let function_url = require("tarot", "function_url", section.function_url.as_deref())?;
        require_http_url("tarot", "function_url", &function_url)?;
        let auth_token = require("tarot", "auth_token", section.auth_token.as_deref())?;
        Ok(TarotConfig {
            function_url,
            auth_token,
        })
    }

    fn venice_config(&self) -> Result<VeniceConfig, ConfigError> {
        let section = self
            .venice
            .as_ref()
            .ok_or_else(|| ConfigError::missing("venice", "api_key"))?;
        let api_key = require("venice", "api_key", section.api_key.as_deref())?;
        require_http_url("venice", "base_url", &section.base_url)?;
        Ok(VeniceConfig {
            api_key,
            base_url: section.base_url.clone(),
            model: section.model.clone(),
            upscaler: section.upscaler.clone(),
        })
    }

    fn weather_config(&self) -> Result<WeatherConfig, ConfigError> {
        // No required fields: an empty section just means no default zip.
        let section = self.weather.clone().unwrap_or_default();
        Ok(WeatherConfig {
            default_zip_code: section.default_zip_code.filter(|z| !z.trim().is_empty()),
        })
    }

    fn twitch_config(&self) -> Result<TwitchConfig, ConfigError> {
        let section = self
            .twitch
            .as_ref()
            .ok_or_else(|| ConfigError::missing("twitch", "client_id"))?;
        let client_id = require("twitch", "client_id", section.client_id.as_deref())?;
        Ok(TwitchConfig {
            client_id,
            default_streamer: section
                .default_streamer
                .clone()
                .filter(|s| !s.trim().is_empty()),
        })
    }

    fn youtube_config(&self) -> Result<YouTubeConfig, ConfigError> {
        let section = self
            .youtube
            .as_ref()
            .ok_or_else(|| ConfigError::missing("youtube", "api_key"))?;
        let api_key = require("youtube", "api_key", section.api_key.as_deref())?;
        Ok(YouTubeConfig {
            api_key,
            default_channel: section
                .default_channel
                .clone()
                .filter(|c| !c.trim().is_empty()),
        })
    }
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        // Expand environment variables like ${VENICE_API_KEY}
        let expanded = shellexpand::env(&content)?;
        let config: Config = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Missing file is not an error: skills that need no credentials still
    /// work against a default config.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if std::path::Path::new(path).exists() {
            Self::load(path)
        } else {
            info!("no config file at {path}, using defaults");
            Ok(Self::default())
        }
    }
}
