//! Builtin skills backed by Venice.ai: image generation and the NSFW mode
//! toggle.
//!
//! Image responses carry either a hosted URL or inline base64 data; the
//! result is always exactly one of `image_url` or `image_path`, never both.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::ConfigLoader;
use crate::error::SkillError;
use crate::skills::{args, Skill, SkillContext};

const SERVICE: &str = "venice";

/// Image generation is slow; lookup timeouts would abort mid-render.
const IMAGE_TIMEOUT_SECS: u64 = 120;

/// Venice's chat and image models are distinct; the image endpoint always
/// takes this one regardless of the configured chat model.
const IMAGE_MODEL: &str = "fluently-xl";

const IMAGE_WIDTH: u32 = 1024;
const IMAGE_HEIGHT: u32 = 1024;
const IMAGE_STEPS: u32 = 30;

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

// ── generate_image ───────────────────────────────────────

/// Builtin skill generating an image from a text prompt.
pub struct ImageSkill {
    client: reqwest::Client,
    config: Arc<dyn ConfigLoader>,
}

impl ImageSkill {
    pub fn new(config: Arc<dyn ConfigLoader>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(IMAGE_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }
}

#[async_trait]
impl Skill for ImageSkill {
    fn name(&self) -> &str {
        "generate_image"
    }

    fn description(&self) -> &str {
        "Generate an image from a text prompt using Venice.ai."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "prompt": {
                    "type": "string",
                    "description": "Text description of the image to generate"
                },
                "style": {
                    "type": "string",
                    "description": "Optional style modifier (e.g. anime, realistic, painting)"
                }
            },
            "required": ["prompt"]
        })
    }

    async fn execute(&self, a: &Value, context: &SkillContext) -> Result<Value, SkillError> {
        let mut prompt = args::required_str(a, "prompt")?.to_string();
        if let Some(style) = args::optional_str(a, "style") {
            prompt = format!("{prompt}, {style} style");
        }
        let config = self.config.venice_config()?;

        let body = json!({
            "model": IMAGE_MODEL,
            "prompt": prompt,
            "width": IMAGE_WIDTH,
            "height": IMAGE_HEIGHT,
            "steps": IMAGE_STEPS,
        });

        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/images/generations", config.base_url))
            .bearer_auth(&config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SkillError::transport(SERVICE, started.elapsed(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SkillError::upstream(SERVICE, status, body));
        }

        let result: ImageResponse =
            response
                .json()
                .await
                .map_err(|e| SkillError::UnexpectedResponse {
                    service: SERVICE,
                    reason: format!("body is not the images shape: {e}"),
                })?;

        let Some(image) = result.data.into_iter().next() else {
            return Err(SkillError::UnexpectedResponse {
                service: SERVICE,
                reason: "response carried no image data".to_string(),
            });
        };

        if let Some(url) = image.url {
            return Ok(json!({
                "success": true,
                "image_url": url,
                "prompt": prompt,
            }));
        }
        if let Some(b64) = image.b64_json {
            let bytes = BASE64
                .decode(b64.as_bytes())
                .map_err(|e| SkillError::UnexpectedResponse {
                    service: SERVICE,
                    reason: format!("b64_json is not valid base64: {e}"),
                })?;
            let dir = context.data_dir.join("images");
            std::fs::create_dir_all(&dir)?;
            let path = dir.join(format!("image_{}.png", Utc::now().timestamp()));
            std::fs::write(&path, &bytes)?;
            return Ok(json!({
                "success": true,
                "image_path": path.to_string_lossy(),
                "prompt": prompt,
            }));
        }
        Err(SkillError::UnexpectedResponse {
            service: SERVICE,
            reason: "image entry carried neither url nor b64_json".to_string(),
        })
    }
}

// ── nsfw_mode ────────────────────────────────────────────

/// Builtin skill toggling NSFW mode.
///
/// Enabling reports which Venice endpoint and model become active so the
/// host can switch its chat backend; disabling always succeeds. A missing
/// Venice key is a soft setup prompt, not a failure.
pub struct NsfwModeSkill {
    config: Arc<dyn ConfigLoader>,
}

impl NsfwModeSkill {
    pub fn new(config: Arc<dyn ConfigLoader>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Skill for NsfwModeSkill {
    fn name(&self) -> &str {
        "nsfw_mode"
    }

    fn description(&self) -> &str {
        "Enable or disable NSFW mode, which switches chat to the Venice.ai \
         uncensored endpoint."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "enable": {
                    "type": "boolean",
                    "description": "Enable (true) or disable (false) NSFW mode"
                }
            },
            "required": ["enable"]
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        let enable = args::required_bool(a, "enable")?;

        if !enable {
            return Ok(json!({
                "success": true,
                "enabled": false,
                "message": "NSFW mode disabled",
            }));
        }

        match self.config.venice_config() {
            Ok(config) => Ok(json!({
                "success": true,
                "enabled": true,
                "message": "NSFW mode enabled",
                "config": {
                    "base_url": config.base_url,
                    "model": config.model,
                },
            })),
            Err(_) => Ok(json!({
                "success": false,
                "error": "NSFW mode requires a Venice.ai API key",
                "requires_setup": true,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        TarotConfig, TwitchConfig, VeniceConfig, WeatherConfig, YouTubeConfig,
    };
    use crate::error::ConfigError;

    struct FakeLoader {
        venice: Option<VeniceConfig>,
    }

    impl ConfigLoader for FakeLoader {
        fn tarot_config(&self) -> Result<TarotConfig, ConfigError> {
            Err(ConfigError::missing("tarot", "function_url"))
        }
        fn venice_config(&self) -> Result<VeniceConfig, ConfigError> {
            self.venice
                .clone()
                .ok_or_else(|| ConfigError::missing("venice", "api_key"))
        }
        fn weather_config(&self) -> Result<WeatherConfig, ConfigError> {
            Ok(WeatherConfig::default())
        }
        fn twitch_config(&self) -> Result<TwitchConfig, ConfigError> {
            Err(ConfigError::missing("twitch", "client_id"))
        }
        fn youtube_config(&self) -> Result<YouTubeConfig, ConfigError> {
            Err(ConfigError::missing("youtube", "api_key"))
        }
    }

    fn venice_config() -> VeniceConfig {
        VeniceConfig {
            api_key: "vk".to_string(),
            base_url: "https://api.venice.ai/api/v1".to_string(),
            model: "venice-uncensored".to_string(),
            upscaler: "upscaler".to_string(),
        }
    }

    fn ctx() -> SkillContext {
        SkillContext::new(std::env::temp_dir())
    }

    // ── generate_image ───────────────────────────────────

    #[tokio::test]
    async fn test_image_prompt_is_required() {
        let skill = ImageSkill::new(Arc::new(FakeLoader {
            venice: Some(venice_config()),
        }));
        let err = skill.execute(&json!({}), &ctx()).await.unwrap_err();
        assert_eq!(err.class(), "invalid_argument");
    }

    #[tokio::test]
    async fn test_image_without_config_is_configuration_error() {
        let skill = ImageSkill::new(Arc::new(FakeLoader { venice: None }));
        let err = skill
            .execute(&json!({"prompt": "a fox"}), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.class(), "configuration");
    }

    // ── nsfw_mode ────────────────────────────────────────

    #[tokio::test]
    async fn test_enable_requires_boolean() {
        let skill = NsfwModeSkill::new(Arc::new(FakeLoader { venice: None }));
        let err = skill
            .execute(&json!({"enable": "yes"}), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.class(), "invalid_argument");
    }

    #[tokio::test]
    async fn test_enable_without_key_is_soft_setup_prompt() {
        let skill = NsfwModeSkill::new(Arc::new(FakeLoader { venice: None }));
        let result = skill.execute(&json!({"enable": true}), &ctx()).await.unwrap();
        assert_eq!(result["success"], false);
        assert_eq!(result["requires_setup"], true);
    }

    #[tokio::test]
    async fn test_enable_with_key_reports_active_endpoint() {
        let skill = NsfwModeSkill::new(Arc::new(FakeLoader {
            venice: Some(venice_config()),
        }));
        let result = skill.execute(&json!({"enable": true}), &ctx()).await.unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["enabled"], true);
        assert_eq!(result["config"]["model"], "venice-uncensored");
    }

    #[tokio::test]
    async fn test_disable_always_succeeds() {
        let skill = NsfwModeSkill::new(Arc::new(FakeLoader { venice: None }));
        let result = skill
            .execute(&json!({"enable": false}), &ctx())
            .await
            .unwrap();
        assert_eq!(result["success"], true);
        assert_eq!(result["enabled"], false);
    }
}
