//! Builtin skill: Twitch live-status check via the Helix API.
//!
//! The streamer comes from the tool call, falling back to the configured
//! default. With neither, the skill answers with a needs-more-information
//! result. The Helix call sends only the configured Client-ID.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::ConfigLoader;
use crate::error::{needs_more_information, SkillError};
use crate::skills::{args, Skill, SkillContext};

const SERVICE: &str = "twitch";

/// HTTP timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    data: Vec<StreamEntry>,
}

#[derive(Debug, Deserialize)]
struct StreamEntry {
    user_login: String,
    game_name: String,
    title: String,
    viewer_count: u64,
    started_at: String,
    language: String,
    thumbnail_url: String,
}

/// Builtin skill checking whether a Twitch streamer is live.
pub struct TwitchLiveSkill {
    client: reqwest::Client,
    config: Arc<dyn ConfigLoader>,
}

impl TwitchLiveSkill {
    pub fn new(config: Arc<dyn ConfigLoader>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }
}

#[async_trait]
impl Skill for TwitchLiveSkill {
    fn name(&self) -> &str {
        "check_twitch_live"
    }

    fn description(&self) -> &str {
        "Check if a Twitch streamer is currently live. Uses the configured \
         default streamer when none is given."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "streamer": {
                    "type": "string",
                    "description": "Twitch streamer username (optional if a default is configured)"
                }
            }
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        // The streamer is resolved before the credential check so a missing
        // override stays a clarifying question, not a configuration failure.
        let config = self.config.twitch_config();
        let configured = config
            .as_ref()
            .ok()
            .and_then(|c| c.default_streamer.clone());
        let streamer = match args::optional_str(a, "streamer") {
            Some(s) => s.to_string(),
            None => match configured {
                Some(s) => s,
                None => {
                    return Ok(needs_more_information(
                        "streamer",
                        "I need a streamer name to check Twitch.",
                        "Ask the user which Twitch streamer to check.",
                    ))
                }
            },
        };
        let client_id = config?.client_id;

        let started = Instant::now();
        let response = self
            .client
            .get("https://api.twitch.tv/helix/streams")
            .query(&[("user_login", streamer.as_str())])
            .header("Client-ID", client_id)
            .send()
            .await
            .map_err(|e| SkillError::transport(SERVICE, started.elapsed(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SkillError::upstream(SERVICE, status, body));
        }

        let streams: StreamsResponse =
            response
                .json()
                .await
                .map_err(|e| SkillError::UnexpectedResponse {
                    service: SERVICE,
                    reason: format!("body is not the Helix streams shape: {e}"),
                })?;

        match streams.data.into_iter().next() {
            Some(stream) => Ok(json!({
                "streamer": streamer,
                "is_live": true,
                "title": stream.title,
                "game": stream.game_name,
                "viewer_count": stream.viewer_count,
                "started_at": stream.started_at,
                "language": stream.language,
                "thumbnail_url": stream.thumbnail_url,
                "stream_url": format!("https://www.twitch.tv/{}", stream.user_login),
            })),
            None => Ok(json!({
                "streamer": streamer,
                "is_live": false,
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
    use crate::error::{is_needs_more_information, ConfigError};

    struct FakeLoader {
        client_id: Option<String>,
        default_streamer: Option<String>,
    }

    impl ConfigLoader for FakeLoader {
        fn tarot_config(&self) -> Result<TarotConfig, ConfigError> {
            Err(ConfigError::missing("tarot", "function_url"))
        }
        fn venice_config(&self) -> Result<VeniceConfig, ConfigError> {
            Err(ConfigError::missing("venice", "api_key"))
        }
        fn weather_config(&self) -> Result<WeatherConfig, ConfigError> {
            Ok(WeatherConfig::default())
        }
        fn twitch_config(&self) -> Result<TwitchConfig, ConfigError> {
            match &self.client_id {
                Some(id) => Ok(TwitchConfig {
                    client_id: id.clone(),
                    default_streamer: self.default_streamer.clone(),
                }),
                None => Err(ConfigError::missing("twitch", "client_id")),
            }
        }
        fn youtube_config(&self) -> Result<YouTubeConfig, ConfigError> {
            Err(ConfigError::missing("youtube", "api_key"))
        }
    }

    fn ctx() -> SkillContext {
        SkillContext::new(std::env::temp_dir())
    }

    #[tokio::test]
    async fn test_no_streamer_and_no_default_asks_for_more() {
        let skill = TwitchLiveSkill::new(Arc::new(FakeLoader {
            client_id: Some("cid".to_string()),
            default_streamer: None,
        }));
        let result = skill.execute(&json!({}), &ctx()).await.unwrap();
        assert!(is_needs_more_information(&result));
        assert_eq!(result["error"], "streamer_required");
    }

    #[tokio::test]
    async fn test_unconfigured_integration_still_asks_before_failing() {
        // Without a streamer there is nothing to look up, so the missing
        // client_id never comes into play.
        let skill = TwitchLiveSkill::new(Arc::new(FakeLoader {
            client_id: None,
            default_streamer: None,
        }));
        let result = skill.execute(&json!({}), &ctx()).await.unwrap();
        assert!(is_needs_more_information(&result));
    }

    #[tokio::test]
    async fn test_streamer_without_client_id_is_configuration_error() {
        let skill = TwitchLiveSkill::new(Arc::new(FakeLoader {
            client_id: None,
            default_streamer: None,
        }));
        let err = skill
            .execute(&json!({"streamer": "somestreamer"}), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.class(), "configuration");
    }
}
