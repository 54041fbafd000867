//! Builtin skill: recent videos from a YouTube channel (Data API v3).
//!
//! Channel handles that are not already canonical channel IDs are resolved
//! through a best-effort channel search first; resolution failures are
//! ignored and the raw handle is used as-is.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::ConfigLoader;
use crate::error::{needs_more_information, SkillError};
use crate::skills::{args, Skill, SkillContext};

const SERVICE: &str = "youtube";
const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// HTTP timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Video count bounds accepted by the Data API.
const MIN_RESULTS: u64 = 1;
const MAX_RESULTS: u64 = 50;
const DEFAULT_RESULTS: u64 = 5;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchId {
    #[serde(rename = "videoId", default)]
    video_id: String,
    #[serde(rename = "channelId", default)]
    channel_id: String,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "publishedAt", default)]
    published_at: String,
    #[serde(default)]
    thumbnails: Thumbnails,
    #[serde(rename = "channelTitle", default)]
    channel_title: String,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    #[serde(default)]
    default: Thumbnail,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnail {
    #[serde(default)]
    url: String,
}

/// True for canonical channel IDs, which skip handle resolution.
fn is_channel_id(channel: &str) -> bool {
    channel.len() == 24 && channel.starts_with("UC")
}

/// Builtin skill listing a channel's most recent uploads.
pub struct YouTubeVideosSkill {
    client: reqwest::Client,
    config: Arc<dyn ConfigLoader>,
}

impl YouTubeVideosSkill {
    pub fn new(config: Arc<dyn ConfigLoader>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }

    /// Resolves a channel handle to a channel ID. Best effort: any failure
    /// returns the handle unchanged and the video search decides.
    async fn resolve_channel_id(&self, channel: &str, api_key: &str) -> String {
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("q", channel),
                ("type", "channel"),
                ("maxResults", "1"),
                ("key", api_key),
            ])
            .send()
            .await;

        let Ok(response) = response else {
            debug!(channel, "channel id resolution failed, using handle as-is");
            return channel.to_string();
        };
        if !response.status().is_success() {
            debug!(channel, status = %response.status(), "channel id resolution rejected");
            return channel.to_string();
        }
        match response.json::<SearchResponse>().await {
            Ok(result) => match result.items.into_iter().next() {
                Some(item) if !item.id.channel_id.is_empty() => item.id.channel_id,
                _ => channel.to_string(),
            },
            Err(_) => channel.to_string(),
        }
    }
}

#[async_trait]
impl Skill for YouTubeVideosSkill {
    fn name(&self) -> &str {
        "get_youtube_videos"
    }

    fn description(&self) -> &str {
        "Get recent videos from a YouTube channel. Uses the configured \
         default channel when none is given."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "channel": {
                    "type": "string",
                    "description": "Channel username or channel ID (optional if a default is configured)"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Number of videos to return, 1-50 (default 5)"
                }
            }
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        let config = self.config.youtube_config();
        let configured = config.as_ref().ok().and_then(|c| c.default_channel.clone());
        let channel = match args::optional_str(a, "channel") {
            Some(c) => c.to_string(),
            None => match configured {
                Some(c) => c,
                None => {
                    return Ok(needs_more_information(
                        "channel",
                        "I need a channel name to look up YouTube videos.",
                        "Ask the user which YouTube channel to check.",
                    ))
                }
            },
        };
        let api_key = config?.api_key;

        let max_results =
            args::clamped_u64(a, "max_results", DEFAULT_RESULTS, MIN_RESULTS, MAX_RESULTS);

        let channel_id = if is_channel_id(&channel) {
            channel.clone()
        } else {
            self.resolve_channel_id(&channel, &api_key).await
        };

        let started = Instant::now();
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("channelId", channel_id.as_str()),
                ("order", "date"),
                ("type", "video"),
                ("maxResults", &max_results.to_string()),
                ("key", api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SkillError::transport(SERVICE, started.elapsed(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SkillError::upstream(SERVICE, status, body));
        }

        let result: SearchResponse =
            response
                .json()
                .await
                .map_err(|e| SkillError::UnexpectedResponse {
                    service: SERVICE,
                    reason: format!("body is not the search shape: {e}"),
                })?;

        let videos: Vec<Value> = result
            .items
            .into_iter()
            .filter(|item| !item.id.video_id.is_empty())
            .map(|item| {
                let snippet = item.snippet.unwrap_or(Snippet {
                    title: String::new(),
                    description: String::new(),
                    published_at: String::new(),
                    thumbnails: Thumbnails::default(),
                    channel_title: String::new(),
                });
                json!({
                    "video_id": item.id.video_id,
                    "title": snippet.title,
                    "description": snippet.description,
                    "published_at": snippet.published_at,
                    "thumbnail_url": snippet.thumbnails.default.url,
                    "channel_title": snippet.channel_title,
                    "url": format!("https://www.youtube.com/watch?v={}", item.id.video_id),
                })
            })
            .collect();

        Ok(json!({
            "channel": channel,
            "channel_id": channel_id,
            "video_count": videos.len(),
            "videos": videos,
        }))
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
        api_key: Option<String>,
        default_channel: Option<String>,
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
            Err(ConfigError::missing("twitch", "client_id"))
        }
        fn youtube_config(&self) -> Result<YouTubeConfig, ConfigError> {
            match &self.api_key {
                Some(key) => Ok(YouTubeConfig {
                    api_key: key.clone(),
                    default_channel: self.default_channel.clone(),
                }),
                None => Err(ConfigError::missing("youtube", "api_key")),
            }
        }
    }

    fn ctx() -> SkillContext {
        SkillContext::new(std::env::temp_dir())
    }

    #[test]
    fn test_channel_id_detection() {
        assert!(is_channel_id("UCabcdefghijklmnopqrstuv"));
        assert!(!is_channel_id("somecreator"));
        assert!(!is_channel_id("UCshort"));
        // Right length, wrong prefix.
        assert!(!is_channel_id("XXabcdefghijklmnopqrstuv"));
    }

    #[tokio::test]
    async fn test_no_channel_and_no_default_asks_for_more() {
        let skill = YouTubeVideosSkill::new(Arc::new(FakeLoader {
            api_key: Some("yt-key".to_string()),
            default_channel: None,
        }));
        let result = skill.execute(&json!({}), &ctx()).await.unwrap();
        assert!(is_needs_more_information(&result));
        assert_eq!(result["error"], "channel_required");
    }

    #[tokio::test]
    async fn test_channel_without_api_key_is_configuration_error() {
        let skill = YouTubeVideosSkill::new(Arc::new(FakeLoader {
            api_key: None,
            default_channel: None,
        }));
        let err = skill
            .execute(&json!({"channel": "somecreator"}), &ctx())
            .await
            .unwrap_err();
        assert_eq!(err.class(), "configuration");
    }
}
