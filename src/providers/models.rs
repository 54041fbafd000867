//! Model listing, validation, and ranking over the provider table.
//!
//! Listing prefers the provider's live `/models` endpoint but must stay
//! useful when that endpoint is missing or down: every failure degrades to
//! the static catalog with the trigger carried as a soft warning, because a
//! provider's metadata outage must never block model selection.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::registry;

/// HTTP timeout for the listing endpoint, in seconds.
const LIST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("model {model} not found for provider {provider}")]
    ModelNotFound { model: String, provider: String },
}

/// Reconciled per-model record. Never persisted; recomputed per request
/// from the capability table and, when reachable, the live listing.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub supports_tools: bool,
    /// Tokens; 0 when unknown.
    pub context_window: u32,
    pub description: String,
}

/// Listing result: models plus an optional soft warning describing why the
/// live endpoint was not used. The caller decides whether to log or show it.
#[derive(Debug)]
pub struct ModelListing {
    pub models: Vec<ModelInfo>,
    pub warning: Option<String>,
}

/// OpenAI-compatible `/models` wire shape.
#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    data: Vec<ListedModel>,
}

#[derive(Debug, Deserialize)]
struct ListedModel {
    id: String,
}

/// Per-provider model service.
pub struct ModelService {
    client: reqwest::Client,
    provider: String,
    api_key: String,
    base_url: String,
}

impl ModelService {
    /// An empty `base_url` falls back to the capability table's default.
    pub fn new(provider: &str, api_key: &str, base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(LIST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        let base_url = if base_url.is_empty() {
            registry::get(provider)
                .map(|p| p.base_url.to_string())
                .unwrap_or_default()
        } else {
            base_url.to_string()
        };
        Self {
            client,
            provider: provider.to_string(),
            api_key: api_key.to_string(),
            base_url,
        }
    }

    /// Lists the provider's models, tool-capable first.
    ///
    /// Providers without a listing endpoint get their static catalog with
    /// no network attempt. A failing endpoint degrades to the static
    /// catalog plus a warning instead of an error.
    pub async fn list_models(&self) -> Result<ModelListing, ProviderError> {
        let caps = registry::get(&self.provider)
            .ok_or_else(|| ProviderError::UnknownProvider(self.provider.clone()))?;

        if !caps.supports_model_listing {
            debug!(provider = %self.provider, "provider has no listing endpoint, using static models");
            return Ok(ModelListing {
                models: self.static_models(),
                warning: None,
            });
        }

        match self.fetch_live_models().await {
            Ok(ids) => {
                let mut models: Vec<ModelInfo> =
                    ids.into_iter().map(|id| self.describe_model(&id)).collect();
                rank_tool_models_first(&mut models);
                Ok(ModelListing {
                    models,
                    warning: None,
                })
            }
            Err(e) => {
                warn!(provider = %self.provider, error = %e, "model listing failed, using static models");
                Ok(ModelListing {
                    models: self.static_models(),
                    warning: Some(format!("live model listing failed, using static list: {e}")),
                })
            }
        }
    }

    /// Checks that a model exists and returns its record. When listing is
    /// unavailable the heuristics alone describe the model: a caller who
    /// already knows an id must never be blocked by a listing outage.
    pub async fn validate_model(&self, model_id: &str) -> Result<ModelInfo, ProviderError> {
        let listing = self.list_models().await?;

        if listing.warning.is_some() && !listing.models.iter().any(|m| m.id == model_id) {
            return Ok(ModelInfo {
                id: model_id.to_string(),
                name: model_id.to_string(),
                provider: self.provider.clone(),
                supports_tools: registry::model_supports_tools(&self.provider, model_id),
                context_window: 0,
                description: "Model validation unavailable".to_string(),
            });
        }

        listing
            .models
            .into_iter()
            .find(|m| m.id == model_id)
            .ok_or_else(|| ProviderError::ModelNotFound {
                model: model_id.to_string(),
                provider: self.provider.clone(),
            })
    }

    /// The table's recommended tool-calling model for this provider.
    pub fn best_tool_model(&self) -> Option<&'static str> {
        registry::preferred_tool_model(&self.provider)
    }

    async fn fetch_live_models(&self) -> Result<Vec<String>, String> {
        if self.base_url.is_empty() {
            return Err("no base URL configured".to_string());
        }
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }
        let listed: ListModelsResponse = response
            .json()
            .await
            .map_err(|e| format!("bad response body: {e}"))?;
        Ok(listed.data.into_iter().map(|m| m.id).collect())
    }

    /// Builds a [`ModelInfo`] for a live-listed id, preferring static
    /// catalog metadata (context window, description) when the id is known.
    fn describe_model(&self, id: &str) -> ModelInfo {
        let from_static = self.static_models().into_iter().find(|m| m.id == id);
        let context_window = from_static.as_ref().map(|m| m.context_window).unwrap_or(0);
        let description = from_static
            .map(|m| m.description)
            .unwrap_or_else(|| describe_by_pattern(id));
        ModelInfo {
            id: id.to_string(),
            name: display_name(&self.provider, id),
            provider: self.provider.clone(),
            supports_tools: registry::model_supports_tools(&self.provider, id),
            context_window,
            description,
        }
    }

    /// Hardcoded catalog used when the provider cannot list models or the
    /// listing call fails.
    fn static_models(&self) -> Vec<ModelInfo> {
        let entries: &[(&str, &str, bool, u32, &str)] = match self.provider.as_str() {
            "grok" => &[
                (
                    "grok-4-1-fast",
                    "Grok 4.1 Fast",
                    true,
                    2_000_000,
                    "Best for tool calling (2M context, optimized for agentic tasks)",
                ),
                (
                    "grok-4-1",
                    "Grok 4.1",
                    true,
                    131_072,
                    "High-quality reasoning with tool support",
                ),
                (
                    "grok-beta",
                    "Grok Beta",
                    true,
                    131_072,
                    "Beta version with tool calling",
                ),
                (
                    "grok-4-latest",
                    "Grok 4 Latest",
                    false,
                    131_072,
                    "Latest general model (limited tool support)",
                ),
            ],
            "openai" => &[
                (
                    "gpt-4o-mini",
                    "GPT-4o Mini",
                    true,
                    128_000,
                    "Fast, affordable, smart for everyday tasks",
                ),
                (
                    "gpt-4o",
                    "GPT-4o",
                    true,
                    128_000,
                    "High intelligence flagship model",
                ),
                (
                    "gpt-4-turbo",
                    "GPT-4 Turbo",
                    true,
                    128_000,
                    "Previous flagship with vision and tools",
                ),
                (
                    "gpt-3.5-turbo",
                    "GPT-3.5 Turbo",
                    true,
                    16_385,
                    "Fast and affordable legacy model",
                ),
            ],
            "venice" => &[
                (
                    "venice-uncensored",
                    "Venice Uncensored",
                    false,
                    0,
                    "NSFW uncensored chat (no function calling)",
                ),
                (
                    "llama-3.3-70b",
                    "Llama 3.3 70B",
                    true,
                    0,
                    "Open source model with tool support",
                ),
                (
                    "qwen3-235b",
                    "Qwen 3 235B",
                    true,
                    0,
                    "Large open model with function calling",
                ),
            ],
            "anthropic" => &[
                (
                    "claude-sonnet-4-5-20250929",
                    "Claude Sonnet 4.5",
                    true,
                    200_000,
                    "Latest Sonnet with advanced tool use",
                ),
                (
                    "claude-opus-4-5-20251101",
                    "Claude Opus 4.5",
                    true,
                    200_000,
                    "Most capable Claude model",
                ),
            ],
            "vertex" => &[
                (
                    "gemini-1.5-pro",
                    "Gemini 1.5 Pro",
                    true,
                    2_000_000,
                    "Google's flagship with function calling",
                ),
                (
                    "gemini-1.5-flash",
                    "Gemini 1.5 Flash",
                    true,
                    1_000_000,
                    "Fast and efficient with tools",
                ),
            ],
            "openrouter" => &[
                (
                    "openai/gpt-4o-mini",
                    "GPT-4o Mini (via OpenRouter)",
                    true,
                    0,
                    "OpenAI model via OpenRouter",
                ),
                (
                    "anthropic/claude-sonnet-4-5",
                    "Claude Sonnet 4.5 (via OpenRouter)",
                    true,
                    0,
                    "Claude via OpenRouter",
                ),
            ],
            "digitalocean" => &[(
                "gpt-4o-mini",
                "GPT-4o Mini",
                false,
                0,
                "Agent endpoint (no local skills)",
            )],
            _ => &[],
        };

        entries
            .iter()
            .map(|&(id, name, supports_tools, context_window, description)| ModelInfo {
                id: id.to_string(),
                name: name.to_string(),
                provider: self.provider.clone(),
                supports_tools,
                context_window,
                description: description.to_string(),
            })
            .collect()
    }
}

/// Stable partition: tool-capable models first, original order preserved
/// within each half.
fn rank_tool_models_first(models: &mut [ModelInfo]) {
    models.sort_by_key(|m| !m.supports_tools);
}

/// Human-readable name for a live-listed id: provider prefixes stripped,
/// hyphens spaced, words title-cased.
fn display_name(provider: &str, model_id: &str) -> String {
    let name = model_id
        .strip_prefix(&format!("{provider}/"))
        .or_else(|| model_id.strip_prefix("openai/"))
        .or_else(|| model_id.strip_prefix("anthropic/"))
        .unwrap_or(model_id);

    name.replace('-', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fallback description for ids absent from the static catalogs.
fn describe_by_pattern(model_id: &str) -> String {
    let lower = model_id.to_lowercase();
    let description = if lower.contains("mini") {
        "Fast and affordable"
    } else if lower.contains("turbo") {
        "Optimized for speed"
    } else if lower.contains("fast") {
        "High-speed model"
    } else if lower.contains("opus") {
        "Most capable model"
    } else if lower.contains("sonnet") {
        "Balanced performance"
    } else if lower.contains("uncensored") {
        "Uncensored content"
    } else {
        "Available model"
    };
    description.to_string()
}

/// Plain-text rendering for the CLI: tool-calling models grouped first.
pub fn format_model_list(models: &[ModelInfo]) -> String {
    let mut tool_lines = Vec::new();
    let mut other_lines = Vec::new();

    for model in models {
        let mut line = format!("  {}", model.id);
        if !model.description.is_empty() {
            line.push_str(&format!(" - {}", model.description));
        }
        if model.context_window > 0 {
            line.push_str(&format!(" ({}k context)", model.context_window / 1000));
        }
        if model.supports_tools {
            tool_lines.push(format!("✓ {line}"));
        } else {
            other_lines.push(format!("{line} (no skills)"));
        }
    }

    let mut out = String::new();
    if !tool_lines.is_empty() {
        out.push_str("Function Calling Enabled (Skills Available):\n");
        for line in &tool_lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    if !other_lines.is_empty() {
        if !tool_lines.is_empty() {
            out.push('\n');
        }
        out.push_str("Other Models (Skills Disabled):\n");
        for line in &other_lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
