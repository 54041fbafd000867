//! Static provider capability table.
//!
//! Tool support is not something providers report uniformly, so this table
//! and the per-provider model rules in [`model_supports_tools`] are the
//! explicit, auditable source of truth. New providers get new entries and
//! new rules; nothing here is inferred.

use serde::Serialize;

/// What a provider supports, per deployment-independent metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderCapabilities {
    /// Stable lookup key ("openai", "grok", ...).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Default API base URL; empty when the deployment must supply one.
    pub base_url: &'static str,
    pub supports_function_calling: bool,
    /// Whether the provider exposes a live model-listing endpoint.
    pub supports_model_listing: bool,
    pub default_model: &'static str,
    /// Best model for tool calling; empty when unsupported.
    pub preferred_tool_model: &'static str,
    pub requires_api_key: bool,
    pub openai_compatible: bool,
    /// Free-text operational notes, surfaced in the CLI.
    pub notes: &'static str,
}

/// All supported providers, ordered tested-first.
pub static PROVIDERS: &[ProviderCapabilities] = &[
    ProviderCapabilities {
        id: "openai",
        name: "OpenAI",
        base_url: "https://api.openai.com/v1",
        supports_function_calling: true,
        supports_model_listing: true,
        default_model: "gpt-4o-mini",
        preferred_tool_model: "gpt-4o-mini",
        requires_api_key: true,
        openai_compatible: true,
        notes: "Native function calling support. Gold standard implementation.",
    },
    ProviderCapabilities {
        id: "grok",
        name: "xAI Grok",
        base_url: "https://api.x.ai/v1",
        supports_function_calling: true,
        supports_model_listing: true,
        default_model: "grok-4-1-fast",
        preferred_tool_model: "grok-4-1-fast",
        requires_api_key: true,
        openai_compatible: true,
        notes: "Use grok-4-1-fast for best tool calling performance. 2M context window.",
    },
    ProviderCapabilities {
        id: "venice",
        name: "Venice.ai",
        base_url: "https://api.venice.ai/api/v1",
        // The default uncensored model cannot call tools at all.
        supports_function_calling: false,
        supports_model_listing: true,
        default_model: "venice-uncensored",
        preferred_tool_model: "",
        requires_api_key: true,
        openai_compatible: true,
        notes: "NSFW mode uses Venice. No function calling in uncensored mode. \
                Image generation available.",
    },
    ProviderCapabilities {
        id: "anthropic",
        name: "Anthropic Claude",
        base_url: "https://api.anthropic.com/v1",
        supports_function_calling: true,
        supports_model_listing: false,
        default_model: "claude-sonnet-4-5-20250929",
        preferred_tool_model: "claude-sonnet-4-5-20250929",
        requires_api_key: true,
        openai_compatible: false,
        notes: "Advanced tool use features. OpenAI SDK compatibility is for testing \
                only. Native API recommended.",
    },
    ProviderCapabilities {
        id: "vertex",
        name: "Google Vertex AI (Gemini)",
        // Requires a project-specific URL.
        base_url: "",
        supports_function_calling: true,
        supports_model_listing: false,
        default_model: "gemini-1.5-pro",
        preferred_tool_model: "gemini-1.5-pro",
        requires_api_key: false,
        openai_compatible: true,
        notes: "Requires Google Cloud credentials. OpenAI-compatible endpoint available.",
    },
    ProviderCapabilities {
        id: "openrouter",
        name: "OpenRouter",
        base_url: "https://openrouter.ai/api/v1",
        supports_function_calling: true,
        supports_model_listing: true,
        default_model: "openai/gpt-4o-mini",
        preferred_tool_model: "openai/gpt-4o-mini",
        requires_api_key: true,
        openai_compatible: true,
        notes: "Aggregator for multiple providers. Full OpenAI compatibility. \
                Parallel function calling supported.",
    },
    ProviderCapabilities {
        id: "digitalocean",
        name: "DigitalOcean Gradient",
        // Agent-specific URL.
        base_url: "",
        supports_function_calling: false,
        supports_model_listing: false,
        default_model: "gpt-4o-mini",
        preferred_tool_model: "",
        requires_api_key: true,
        openai_compatible: true,
        notes: "Agent API requires cloud functions, not local execution. Skills unavailable.",
    },
    ProviderCapabilities {
        id: "elevenlabs",
        name: "ElevenLabs",
        base_url: "https://api.elevenlabs.io/v1",
        supports_function_calling: false,
        supports_model_listing: false,
        default_model: "",
        preferred_tool_model: "",
        requires_api_key: true,
        openai_compatible: false,
        notes: "Voice AI provider. Function calling support unknown.",
    },
];

/// Sentinel returned by [`detect`] when no rule matches.
pub const UNKNOWN_PROVIDER: &str = "unknown";

/// Looks up a provider by id.
pub fn get(id: &str) -> Option<&'static ProviderCapabilities> {
    PROVIDERS.iter().find(|p| p.id == id)
}

pub fn all() -> &'static [ProviderCapabilities] {
    PROVIDERS
}

/// Provider ids in table order.
pub fn ids() -> Vec<&'static str> {
    PROVIDERS.iter().map(|p| p.id).collect()
}

/// Providers whose models can call tools at all.
pub fn tool_calling_ids() -> Vec<&'static str> {
    PROVIDERS
        .iter()
        .filter(|p| p.supports_function_calling)
        .map(|p| p.id)
        .collect()
}

/// Maps a base URL back to a provider id: exact match against the table
/// first, then vendor-domain substrings. Unmatched URLs return the
/// [`UNKNOWN_PROVIDER`] sentinel rather than a guess.
pub fn detect(base_url: &str) -> &'static str {
    if let Some(provider) = PROVIDERS
        .iter()
        .find(|p| !p.base_url.is_empty() && p.base_url == base_url)
    {
        return provider.id;
    }

    let url = base_url.to_lowercase();
    if url.contains("openai.com") {
        "openai"
    } else if url.contains("x.ai") {
        "grok"
    } else if url.contains("venice.ai") {
        "venice"
    } else if url.contains("anthropic.com") {
        "anthropic"
    } else if url.contains("googleapis.com") || url.contains("vertexai") {
        "vertex"
    } else if url.contains("openrouter.ai") {
        "openrouter"
    } else if url.contains("digitalocean") {
        "digitalocean"
    } else if url.contains("elevenlabs.io") {
        "elevenlabs"
    } else {
        UNKNOWN_PROVIDER
    }
}

/// Whether a specific model of a provider can call tools.
///
/// Substring heuristics, kept per-provider on purpose: a wrong generic
/// guess silently disables or wrongly enables tool calling. Unknown
/// providers never claim support.
pub fn model_supports_tools(provider_id: &str, model_id: &str) -> bool {
    match provider_id {
        // All gpt-4* and gpt-3.5-turbo* variants.
        "openai" => model_id.contains("gpt-4") || model_id.contains("gpt-3.5-turbo"),
        // Generation 4 and the beta line; older families do not qualify.
        "grok" => model_id.contains("grok-4") || model_id.contains("grok-beta"),
        // The uncensored variant is excluded regardless of family.
        "venice" => !model_id.contains("uncensored"),
        "anthropic" => {
            model_id.contains("claude-3")
                || model_id.contains("claude-4")
                || model_id.contains("claude-sonnet")
        }
        "vertex" => model_id.contains("gemini"),
        // OpenRouter prefixes models with their origin provider.
        "openrouter" => {
            model_id.contains("gpt-")
                || model_id.contains("claude-")
                || model_id.contains("gemini-")
        }
        _ => false,
    }
}

/// The table's recommended tool-calling model, when the provider has one.
pub fn preferred_tool_model(provider_id: &str) -> Option<&'static str> {
    get(provider_id)
        .map(|p| p.preferred_tool_model)
        .filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Table invariants ─────────────────────────────────

    #[test]
    fn test_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for provider in PROVIDERS {
            assert!(seen.insert(provider.id), "duplicate id {}", provider.id);
        }
    }

    #[test]
    fn test_no_tool_model_without_function_calling() {
        for provider in PROVIDERS {
            if !provider.supports_function_calling {
                assert!(
                    provider.preferred_tool_model.is_empty(),
                    "{} cannot call tools but prefers {}",
                    provider.id,
                    provider.preferred_tool_model
                );
            }
        }
    }

    #[test]
    fn test_preferred_tool_models_pass_their_own_heuristic() {
        for provider in PROVIDERS {
            if !provider.preferred_tool_model.is_empty() {
                assert!(
                    model_supports_tools(provider.id, provider.preferred_tool_model),
                    "{} prefers a model its own rules reject",
                    provider.id
                );
            }
        }
    }

    #[test]
    fn test_lookup_and_filters() {
        assert_eq!(get("openai").unwrap().name, "OpenAI");
        assert!(get("mistral").is_none());
        assert_eq!(ids().len(), 8);

        let tool_ids = tool_calling_ids();
        assert!(tool_ids.contains(&"grok"));
        assert!(!tool_ids.contains(&"venice"));
        assert!(!tool_ids.contains(&"elevenlabs"));
    }

    // ── URL detection ────────────────────────────────────

    #[test]
    fn test_detect_exact_base_url() {
        assert_eq!(detect("https://api.x.ai/v1"), "grok");
        assert_eq!(detect("https://api.venice.ai/api/v1"), "venice");
    }

    #[test]
    fn test_detect_substring_fallback() {
        assert_eq!(detect("https://proxy.openai.com/custom"), "openai");
        assert_eq!(detect("https://us-east1.googleapis.com/project"), "vertex");
        assert_eq!(detect("https://agent-abc123.ondigitalocean.app"), "digitalocean");
    }

    #[test]
    fn test_detect_unknown_sentinel() {
        assert_eq!(detect("https://llm.internal.corp/v1"), UNKNOWN_PROVIDER);
        assert_eq!(detect(""), UNKNOWN_PROVIDER);
    }

    // ── Tool-support heuristics ──────────────────────────

    #[test]
    fn test_openai_rules() {
        assert!(model_supports_tools("openai", "gpt-4o-mini"));
        assert!(model_supports_tools("openai", "gpt-3.5-turbo"));
        assert!(!model_supports_tools("openai", "davinci-002"));
    }

    #[test]
    fn test_grok_generation_gate() {
        assert!(model_supports_tools("grok", "grok-4-1-fast"));
        assert!(model_supports_tools("grok", "grok-beta"));
        assert!(!model_supports_tools("grok", "grok-2-1212"));
    }

    #[test]
    fn test_venice_uncensored_always_excluded() {
        assert!(!model_supports_tools("venice", "venice-uncensored"));
        assert!(model_supports_tools("venice", "llama-3.3-70b"));
    }

    #[test]
    fn test_unknown_provider_never_supports_tools() {
        assert!(!model_supports_tools("unknown", "gpt-4o"));
        assert!(!model_supports_tools("elevenlabs", "eleven_turbo_v2"));
    }

    #[test]
    fn test_preferred_tool_model_empty_is_none() {
        assert_eq!(preferred_tool_model("grok"), Some("grok-4-1-fast"));
        assert_eq!(preferred_tool_model("venice"), None);
        assert_eq!(preferred_tool_model("nope"), None);
    }
}
