//! Error taxonomy for skill dispatch and configuration loading.
//!
//! Hard failures are typed so the host can tell an unknown skill from a bad
//! argument, a missing credential, a network failure, or an upstream
//! rejection without parsing message text. A skill that merely needs the
//! user to supply a value it has no default for does NOT fail: it returns a
//! successful needs-more-information result (see [`needs_more_information`])
//! so the conversation loop can ask a clarifying question instead of
//! aborting the tool call.

use serde_json::{json, Value};
use thiserror::Error;

// ── Configuration errors ─────────────────────────────────

/// A required integration setting is absent from the loaded config.
#[derive(Debug, Clone, Error)]
#[error("{integration} is not configured: {detail}")]
pub struct ConfigError {
    /// Which integration block is incomplete ("tarot", "venice", ...).
    pub integration: &'static str,
    /// What is missing or malformed.
    pub detail: String,
}

impl ConfigError {
    pub fn missing(integration: &'static str, field: &str) -> Self {
        Self {
            integration,
            detail: format!("missing required field '{field}'"),
        }
    }
}

// ── Skill errors ─────────────────────────────────────────

/// Failure classes for skill dispatch.
#[derive(Debug, Error)]
pub enum SkillError {
    /// The dispatched name is not in the registry.
    #[error("unknown skill: {0}")]
    UnknownSkill(String),

    /// An argument is missing, mistyped, or outside its domain.
    #[error("invalid argument '{field}': {reason}")]
    InvalidArgument { field: String, reason: String },

    /// The config loader could not supply required settings.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("{service} request failed after {elapsed_ms}ms: {source}")]
    Transport {
        service: &'static str,
        elapsed_ms: u128,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{service} returned HTTP {status}: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The service answered 2xx but the payload was not the expected shape.
    #[error("unexpected {service} response: {reason}")]
    UnexpectedResponse {
        service: &'static str,
        reason: String,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SkillError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn transport(
        service: &'static str,
        elapsed: std::time::Duration,
        source: reqwest::Error,
    ) -> Self {
        Self::Transport {
            service,
            elapsed_ms: elapsed.as_millis(),
            source,
        }
    }

    pub fn upstream(service: &'static str, status: reqwest::StatusCode, body: String) -> Self {
        Self::Upstream {
            service,
            status: status.as_u16(),
            body,
        }
    }

    /// Stable class label for logs and CLI output.
    pub fn class(&self) -> &'static str {
        match self {
            Self::UnknownSkill(_) => "unknown_skill",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::Configuration(_) => "configuration",
            Self::Transport { .. } => "transport",
            Self::Upstream { .. } => "upstream",
            Self::UnexpectedResponse { .. } => "unexpected_response",
            Self::Io(_) => "io",
            Self::Json(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}

// ── Needs-more-information results ───────────────────────

/// Successful result asking the caller for a value the skill has no default
/// for. Shaped so the model can relay the question directly.
pub fn needs_more_information(field: &str, message: &str, hint: &str) -> Value {
    json!({
        "error": format!("{field}_required"),
        "message": message,
        "hint": hint,
    })
}

/// True when `result` came from [`needs_more_information`].
pub fn is_needs_more_information(result: &Value) -> bool {
    result
        .get("error")
        .and_then(Value::as_str)
        .map(|e| e.ends_with("_required"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Error classes ────────────────────────────────────

    #[test]
    fn test_class_labels() {
        assert_eq!(SkillError::UnknownSkill("x".into()).class(), "unknown_skill");
        assert_eq!(SkillError::invalid("zip", "bad").class(), "invalid_argument");
        assert_eq!(
            SkillError::from(ConfigError::missing("twitch", "client_id")).class(),
            "configuration"
        );
        assert_eq!(
            SkillError::Upstream {
                service: "wttr.in",
                status: 503,
                body: String::new()
            }
            .class(),
            "upstream"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::missing("youtube", "api_key");
        assert_eq!(
            err.to_string(),
            "youtube is not configured: missing required field 'api_key'"
        );
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = SkillError::invalid("zip_code", "must be 5 digits");
        assert_eq!(
            err.to_string(),
            "invalid argument 'zip_code': must be 5 digits"
        );
    }

    // ── Needs-more-information ───────────────────────────

    #[test]
    fn test_needs_more_information_shape() {
        let result = needs_more_information(
            "zip_code",
            "Please provide a zip code",
            "Ask the user for their zip code",
        );
        assert_eq!(result["error"], "zip_code_required");
        assert_eq!(result["message"], "Please provide a zip code");
        assert_eq!(result["hint"], "Ask the user for their zip code");
        assert!(is_needs_more_information(&result));
    }

    #[test]
    fn test_ordinary_results_are_not_flagged() {
        assert!(!is_needs_more_information(&json!({"value": 42})));
        assert!(!is_needs_more_information(&json!({"error": "boom"})));
        assert!(!is_needs_more_information(&json!("zip_code_required")));
    }
}
