//! Argument extraction for skill handlers.
//!
//! Tool-call arguments arrive as loosely typed JSON from the model. These
//! helpers centralize the fail-fast validation every handler performs:
//! required fields error with the field name, optional fields fall back to
//! defaults, and numbers coerce from any JSON number representation
//! (models routinely send `5.0` where a schema says integer).

use serde_json::Value;

use crate::error::SkillError;

/// Required string field. Missing, non-string, or blank is an error.
pub fn required_str<'a>(args: &'a Value, field: &str) -> Result<&'a str, SkillError> {
    match args.get(field).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        Some(_) => Err(SkillError::invalid(field, "must not be empty")),
        None => Err(SkillError::invalid(field, "required string field is missing")),
    }
}

/// Required string field that may be empty (hash and encode inputs, where
/// the empty string is a legitimate value).
pub fn required_text<'a>(args: &'a Value, field: &str) -> Result<&'a str, SkillError> {
    args.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| SkillError::invalid(field, "required string field is missing"))
}

/// Optional string field; `None` when absent, non-string, or blank.
pub fn optional_str<'a>(args: &'a Value, field: &str) -> Option<&'a str> {
    args.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Optional string with a default.
pub fn str_or<'a>(args: &'a Value, field: &str, default: &'a str) -> &'a str {
    optional_str(args, field).unwrap_or(default)
}

/// Required string constrained to an allowed set (mirrors schema enums).
pub fn required_enum<'a>(
    args: &'a Value,
    field: &str,
    allowed: &[&str],
) -> Result<&'a str, SkillError> {
    let value = required_str(args, field)?;
    if allowed.contains(&value) {
        Ok(value)
    } else {
        Err(SkillError::invalid(
            field,
            format!("must be one of: {}", allowed.join(", ")),
        ))
    }
}

/// Optional enum-constrained string with a default. Present-but-invalid
/// values are an error, not a silent fallback.
pub fn enum_or<'a>(
    args: &'a Value,
    field: &str,
    allowed: &[&str],
    default: &'a str,
) -> Result<&'a str, SkillError> {
    match optional_str(args, field) {
        Some(v) if allowed.contains(&v) => Ok(v),
        Some(_) => Err(SkillError::invalid(
            field,
            format!("must be one of: {}", allowed.join(", ")),
        )),
        None => Ok(default),
    }
}

/// Required numeric field.
pub fn required_f64(args: &Value, field: &str) -> Result<f64, SkillError> {
    args.get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| SkillError::invalid(field, "required numeric field is missing"))
}

/// Optional integer with a default, clamped into `[min, max]`.
/// Accepts any JSON number; out-of-range values saturate.
pub fn clamped_u64(args: &Value, field: &str, default: u64, min: u64, max: u64) -> u64 {
    let raw = match args.get(field).and_then(Value::as_f64) {
        Some(v) => v as i64,
        None => default as i64,
    };
    raw.clamp(min as i64, max as i64) as u64
}

/// Optional boolean with a default. Non-boolean values fall back to the
/// default rather than erroring.
pub fn bool_or(args: &Value, field: &str, default: bool) -> bool {
    args.get(field).and_then(Value::as_bool).unwrap_or(default)
}

/// Required boolean field.
pub fn required_bool(args: &Value, field: &str) -> Result<bool, SkillError> {
    args.get(field)
        .and_then(Value::as_bool)
        .ok_or_else(|| SkillError::invalid(field, "required boolean field is missing"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ── Strings ──────────────────────────────────────────

    #[test]
    fn test_required_str_present() {
        let args = json!({"name": "lyra"});
        assert_eq!(required_str(&args, "name").unwrap(), "lyra");
    }

    #[test]
    fn test_required_str_missing() {
        let args = json!({});
        let err = required_str(&args, "name").unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn test_required_str_blank_rejected() {
        let args = json!({"name": "   "});
        assert!(required_str(&args, "name").is_err());
    }

    #[test]
    fn test_required_str_wrong_type() {
        let args = json!({"name": 42});
        assert!(required_str(&args, "name").is_err());
    }

    #[test]
    fn test_required_text_accepts_empty() {
        let args = json!({"text": ""});
        assert_eq!(required_text(&args, "text").unwrap(), "");
        assert!(required_text(&json!({}), "text").is_err());
    }

    #[test]
    fn test_optional_str_blank_is_none() {
        let args = json!({"style": ""});
        assert!(optional_str(&args, "style").is_none());
        assert_eq!(str_or(&args, "style", "anime"), "anime");
    }

    // ── Enums ────────────────────────────────────────────

    #[test]
    fn test_required_enum_accepts_listed_value() {
        let args = json!({"spread_type": "celtic"});
        assert_eq!(
            required_enum(&args, "spread_type", &["three", "celtic"]).unwrap(),
            "celtic"
        );
    }

    #[test]
    fn test_required_enum_rejects_unlisted_value() {
        let args = json!({"spread_type": "five"});
        let err = required_enum(&args, "spread_type", &["three", "celtic"]).unwrap_err();
        assert!(err.to_string().contains("three, celtic"));
    }

    #[test]
    fn test_enum_or_default_and_invalid() {
        let args = json!({});
        assert_eq!(
            enum_or(&args, "format", &["short", "long"], "short").unwrap(),
            "short"
        );
        let args = json!({"format": "medium"});
        assert!(enum_or(&args, "format", &["short", "long"], "short").is_err());
    }

    // ── Numbers and booleans ─────────────────────────────

    #[test]
    fn test_required_f64_accepts_integers() {
        let args = json!({"value": 100});
        assert_eq!(required_f64(&args, "value").unwrap(), 100.0);
    }

    #[test]
    fn test_clamped_u64_coerces_floats() {
        let args = json!({"length": 24.0});
        assert_eq!(clamped_u64(&args, "length", 16, 8, 128), 24);
    }

    #[test]
    fn test_clamped_u64_saturates() {
        assert_eq!(clamped_u64(&json!({"length": 3}), "length", 16, 8, 128), 8);
        assert_eq!(
            clamped_u64(&json!({"length": 4096}), "length", 16, 8, 128),
            128
        );
        assert_eq!(clamped_u64(&json!({"length": -5}), "length", 16, 8, 128), 8);
    }

    #[test]
    fn test_clamped_u64_default_when_missing() {
        assert_eq!(clamped_u64(&json!({}), "days", 1, 1, 3), 1);
    }

    #[test]
    fn test_bool_helpers() {
        let args = json!({"include_numbers": false});
        assert!(!bool_or(&args, "include_numbers", true));
        assert!(bool_or(&args, "include_symbols", true));
        assert!(required_bool(&json!({}), "enable").is_err());
        assert!(required_bool(&json!({"enable": true}), "enable").unwrap());
    }
}
