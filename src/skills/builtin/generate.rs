//! Builtin skills: UUID and password generation.

use async_trait::async_trait;
use rand::Rng;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::SkillError;
use crate::skills::{args, Skill, SkillContext};

const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMBERS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Password length bounds; requests outside are clamped, not rejected.
const MIN_LENGTH: u64 = 8;
const MAX_LENGTH: u64 = 128;
const DEFAULT_LENGTH: u64 = 16;

// ── generate_uuid ────────────────────────────────────────

/// Builtin skill producing a random v4 UUID.
pub struct UuidSkill;

#[async_trait]
impl Skill for UuidSkill {
    fn name(&self) -> &str {
        "generate_uuid"
    }

    fn description(&self) -> &str {
        "Generate a random v4 UUID."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        Ok(json!({"uuid": Uuid::new_v4().to_string()}))
    }
}

// ── generate_password ────────────────────────────────────

/// Builtin skill generating random passwords.
pub struct PasswordSkill;

#[async_trait]
impl Skill for PasswordSkill {
    fn name(&self) -> &str {
        "generate_password"
    }

    fn description(&self) -> &str {
        "Generate a random password. Letters are always included; numbers and \
         symbols can be toggled."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "length": {
                    "type": "integer",
                    "description": "Password length, clamped between 8 and 128 (default 16)"
                },
                "include_numbers": {
                    "type": "boolean",
                    "description": "Include digits (default true)"
                },
                "include_symbols": {
                    "type": "boolean",
                    "description": "Include punctuation symbols (default true)"
                }
            }
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        let length = args::clamped_u64(a, "length", DEFAULT_LENGTH, MIN_LENGTH, MAX_LENGTH) as usize;
        let include_numbers = args::bool_or(a, "include_numbers", true);
        let include_symbols = args::bool_or(a, "include_symbols", true);

        let mut charset = String::with_capacity(90);
        charset.push_str(LOWERCASE);
        charset.push_str(UPPERCASE);
        if include_numbers {
            charset.push_str(NUMBERS);
        }
        if include_symbols {
            charset.push_str(SYMBOLS);
        }

        let bytes = charset.as_bytes();
        let mut rng = rand::thread_rng();
        let password: String = (0..length)
            .map(|_| bytes[rng.gen_range(0..bytes.len())] as char)
            .collect();

        Ok(json!({
            "password": password,
            "length": length,
        }))
    }
}
