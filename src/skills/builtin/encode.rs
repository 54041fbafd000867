//! Builtin skills: digests and base64.

use async_trait::async_trait;
use base64::Engine;
use md5::Md5;
use serde_json::{json, Value};
use sha2::{Digest, Sha256, Sha512};

use crate::error::SkillError;
use crate::skills::{args, Skill, SkillContext};

const B64: base64::engine::GeneralPurpose = base64::engine::general_purpose::STANDARD;

// ── generate_hash ────────────────────────────────────────

/// Builtin skill computing hex digests of text.
pub struct HashSkill;

#[async_trait]
impl Skill for HashSkill {
    fn name(&self) -> &str {
        "generate_hash"
    }

    fn description(&self) -> &str {
        "Compute the MD5, SHA-256, or SHA-512 digest of a text string, hex encoded."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Text to hash"
                },
                "algorithm": {
                    "type": "string",
                    "enum": ["md5", "sha256", "sha512"],
                    "description": "Digest algorithm"
                }
            },
            "required": ["text", "algorithm"]
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        let text = args::required_text(a, "text")?;
        let algorithm = args::required_str(a, "algorithm")?.to_lowercase();

        let digest = match algorithm.as_str() {
            "md5" => hex::encode(Md5::digest(text.as_bytes())),
            "sha256" => hex::encode(Sha256::digest(text.as_bytes())),
            "sha512" => hex::encode(Sha512::digest(text.as_bytes())),
            other => {
                return Err(SkillError::invalid(
                    "algorithm",
                    format!("unsupported algorithm '{other}', use md5, sha256, or sha512"),
                ))
            }
        };

        Ok(json!({
            "algorithm": algorithm,
            "hash": digest,
        }))
    }
}

// ── base64_encode / base64_decode ────────────────────────

/// Builtin skill encoding text as standard base64.
pub struct Base64EncodeSkill;

#[async_trait]
impl Skill for Base64EncodeSkill {
    fn name(&self) -> &str {
        "base64_encode"
    }

    fn description(&self) -> &str {
        "Encode a text string as base64."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Text to encode"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        let text = args::required_text(a, "text")?;
        Ok(json!({"encoded": B64.encode(text.as_bytes())}))
    }
}

/// Builtin skill decoding standard base64 back into text.
pub struct Base64DecodeSkill;

#[async_trait]
impl Skill for Base64DecodeSkill {
    fn name(&self) -> &str {
        "base64_decode"
    }

    fn description(&self) -> &str {
        "Decode a base64 string back into text."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Base64 string to decode"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        let text = args::required_text(a, "text")?;
        let bytes = B64
            .decode(text.trim())
            .map_err(|e| SkillError::invalid("text", format!("not valid base64: {e}")))?;
        let decoded = String::from_utf8(bytes)
            .map_err(|_| SkillError::invalid("text", "decoded bytes are not valid UTF-8"))?;
        Ok(json!({"decoded": decoded}))
    }
}
