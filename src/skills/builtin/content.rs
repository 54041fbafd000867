//! Builtin skill: platform content drafting.
//!
//! Pure prompt assembly: the skill shapes a drafting prompt for the host's
//! own model to complete. No network, no config.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::SkillError;
use crate::skills::{args, Skill, SkillContext};

const PLATFORMS: &[&str] = &["twitter", "tiktok", "youtube", "discord"];
const FORMATS: &[&str] = &["short", "long", "general"];

const DEFAULT_FORMAT: &str = "short";
const DEFAULT_TONE: &str = "teasing";

/// Builtin skill assembling a content-drafting prompt.
pub struct ContentSkill;

#[async_trait]
impl Skill for ContentSkill {
    fn name(&self) -> &str {
        "generate_content"
    }

    fn description(&self) -> &str {
        "Draft content for a platform (Twitter, TikTok, YouTube, Discord) \
         with a chosen format and tone."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "platform": {
                    "type": "string",
                    "enum": PLATFORMS,
                    "description": "Target platform for the content"
                },
                "topic": {
                    "type": "string",
                    "description": "Topic or subject for the content"
                },
                "format": {
                    "type": "string",
                    "enum": FORMATS,
                    "description": "Content length: short (280 chars), long (5000 chars), general (flexible)"
                },
                "tone": {
                    "type": "string",
                    "description": "Tone or style (e.g. teasing, cute, dramatic, funny)"
                }
            },
            "required": ["platform", "topic"]
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        let platform = args::required_enum(a, "platform", PLATFORMS)?;
        let topic = args::required_str(a, "topic")?;
        let format = args::enum_or(a, "format", FORMATS, DEFAULT_FORMAT)?;
        let tone = args::str_or(a, "tone", DEFAULT_TONE);

        let prompt = format!(
            "Generate {platform} content for {platform}.\n\
             Topic: {topic}\n\
             Tone: {tone}\n\
             Format: {format} length"
        );

        Ok(json!({
            "success": true,
            "prompt": prompt,
            "platform": platform,
            "format": format,
            "tone": tone,
            "topic": topic,
            "message": "Content parameters configured. Ready for generation.",
        }))
    }
}
