//! Builtin skill: QR code generation.
//!
//! Renders to SVG and writes the file under the data directory, returning
//! the path so the host can attach or display it.

use async_trait::async_trait;
use chrono::Utc;
use qrcode::render::svg;
use qrcode::QrCode;
use serde_json::{json, Value};

use crate::error::SkillError;
use crate::skills::{args, Skill, SkillContext};

/// Rendered size bounds in pixels; requests outside are clamped.
const MIN_SIZE: u64 = 64;
const MAX_SIZE: u64 = 1024;
const DEFAULT_SIZE: u64 = 256;

/// Builtin skill encoding text into a QR code image.
pub struct QrCodeSkill;

#[async_trait]
impl Skill for QrCodeSkill {
    fn name(&self) -> &str {
        "generate_qr_code"
    }

    fn description(&self) -> &str {
        "Generate a QR code image (SVG) for a text string or URL and return \
         the saved file path."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "Text or URL to encode"
                },
                "size": {
                    "type": "integer",
                    "description": "Minimum image dimension in pixels, 64-1024 (default 256)"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, a: &Value, context: &SkillContext) -> Result<Value, SkillError> {
        let text = args::required_str(a, "text")?;
        let size = args::clamped_u64(a, "size", DEFAULT_SIZE, MIN_SIZE, MAX_SIZE) as u32;

        let code = QrCode::new(text.as_bytes())
            .map_err(|e| SkillError::invalid("text", format!("cannot encode as QR code: {e}")))?;
        let image = code
            .render()
            .min_dimensions(size, size)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build();

        let dir = context.data_dir.join("qr_codes");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("qr_{}.svg", Utc::now().timestamp_millis()));
        std::fs::write(&path, &image)?;

        Ok(json!({
            "success": true,
            "file_path": path.to_string_lossy(),
            "size": size,
            "format": "svg",
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_svg_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = SkillContext::new(dir.path());
        let result = QrCodeSkill
            .execute(&json!({"text": "https://example.com"}), &ctx)
            .await
            .unwrap();

        let path = std::path::PathBuf::from(result["file_path"].as_str().unwrap());
        assert!(path.starts_with(dir.path().join("qr_codes")));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("svg"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<?xml"));
        assert!(content.contains("<svg"));
    }

    #[tokio::test]
    async fn test_size_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = SkillContext::new(dir.path());
        let result = QrCodeSkill
            .execute(&json!({"text": "x", "size": 9999}), &ctx)
            .await
            .unwrap();
        assert_eq!(result["size"], 1024);

        let result = QrCodeSkill
            .execute(&json!({"text": "x", "size": 1}), &ctx)
            .await
            .unwrap();
        assert_eq!(result["size"], 64);
    }

    #[tokio::test]
    async fn test_text_is_required() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = SkillContext::new(dir.path());
        let err = QrCodeSkill.execute(&json!({}), &ctx).await.unwrap_err();
        assert_eq!(err.class(), "invalid_argument");
    }
}
