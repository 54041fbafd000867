//! Builtin skill: tarot readings via a configured serverless function.
//!
//! The endpoint and token are deployment-specific, so both are required
//! configuration. The token is sent as an Authorization header, prefixed
//! with "Basic " when the configured value does not already carry it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use crate::config::ConfigLoader;
use crate::error::SkillError;
use crate::skills::{args, Skill, SkillContext};

const SERVICE: &str = "tarot";

/// Generation latency runs well past lookup timeouts.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const SPREADS: &[&str] = &["three", "celtic"];

fn authorization_header(token: &str) -> String {
    if token.starts_with("Basic ") {
        token.to_string()
    } else {
        format!("Basic {token}")
    }
}

/// Builtin skill drawing a tarot spread from the configured function.
pub struct TarotSkill {
    client: reqwest::Client,
    config: Arc<dyn ConfigLoader>,
}

impl TarotSkill {
    pub fn new(config: Arc<dyn ConfigLoader>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }
}

#[async_trait]
impl Skill for TarotSkill {
    fn name(&self) -> &str {
        "tarot_reading"
    }

    fn description(&self) -> &str {
        "Generate a tarot card reading using either a three-card spread \
         (past/present/future) or a ten-card celtic cross spread."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "spread_type": {
                    "type": "string",
                    "enum": SPREADS,
                    "description": "'three' for a 3-card past/present/future spread, 'celtic' for a 10-card celtic cross"
                },
                "question": {
                    "type": "string",
                    "description": "Optional question to focus the reading on"
                }
            },
            "required": ["spread_type"]
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        let spread_type = args::required_enum(a, "spread_type", SPREADS)?;
        let config = self.config.tarot_config()?;

        let mut body = Map::new();
        body.insert("spread_type".to_string(), json!(spread_type));
        if let Some(question) = args::optional_str(a, "question") {
            body.insert("question".to_string(), json!(question));
        }

        let started = Instant::now();
        let response = self
            .client
            .post(&config.function_url)
            .header("Authorization", authorization_header(&config.auth_token))
            .json(&Value::Object(body))
            .send()
            .await
            .map_err(|e| SkillError::transport(SERVICE, started.elapsed(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SkillError::upstream(SERVICE, status, body));
        }

        let reading: Value = response
            .json()
            .await
            .map_err(|e| SkillError::UnexpectedResponse {
                service: SERVICE,
                reason: format!("body is not JSON: {e}"),
            })?;
        Ok(reading)
    }
}
