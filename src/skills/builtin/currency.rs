//! Builtin skill: currency conversion via exchangerate-api.com.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::SkillError;
use crate::skills::{args, Skill, SkillContext};

const SERVICE: &str = "exchangerate-api.com";

/// HTTP timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
    #[serde(default)]
    date: String,
}

/// Builtin skill converting amounts between currencies at the latest rate.
pub struct CurrencySkill {
    client: reqwest::Client,
}

impl CurrencySkill {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

fn normalize_code(field: &str, raw: &str) -> Result<String, SkillError> {
    let code = raw.trim().to_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(SkillError::invalid(
            field,
            format!("'{raw}' is not a 3-letter currency code"),
        ))
    }
}

#[async_trait]
impl Skill for CurrencySkill {
    fn name(&self) -> &str {
        "convert_currency"
    }

    fn description(&self) -> &str {
        "Convert an amount between currencies using the latest exchange rate."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "amount": {
                    "type": "number",
                    "description": "Amount to convert"
                },
                "from_currency": {
                    "type": "string",
                    "description": "3-letter source currency code, e.g. 'USD'"
                },
                "to_currency": {
                    "type": "string",
                    "description": "3-letter target currency code, e.g. 'EUR'"
                }
            },
            "required": ["amount", "from_currency", "to_currency"]
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        let amount = args::required_f64(a, "amount")?;
        let from = normalize_code("from_currency", args::required_str(a, "from_currency")?)?;
        let to = normalize_code("to_currency", args::required_str(a, "to_currency")?)?;

        // Identical currencies need no rate lookup.
        if from == to {
            return Ok(json!({
                "amount": amount,
                "from_currency": from,
                "to_currency": to,
                "converted": amount,
                "rate": 1.0,
            }));
        }

        let url = format!("https://api.exchangerate-api.com/v6/latest/{from}");
        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SkillError::transport(SERVICE, started.elapsed(), e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SkillError::upstream(SERVICE, status, body));
        }

        let rates: RatesResponse =
            response
                .json()
                .await
                .map_err(|e| SkillError::UnexpectedResponse {
                    service: SERVICE,
                    reason: format!("body is not the expected rates shape: {e}"),
                })?;

        let rate = rates.rates.get(&to).copied().ok_or_else(|| {
            SkillError::invalid(
                "to_currency",
                format!("currency '{to}' not found in exchange rates"),
            )
        })?;

        Ok(json!({
            "amount": amount,
            "from_currency": from,
            "to_currency": to,
            "converted": amount * rate,
            "rate": rate,
            "date": rates.date,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SkillContext {
        SkillContext::new(std::env::temp_dir())
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("from_currency", "usd").unwrap(), "USD");
        assert_eq!(normalize_code("from_currency", " eur ").unwrap(), "EUR");
        assert!(normalize_code("from_currency", "dollars").is_err());
        assert!(normalize_code("from_currency", "U1D").is_err());
        assert!(normalize_code("from_currency", "").is_err());
    }

    #[tokio::test]
    async fn test_same_currency_short_circuits() {
        // No network is involved when source and target match.
        let result = CurrencySkill::new()
            .execute(
                &json!({"amount": 250.0, "from_currency": "usd", "to_currency": "USD"}),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result["converted"], 250.0);
        assert_eq!(result["rate"], 1.0);
        assert_eq!(result["from_currency"], "USD");
        assert_eq!(result["to_currency"], "USD");
    }

    #[tokio::test]
    async fn test_invalid_code_fails_fast() {
        let err = CurrencySkill::new()
            .execute(
                &json!({"amount": 1, "from_currency": "money", "to_currency": "EUR"}),
                &ctx(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.class(), "invalid_argument");
    }

    #[tokio::test]
    async fn test_missing_amount_fails_fast() {
        let err = CurrencySkill::new()
            .execute(
                &json!({"from_currency": "USD", "to_currency": "EUR"}),
                &ctx(),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'amount'"));
    }

    #[test]
    fn test_rates_response_parses() {
        let parsed: RatesResponse = serde_json::from_str(
            r#"{"rates": {"EUR": 0.92, "GBP": 0.79}, "base": "USD", "date": "2026-08-20"}"#,
        )
        .unwrap();
        assert_eq!(parsed.rates.get("EUR"), Some(&0.92));
        assert_eq!(parsed.date, "2026-08-20");
    }
}
