//! Builtin skill: timezone conversion.
//!
//! Converts a wall-clock time between IANA timezones. With no explicit
//! time the current moment is converted, so "what time is it in Tokyo"
//! works with nothing but the two zone names.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::{json, Value};

use crate::error::SkillError;
use crate::skills::{args, Skill, SkillContext};

fn parse_zone(field: &str, name: &str) -> Result<Tz, SkillError> {
    name.trim().parse().map_err(|_| {
        SkillError::invalid(
            field,
            format!("unknown timezone '{name}', use an IANA name like 'America/New_York'"),
        )
    })
}

/// Accepts "H:MM", "HH:MM", and "HH:MM:SS".
fn parse_time(raw: &str) -> Result<NaiveTime, SkillError> {
    let mut s = raw.trim().to_string();
    if s.len() == 4 && s.as_bytes().get(1) == Some(&b':') {
        s.insert(0, '0');
    }
    if s.len() == 5 {
        s.push_str(":00");
    }
    NaiveTime::parse_from_str(&s, "%H:%M:%S")
        .map_err(|_| SkillError::invalid("time", "expected HH:MM or HH:MM:SS"))
}

/// Builtin skill converting times between timezones.
pub struct TimezoneSkill;

impl TimezoneSkill {
    fn resolve_source(
        &self,
        a: &Value,
        from_tz: Tz,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Tz>, SkillError> {
        let now_local = now.with_timezone(&from_tz);

        let time = match args::optional_str(a, "time") {
            Some(t) => parse_time(t)?,
            None if args::optional_str(a, "date").is_none() => return Ok(now_local),
            None => NaiveTime::MIN,
        };
        let date = match args::optional_str(a, "date") {
            Some(d) => NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                .map_err(|_| SkillError::invalid("date", "expected YYYY-MM-DD"))?,
            None => now_local.date_naive(),
        };

        // DST gaps make some wall-clock times nonexistent; ambiguous times
        // resolve to the earlier instant.
        from_tz
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .ok_or_else(|| {
                SkillError::invalid("time", "this time does not exist in the source timezone")
            })
    }
}

#[async_trait]
impl Skill for TimezoneSkill {
    fn name(&self) -> &str {
        "convert_timezone"
    }

    fn description(&self) -> &str {
        "Convert a time between timezones. Without an explicit time, converts \
         the current moment."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "from_timezone": {
                    "type": "string",
                    "description": "Source IANA timezone, e.g. 'America/Los_Angeles'"
                },
                "to_timezone": {
                    "type": "string",
                    "description": "Target IANA timezone, e.g. 'Asia/Tokyo'"
                },
                "time": {
                    "type": "string",
                    "description": "Optional wall-clock time HH:MM or HH:MM:SS (default: now)"
                },
                "date": {
                    "type": "string",
                    "description": "Optional date YYYY-MM-DD (default: today in the source zone)"
                }
            },
            "required": ["from_timezone", "to_timezone"]
        })
    }

    async fn execute(&self, a: &Value, _context: &SkillContext) -> Result<Value, SkillError> {
        let from_tz = parse_zone("from_timezone", args::required_str(a, "from_timezone")?)?;
        let to_tz = parse_zone("to_timezone", args::required_str(a, "to_timezone")?)?;

        let source = self.resolve_source(a, from_tz, Utc::now())?;
        let converted = source.with_timezone(&to_tz);

        Ok(json!({
            "original_time": source.format("%Y-%m-%d %H:%M:%S %Z").to_string(),
            "converted_time": converted.format("%Y-%m-%d %H:%M:%S %Z").to_string(),
            "from_timezone": from_tz.name(),
            "to_timezone": to_tz.name(),
            "utc_time": source.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S").to_string(),
            "utc_offset": converted.format("%:z").to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SkillContext {
        SkillContext::new(std::env::temp_dir())
    }

    // ── Fixed conversions ────────────────────────────────

    #[tokio::test]
    async fn test_winter_utc_to_new_york() {
        let skill = TimezoneSkill;
        let result = skill
            .execute(
                &json!({
                    "from_timezone": "UTC",
                    "to_timezone": "America/New_York",
                    "date": "2026-01-15",
                    "time": "12:00"
                }),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result["converted_time"], "2026-01-15 07:00:00 EST");
        assert_eq!(result["utc_offset"], "-05:00");
        assert_eq!(result["from_timezone"], "UTC");
    }

    #[tokio::test]
    async fn test_summer_observes_dst() {
        let skill = TimezoneSkill;
        let result = skill
            .execute(
                &json!({
                    "from_timezone": "UTC",
                    "to_timezone": "America/New_York",
                    "date": "2026-07-01",
                    "time": "12:00"
                }),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result["converted_time"], "2026-07-01 08:00:00 EDT");
        assert_eq!(result["utc_offset"], "-04:00");
    }

    #[tokio::test]
    async fn test_short_time_form_and_seconds() {
        let skill = TimezoneSkill;
        let result = skill
            .execute(
                &json!({
                    "from_timezone": "Asia/Tokyo",
                    "to_timezone": "UTC",
                    "date": "2026-03-03",
                    "time": "9:30"
                }),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result["converted_time"], "2026-03-03 00:30:00 UTC");
    }

    #[tokio::test]
    async fn test_date_only_means_midnight() {
        let skill = TimezoneSkill;
        let result = skill
            .execute(
                &json!({
                    "from_timezone": "UTC",
                    "to_timezone": "UTC",
                    "date": "2026-05-05"
                }),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result["original_time"], "2026-05-05 00:00:00 UTC");
    }

    #[tokio::test]
    async fn test_no_time_converts_now() {
        let skill = TimezoneSkill;
        let result = skill
            .execute(
                &json!({"from_timezone": "UTC", "to_timezone": "Asia/Tokyo"}),
                &ctx(),
            )
            .await
            .unwrap();
        assert_eq!(result["utc_offset"], "+09:00");
        assert!(result["converted_time"].as_str().unwrap().contains("JST"));
    }

    // ── Errors ───────────────────────────────────────────

    #[tokio::test]
    async fn test_unknown_zone_is_invalid_argument() {
        let skill = TimezoneSkill;
        let err = skill
            .execute(
                &json!({"from_timezone": "Mars/Olympus", "to_timezone": "UTC"}),
                &ctx(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.class(), "invalid_argument");
        assert!(err.to_string().contains("Mars/Olympus"));
    }

    #[tokio::test]
    async fn test_bad_time_format() {
        let skill = TimezoneSkill;
        let err = skill
            .execute(
                &json!({
                    "from_timezone": "UTC",
                    "to_timezone": "UTC",
                    "time": "quarter past three"
                }),
                &ctx(),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("HH:MM"));
    }

    #[test]
    fn test_parse_time_variants() {
        assert_eq!(
            parse_time("9:05").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 0).unwrap()
        );
        assert_eq!(
            parse_time("23:59:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        );
        assert!(parse_time("25:00").is_err());
    }
}
