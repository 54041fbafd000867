//! Builtin skills: reminder storage and listing.
//!
//! Reminders live in a single `reminders.json` under the data directory.
//! Storage only: nothing here fires the reminders, the host decides how to
//! surface them. Writes rewrite the whole file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::SkillError;
use crate::skills::{args, Skill, SkillContext};

const FILE_NAME: &str = "reminders.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Reminder {
    id: String,
    message: String,
    time: DateTime<Local>,
    created: DateTime<Local>,
}

fn reminders_path(data_dir: &Path) -> PathBuf {
    data_dir.join(FILE_NAME)
}

/// A missing file is an empty collection, not an error.
fn load_reminders(data_dir: &Path) -> Result<Vec<Reminder>, SkillError> {
    let path = reminders_path(data_dir);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let data = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&data)?)
}

fn save_reminders(data_dir: &Path, reminders: &[Reminder]) -> Result<(), SkillError> {
    std::fs::create_dir_all(data_dir)?;
    let data = serde_json::to_string_pretty(reminders)?;
    std::fs::write(reminders_path(data_dir), data)?;
    Ok(())
}

/// Parses "YYYY-MM-DD HH:MM[:SS]" or a bare "HH:MM[:SS]" meaning today.
/// A bare time already in the past rolls forward to tomorrow. Relative
/// phrasings ("in 1 hour") are rejected with a usable format hint.
fn parse_reminder_time(raw: &str, now: DateTime<Local>) -> Result<DateTime<Local>, SkillError> {
    let raw = raw.trim();
    if raw.starts_with("in ") {
        return Err(SkillError::invalid(
            "time",
            "relative times are not supported, use 'YYYY-MM-DD HH:MM' or 'HH:MM'",
        ));
    }

    if let Some((date_part, time_part)) = raw.split_once(' ') {
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|_| SkillError::invalid("time", "expected date as YYYY-MM-DD"))?;
        let time = parse_clock(time_part)?;
        return date
            .and_time(time)
            .and_local_timezone(Local)
            .earliest()
            .ok_or_else(|| {
                SkillError::invalid("time", "this time does not exist in the local timezone")
            });
    }

    let time = parse_clock(raw)?;
    let mut when = now
        .date_naive()
        .and_time(time)
        .and_local_timezone(Local)
        .earliest()
        .ok_or_else(|| {
            SkillError::invalid("time", "this time does not exist in the local timezone")
        })?;
    if when <= now {
        when += Duration::hours(24);
    }
    Ok(when)
}

fn parse_clock(raw: &str) -> Result<NaiveTime, SkillError> {
    let layout = if raw.matches(':').count() == 2 {
        "%H:%M:%S"
    } else {
        "%H:%M"
    };
    NaiveTime::parse_from_str(raw, layout)
        .map_err(|_| SkillError::invalid("time", "expected time as HH:MM or HH:MM:SS"))
}

// ── set_reminder ─────────────────────────────────────────

/// Builtin skill storing a reminder.
pub struct SetReminderSkill;

#[async_trait]
impl Skill for SetReminderSkill {
    fn name(&self) -> &str {
        "set_reminder"
    }

    fn description(&self) -> &str {
        "Set a reminder with a message and a time."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string",
                    "description": "Reminder message"
                },
                "time": {
                    "type": "string",
                    "description": "When to remind: 'YYYY-MM-DD HH:MM' or 'HH:MM' for today"
                }
            },
            "required": ["message", "time"]
        })
    }

    async fn execute(&self, a: &Value, context: &SkillContext) -> Result<Value, SkillError> {
        let message = args::required_str(a, "message")?;
        let raw_time = args::required_str(a, "time")?;
        let now = Local::now();
        let when = parse_reminder_time(raw_time, now)?;

        let mut reminders = load_reminders(&context.data_dir)?;
        let reminder = Reminder {
            id: Uuid::new_v4().to_string(),
            message: message.to_string(),
            time: when,
            created: now,
        };
        reminders.push(reminder.clone());
        save_reminders(&context.data_dir, &reminders)?;

        Ok(json!({
            "success": true,
            "id": reminder.id,
            "message": reminder.message,
            "time": reminder.time.to_rfc3339(),
        }))
    }
}

// ── list_reminders ───────────────────────────────────────

/// Builtin skill listing active (future) reminders.
pub struct ListRemindersSkill;

#[async_trait]
impl Skill for ListRemindersSkill {
    fn name(&self) -> &str {
        "list_reminders"
    }

    fn description(&self) -> &str {
        "List all active reminders."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _a: &Value, context: &SkillContext) -> Result<Value, SkillError> {
        let now = Local::now();
        let active: Vec<Value> = load_reminders(&context.data_dir)?
            .into_iter()
            .filter(|r| r.time > now)
            .map(|r| {
                json!({
                    "id": r.id,
                    "message": r.message,
                    "time": r.time.to_rfc3339(),
                    "created": r.created.to_rfc3339(),
                })
            })
            .collect();

        Ok(json!({
            "count": active.len(),
            "reminders": active,
        }))
    }
}
