//! Builtin skills: note storage, retrieval, and listing.
//!
//! Notes live in a single `notes.json` keyed by title. A BTreeMap keeps both
//! the on-disk file and listings in title order. Saving an existing title
//! overwrites its content and refreshes `updated` while preserving `created`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::SkillError;
use crate::skills::{args, Skill, SkillContext};

const FILE_NAME: &str = "notes.json";

/// Derived titles are cut at this many characters.
const TITLE_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Note {
    title: String,
    content: String,
    created: DateTime<Local>,
    updated: DateTime<Local>,
}

fn notes_path(data_dir: &Path) -> PathBuf {
    data_dir.join(FILE_NAME)
}

/// A missing file is an empty collection, not an error.
fn load_notes(data_dir: &Path) -> Result<BTreeMap<String, Note>, SkillError> {
    let path = notes_path(data_dir);
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&data)?)
}

fn save_notes(data_dir: &Path, notes: &BTreeMap<String, Note>) -> Result<(), SkillError> {
    std::fs::create_dir_all(data_dir)?;
    let data = serde_json::to_string_pretty(notes)?;
    std::fs::write(notes_path(data_dir), data)?;
    Ok(())
}

/// First content line, truncated; used when no title is given.
fn derive_title(content: &str) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    if first_line.chars().count() > TITLE_MAX_LEN {
        let cut: String = first_line.chars().take(TITLE_MAX_LEN).collect();
        format!("{cut}...")
    } else {
        first_line.to_string()
    }
}

// ── save_note ────────────────────────────────────────────

/// Builtin skill saving a note by title.
pub struct SaveNoteSkill;

#[async_trait]
impl Skill for SaveNoteSkill {
    fn name(&self) -> &str {
        "save_note"
    }

    fn description(&self) -> &str {
        "Save a note. Without a title, the first line of the content is used. \
         Saving an existing title overwrites its content."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "Note content"
                },
                "title": {
                    "type": "string",
                    "description": "Optional note title"
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(&self, a: &Value, context: &SkillContext) -> Result<Value, SkillError> {
        let content = args::required_str(a, "content")?;
        let title = match args::optional_str(a, "title") {
            Some(t) => t.to_string(),
            None => derive_title(content),
        };

        let mut notes = load_notes(&context.data_dir)?;
        let now = Local::now();
        match notes.get_mut(&title) {
            Some(existing) => {
                existing.content = content.to_string();
                existing.updated = now;
            }
            None => {
                notes.insert(
                    title.clone(),
                    Note {
                        title: title.clone(),
                        content: content.to_string(),
                        created: now,
                        updated: now,
                    },
                );
            }
        }
        save_notes(&context.data_dir, &notes)?;

        Ok(json!({
            "success": true,
            "title": title,
        }))
    }
}

// ── get_note ─────────────────────────────────────────────

/// Builtin skill retrieving a note by title.
pub struct GetNoteSkill;

#[async_trait]
impl Skill for GetNoteSkill {
    fn name(&self) -> &str {
        "get_note"
    }

    fn description(&self) -> &str {
        "Retrieve a saved note by its title."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "Title of the note to retrieve"
                }
            },
            "required": ["title"]
        })
    }

    async fn execute(&self, a: &Value, context: &SkillContext) -> Result<Value, SkillError> {
        let title = args::required_str(a, "title")?;
        let notes = load_notes(&context.data_dir)?;
        let note = notes
            .get(title)
            .ok_or_else(|| SkillError::invalid("title", format!("no note titled '{title}'")))?;

        Ok(json!({
            "title": note.title,
            "content": note.content,
            "created": note.created.to_rfc3339(),
            "updated": note.updated.to_rfc3339(),
        }))
    }
}

// ── list_notes ───────────────────────────────────────────

/// Builtin skill listing note titles and timestamps (no bodies).
pub struct ListNotesSkill;

#[async_trait]
impl Skill for ListNotesSkill {
    fn name(&self) -> &str {
        "list_notes"
    }

    fn description(&self) -> &str {
        "List all saved notes."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _a: &Value, context: &SkillContext) -> Result<Value, SkillError> {
        let notes = load_notes(&context.data_dir)?;
        let listing: Vec<Value> = notes
            .values()
            .map(|n| {
                json!({
                    "title": n.title,
                    "created": n.created.to_rfc3339(),
                    "updated": n.updated.to_rfc3339(),
                })
            })
            .collect();

        Ok(json!({
            "count": listing.len(),
            "notes": listing,
        }))
    }
}
