pub mod args;
pub mod builtin;
pub mod registry;

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SkillError;

/// Runtime context passed to skill execution.
///
/// Carries the data directory so skills that persist state (reminders,
/// notes, generated files) stay scoped to one place and tests can point
/// them at a tempdir.
pub struct SkillContext {
    pub data_dir: PathBuf,
}

impl SkillContext {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}

/// A skill the LLM can invoke as a tool call.
///
/// The trait is both the catalog entry (name, description, schema) and the
/// handler, so a registered skill can never be advertised without being
/// dispatchable.
#[async_trait]
pub trait Skill: Send + Sync {
    /// Unique identifier used in the provider `tools[]` array.
    /// Must be lowercase alphanumeric + underscores (e.g. "generate_uuid").
    fn name(&self) -> &str;

    /// Human-readable description shown to the LLM so it knows
    /// when to invoke this skill.
    fn description(&self) -> &str;

    /// JSON Schema describing the arguments this skill accepts.
    /// Every field the handler reads must be declared here.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the skill. `args` is a JSON object; the result is a
    /// JSON-serializable map sent back to the LLM as the tool result.
    async fn execute(
        &self,
        args: &serde_json::Value,
        context: &SkillContext,
    ) -> Result<serde_json::Value, SkillError>;
}

/// Provider-facing tool advertisement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

pub use registry::SkillRegistry;
