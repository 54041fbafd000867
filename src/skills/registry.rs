//! Name-keyed skill registry and dispatch.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use super::{Skill, SkillContext, ToolDefinition};
use crate::error::SkillError;

/// Registry of all invocable skills.
///
/// Iteration order is registration order, so the advertised catalog is
/// deterministic across runs.
#[derive(Default)]
pub struct SkillRegistry {
    skills: Vec<Box<dyn Skill>>,
    index: HashMap<String, usize>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a skill.
    ///
    /// Panics on a duplicate name or a malformed parameter schema; both are
    /// startup bugs, not runtime conditions.
    pub fn register(&mut self, skill: Box<dyn Skill>) {
        let name = skill.name().to_string();
        validate_schema(&name, &skill.parameters_schema());
        if self.index.contains_key(&name) {
            panic!("duplicate skill registration: {name}");
        }
        debug!(skill = %name, "registered skill");
        self.index.insert(name, self.skills.len());
        self.skills.push(skill);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Skill> {
        self.index.get(name).map(|&i| self.skills[i].as_ref())
    }

    /// Dispatches a tool call to the named skill.
    pub async fn dispatch(
        &self,
        name: &str,
        args: &Value,
        context: &SkillContext,
    ) -> Result<Value, SkillError> {
        let skill = self
            .get(name)
            .ok_or_else(|| SkillError::UnknownSkill(name.to_string()))?;
        let started = std::time::Instant::now();
        let result = skill.execute(args, context).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => debug!(skill = name, elapsed_ms, "skill completed"),
            Err(e) => warn!(
                skill = name,
                elapsed_ms,
                class = e.class(),
                error = %e,
                "skill failed"
            ),
        }
        result
    }

    /// Dispatch entry for OpenAI-style tool calls whose arguments arrive as
    /// a JSON string. An empty string means no arguments.
    pub async fn dispatch_json(
        &self,
        name: &str,
        raw_args: &str,
        context: &SkillContext,
    ) -> Result<Value, SkillError> {
        let args = if raw_args.trim().is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(raw_args)
                .map_err(|e| SkillError::invalid("arguments", format!("not valid JSON: {e}")))?
        };
        self.dispatch(name, &args, context).await
    }

    /// Catalog in the provider tool-advertisement shape.
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.skills
            .iter()
            .map(|s| ToolDefinition {
                name: s.name().to_string(),
                description: s.description().to_string(),
                input_schema: s.parameters_schema(),
            })
            .collect()
    }

    /// Skill names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.skills.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// A schema whose `required` list names an undeclared property would
/// advertise arguments the handler never reads. Caught at startup.
fn validate_schema(name: &str, schema: &Value) {
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        panic!("skill {name}: parameters schema has no properties object");
    };
    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for entry in required {
            let Some(field) = entry.as_str() else {
                panic!("skill {name}: non-string entry in required list");
            };
            if !properties.contains_key(field) {
                panic!("skill {name}: required field '{field}' not declared in properties");
            }
        }
    }
}
