//! lyra-skills — the capability dispatch layer of the Lyra assistant.
//!
//! Two concerns live here:
//!
//! - **Skills**: a registry of named, schema-described capabilities a
//!   language model can invoke as tool calls ([`skills`]), with built-in
//!   handlers for lookups, generation, local computation, and simple
//!   persistence ([`skills::builtin`]).
//! - **Providers**: a static capability table for upstream LLM providers
//!   and a model service that lists, validates, and ranks their models
//!   ([`providers`]).
//!
//! The host conversation loop advertises [`skills::SkillRegistry::tool_definitions`]
//! to its model, dispatches tool calls through
//! [`skills::SkillRegistry::dispatch_json`], and consults
//! [`providers::ModelService`] when picking a model.

pub mod config;
pub mod error;
pub mod providers;
pub mod skills;

pub use config::{Config, ConfigLoader};
pub use error::{ConfigError, SkillError};
pub use skills::{Skill, SkillContext, SkillRegistry};
