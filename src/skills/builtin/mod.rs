//! Built-in skills and their registration.
//!
//! Registration order is the catalog order advertised to the model:
//! pure computation first, then lookups, then generative calls, then
//! local persistence.

pub mod content;
pub mod convert;
pub mod currency;
pub mod encode;
pub mod generate;
pub mod notes;
pub mod qr;
pub mod reminders;
pub mod tarot;
pub mod timezone;
pub mod twitch;
pub mod venice;
pub mod weather;
pub mod youtube;

use std::sync::Arc;

use tracing::info;

use crate::config::ConfigLoader;
use crate::skills::SkillRegistry;

pub use content::ContentSkill;
pub use convert::UnitConversionSkill;
pub use currency::CurrencySkill;
pub use encode::{Base64DecodeSkill, Base64EncodeSkill, HashSkill};
pub use generate::{PasswordSkill, UuidSkill};
pub use notes::{GetNoteSkill, ListNotesSkill, SaveNoteSkill};
pub use qr::QrCodeSkill;
pub use reminders::{ListRemindersSkill, SetReminderSkill};
pub use tarot::TarotSkill;
pub use timezone::TimezoneSkill;
pub use twitch::TwitchLiveSkill;
pub use venice::{ImageSkill, NsfwModeSkill};
pub use weather::WeatherSkill;
pub use youtube::YouTubeVideosSkill;

/// Registers every built-in skill. Called once at startup; the registry is
/// read-only afterwards.
pub fn register_builtin_skills(registry: &mut SkillRegistry, config: Arc<dyn ConfigLoader>) {
    // Pure computation
    registry.register(Box::new(UnitConversionSkill));
    registry.register(Box::new(TimezoneSkill));
    registry.register(Box::new(HashSkill));
    registry.register(Box::new(Base64EncodeSkill));
    registry.register(Box::new(Base64DecodeSkill));
    registry.register(Box::new(UuidSkill));
    registry.register(Box::new(PasswordSkill));
    registry.register(Box::new(QrCodeSkill));

    // External lookups
    registry.register(Box::new(WeatherSkill::new(config.clone())));
    registry.register(Box::new(CurrencySkill::new()));
    registry.register(Box::new(TwitchLiveSkill::new(config.clone())));
    registry.register(Box::new(YouTubeVideosSkill::new(config.clone())));

    // Generative calls
    registry.register(Box::new(TarotSkill::new(config.clone())));
    registry.register(Box::new(ImageSkill::new(config.clone())));
    registry.register(Box::new(NsfwModeSkill::new(config.clone())));
    registry.register(Box::new(ContentSkill));

    // Local persistence
    registry.register(Box::new(SetReminderSkill));
    registry.register(Box::new(ListRemindersSkill));
    registry.register(Box::new(SaveNoteSkill));
    registry.register(Box::new(GetNoteSkill));
    registry.register(Box::new(ListNotesSkill));

    info!(count = registry.len(), "registered builtin skills");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::skills::SkillContext;
    use serde_json::json;

    fn registry() -> SkillRegistry {
        let mut registry = SkillRegistry::new();
        register_builtin_skills(&mut registry, Arc::new(Config::default()));
        registry
    }

    #[test]
    fn test_full_catalog_registers() {
        let registry = registry();
        assert_eq!(registry.len(), 21);

        let names = registry.names();
        for name in [
            "convert_units",
            "convert_timezone",
            "generate_hash",
            "base64_encode",
            "base64_decode",
            "generate_uuid",
            "generate_password",
            "generate_qr_code",
            "get_weather",
            "convert_currency",
            "check_twitch_live",
            "get_youtube_videos",
            "tarot_reading",
            "generate_image",
            "nsfw_mode",
            "generate_content",
            "set_reminder",
            "list_reminders",
            "save_note",
            "get_note",
            "list_notes",
        ] {
            assert!(names.contains(&name), "missing skill {name}");
        }
    }

    #[test]
    fn test_every_skill_is_advertised_once() {
        let registry = registry();
        let definitions = registry.tool_definitions();
        assert_eq!(definitions.len(), registry.len());

        let mut seen = std::collections::HashSet::new();
        for def in &definitions {
            assert!(seen.insert(def.name.clone()), "duplicate: {}", def.name);
            assert!(!def.description.is_empty());
            assert!(def.input_schema.get("properties").is_some());
        }
    }

    #[tokio::test]
    async fn test_every_registered_name_dispatches() {
        // Dispatching each name with empty args must reach the handler:
        // anything but UnknownSkill proves catalog and dispatch agree.
        let registry = registry();
        let dir = tempfile::tempdir().unwrap();
        let ctx = SkillContext::new(dir.path());
        for name in registry.names() {
            let result = registry.dispatch(name, &json!({}), &ctx).await;
            if let Err(crate::error::SkillError::UnknownSkill(_)) = result {
                panic!("registered skill {name} dispatched as unknown");
            }
        }
    }

    #[tokio::test]
    async fn test_unregistered_name_is_unknown_skill() {
        let registry = registry();
        let dir = tempfile::tempdir().unwrap();
        let ctx = SkillContext::new(dir.path());
        let err = registry
            .dispatch("launch_rocket", &json!({}), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.class(), "unknown_skill");
    }
}
