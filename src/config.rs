//! Engine configuration: mastery thresholds, queue sizing and unlock gates.
//!
//! Loaded from a JSON file; every field is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, SrsError};
use crate::models::{MasteryThresholds, UnlockThresholds};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueConfig {
    /// Number of items in one review batch.
    pub quiz_size: usize,
    /// Upper bound on the share of never-seen items in a batch.
    pub new_item_ratio: f64,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            quiz_size: 10,
            new_item_ratio: 0.3,
        }
    }
}

impl QueueConfig {
    pub fn validate(&self) -> Result<()> {
        if self.quiz_size == 0 {
            return Err(SrsError::InvalidThreshold {
                name: "quiz_size",
                value: 0.0,
            });
        }
        if !(0.0..=1.0).contains(&self.new_item_ratio) {
            return Err(SrsError::InvalidThreshold {
                name: "new_item_ratio",
                value: self.new_item_ratio,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub mastery: MasteryThresholds,
    pub queue: QueueConfig,
    pub unlock: UnlockThresholds,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        self.mastery.validate()?;
        self.queue.validate()?;
        self.unlock.validate()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mastery.min_reviews, 5);
        assert_eq!(config.queue.quiz_size, 10);
        assert_eq!(config.unlock.verbs_at_noun_mastery, 70.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "mastery": { "minIntervalDays": 14 } }"#;
        let config = EngineConfig::from_json(json).unwrap();
        assert_eq!(config.mastery.min_interval_days, 14);
        assert_eq!(config.mastery.min_reviews, 5);
        assert_eq!(config.queue, QueueConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = EngineConfig::from_json(r#"{ "queue": { "newItemRatio": 1.5 } }"#);
        let Err(SrsError::InvalidThreshold { name, .. }) = result else {
            panic!("ratio above 1 was accepted");
        };
        assert_eq!(name, "new_item_ratio");

        let result = EngineConfig::from_json(r#"{ "mastery": { "minReviews": 0 } }"#);
        let Err(SrsError::InvalidThreshold { name, .. }) = result else {
            panic!("zero min reviews was accepted");
        };
        assert_eq!(name, "min_reviews");

        let result = EngineConfig::from_json(r#"{ "queue": { "quizSize": 0 } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "unlock": { "nounsAtLetterMastery": 50 } }"#).unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.unlock.nouns_at_letter_mastery, 50.0);
    }

    #[test]
    fn test_load_missing_file() {
        let result = EngineConfig::load("nonexistent_config_xyz123.json");
        assert!(matches!(result, Err(SrsError::Io(_))));
    }

    #[test]
    fn test_load_invalid_json() {
        let result = EngineConfig::from_json("{ this is not valid json }");
        assert!(matches!(result, Err(SrsError::Json(_))));
    }
}
