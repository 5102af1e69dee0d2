//! Game configuration.

use crate::character_builder::DEFAULT_BASE_HP;
use crate::dice::{DiceSource, RngDice};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn default_base_hp() -> i32 {
    DEFAULT_BASE_HP
}

fn default_max_rounds() -> u32 {
    100
}

fn default_narration() -> bool {
    true
}

/// Settings for a play session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seed for reproducible dice. Thread-local randomness when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Base hit points for characters built with `CharacterBuilder::from_config`.
    #[serde(default = "default_base_hp")]
    pub base_hp: i32,

    /// Rounds an automatic encounter may last before it is called a stalemate.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Whether an attached narrator is consulted.
    #[serde(default = "default_narration")]
    pub narration: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            base_hp: default_base_hp(),
            max_rounds: default_max_rounds(),
            narration: default_narration(),
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_base_hp(mut self, base_hp: i32) -> Self {
        self.base_hp = base_hp;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_narration(mut self, narration: bool) -> Self {
        self.narration = narration;
        self
    }

    /// Build the configured randomness source.
    pub fn dice(&self) -> Box<dyn DiceSource> {
        match self.seed {
            Some(seed) => Box::new(RngDice::seeded(seed)),
            None => Box::new(RngDice::thread()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.seed, None);
        assert_eq!(config.base_hp, 10);
        assert_eq!(config.max_rounds, 100);
        assert!(config.narration);
    }

    #[test]
    fn test_from_json_partial() {
        let config = GameConfig::from_json(r#"{ "seed": 7, "max_rounds": 20 }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.max_rounds, 20);
        assert_eq!(config.base_hp, 10);
        assert!(config.narration);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = GameConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(GameConfig::from_json(r#"{ "base_hp": "lots" }"#).is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_settings() {
        let config = GameConfig::new().with_seed(3).with_narration(false);
        let parsed = GameConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_seeded_dice_are_reproducible() {
        let config = GameConfig::new().with_seed(99);
        let mut a = config.dice();
        let mut b = config.dice();
        let first: Vec<u32> = (0..10).map(|_| a.draw(20)).collect();
        let second: Vec<u32> = (0..10).map(|_| b.draw(20)).collect();
        assert_eq!(first, second);
    }
}
