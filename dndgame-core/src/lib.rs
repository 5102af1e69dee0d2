//! Turn-based D&D combat and character progression engine.
//!
//! This crate provides:
//! - Characters with rolled ability scores, racial bonuses and spell slots
//! - Enemies, weapons and spells from fixed catalogs
//! - Initiative, attack and spell resolution over any number of combatants
//! - Experience and leveling
//!
//! All randomness goes through an injected [`DiceSource`], so every outcome
//! can be reproduced with a seed or scripted in tests.
//!
//! # Quick Start
//!
//! ```
//! use dndgame_core::{create_goblin, CharacterBuilder, Combatant, Encounter, GameConfig, Race};
//!
//! let config = GameConfig::new().with_seed(42);
//! let mut dice = config.dice();
//! let hero = CharacterBuilder::new()
//!     .name("Thorin")
//!     .race(Race::Dwarf)
//!     .build(dice.as_mut())?;
//!
//! let (hero, report) = Encounter::new(config).run(hero, vec![create_goblin("Snik")])?;
//! println!("{:?} after {} rounds, {} HP left", report.outcome, report.rounds, hero.hp());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod abilities;
pub mod character;
pub mod character_builder;
pub mod combat;
pub mod config;
pub mod creature;
pub mod dice;
pub mod encounter;
pub mod enemy;
pub mod error;
pub mod narration;
pub mod progression;
pub mod race;
pub mod spells;
pub mod testing;
pub mod weapons;

// Primary public API
pub use abilities::{ability_modifier, Ability, AbilityScores};
pub use character::Character;
pub use character_builder::{BuilderError, CharacterBuilder};
pub use combat::{AttackOutcome, CastResult, Combat, InitiativeEntry, Participant};
pub use config::{ConfigError, GameConfig};
pub use creature::{Combatant, CombatantId, Creature};
pub use dice::{DiceRoll, DiceSource, RngDice};
pub use encounter::{Encounter, EncounterOutcome, EncounterReport};
pub use enemy::{create_goblin, create_orc, Enemy};
pub use error::{Result, RulesError};
pub use narration::{AttackNarration, NarrationError, Narrator, SpellNarration};
pub use progression::{SpellSlots, StatStage};
pub use race::Race;
pub use spells::{get_spell, Spell, SpellBook, SpellEffect, SpellOutcome};
pub use weapons::{get_weapon, Weapon};
