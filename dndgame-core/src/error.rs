//! Error types for rules resolution.
//!
//! Only precondition violations are errors. Running out of spell slots is an
//! ordinary outcome and is reported through return values instead.

use crate::abilities::Ability;
use crate::creature::CombatantId;
use crate::progression::StatStage;
use thiserror::Error;

/// A rule precondition was violated by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("{name} has no ability scores yet")]
    StatsNotRolled { name: String },

    #[error("cannot {action} for {name}: ability scores are {stage}")]
    InvalidStatStage {
        name: String,
        action: &'static str,
        stage: StatStage,
    },

    #[error("{ability} score must be at least 1, got {score}")]
    InvalidScore { ability: Ability, score: i32 },

    #[error("Unknown race: {0}")]
    UnknownRace(String),

    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),

    #[error("Unknown spell: {0}")]
    UnknownSpell(String),

    #[error("No combatant with id {0}")]
    UnknownCombatant(CombatantId),

    #[error("{caster} does not know the spell {spell}")]
    SpellNotKnown { caster: String, spell: String },

    #[error("{0} cannot cast spells")]
    NotASpellcaster(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RulesError>;
