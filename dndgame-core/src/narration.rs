//! Optional flavor text for combat events.
//!
//! A [`Narrator`] sees what happened and may describe it. It never influences
//! the outcome: the combat engine resolves every action first and only then
//! asks for narration, dropping any error it gets back.

use crate::spells::SpellKind;
use thiserror::Error;

/// Errors a narrator may report.
#[derive(Debug, Error)]
pub enum NarrationError {
    #[error("Narrator unavailable: {0}")]
    Unavailable(String),

    #[error("Narration failed: {0}")]
    Failed(String),
}

/// Details of a successful hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackNarration<'a> {
    pub attacker: &'a str,
    pub defender: &'a str,
    pub weapon: &'a str,
    pub damage: i32,
    pub critical: bool,
}

/// Details of a resolved spell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellNarration<'a> {
    pub caster: &'a str,
    pub spell: &'a str,
    pub target: &'a str,
    pub kind: SpellKind,
    pub amount: i32,
}

/// Describes combat events. Returning `Ok(None)` declines to narrate.
pub trait Narrator {
    fn narrate_attack(
        &mut self,
        attack: &AttackNarration<'_>,
    ) -> Result<Option<String>, NarrationError>;

    fn narrate_miss(
        &mut self,
        attacker: &str,
        defender: &str,
    ) -> Result<Option<String>, NarrationError>;

    fn narrate_spell(
        &mut self,
        _spell: &SpellNarration<'_>,
    ) -> Result<Option<String>, NarrationError> {
        Ok(None)
    }

    fn narrate_defeat(
        &mut self,
        _fallen: &str,
        _victor: &str,
    ) -> Result<Option<String>, NarrationError> {
        Ok(None)
    }
}

impl<N: Narrator + ?Sized> Narrator for Box<N> {
    fn narrate_attack(
        &mut self,
        attack: &AttackNarration<'_>,
    ) -> Result<Option<String>, NarrationError> {
        (**self).narrate_attack(attack)
    }

    fn narrate_miss(
        &mut self,
        attacker: &str,
        defender: &str,
    ) -> Result<Option<String>, NarrationError> {
        (**self).narrate_miss(attacker, defender)
    }

    fn narrate_spell(
        &mut self,
        spell: &SpellNarration<'_>,
    ) -> Result<Option<String>, NarrationError> {
        (**self).narrate_spell(spell)
    }

    fn narrate_defeat(
        &mut self,
        fallen: &str,
        victor: &str,
    ) -> Result<Option<String>, NarrationError> {
        (**self).narrate_defeat(fallen, victor)
    }
}

/// Collapse a narrator's answer into optional text, logging failures.
pub(crate) fn best_effort(
    event: &'static str,
    result: Result<Option<String>, NarrationError>,
) -> Option<String> {
    match result {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(event, error = %e, "narration failed, continuing without it");
            None
        }
    }
}
