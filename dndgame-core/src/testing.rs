//! Testing utilities for the combat engine.
//!
//! This module provides deterministic stand-ins for the engine's
//! collaborators:
//! - `ScriptedDice` for forcing exact die results
//! - `ScriptedNarrator` and `FailingNarrator` for narration hooks
//! - Sample characters with known stats

use crate::abilities::AbilityScores;
use crate::character::Character;
use crate::dice::DiceSource;
use crate::narration::{AttackNarration, NarrationError, Narrator, SpellNarration};
use crate::race::Race;
use std::collections::VecDeque;

/// Dice that replay a fixed sequence of draws.
///
/// Each value is clamped to the range of the die being drawn. Once the
/// script runs out the last value repeats; an empty script always draws 1.
/// A zero-sided die draws 0 without consuming the script.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    script: VecDeque<u32>,
    last: u32,
    draws: usize,
}

impl ScriptedDice {
    pub fn new(script: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: script.into_iter().collect(),
            last: 1,
            draws: 0,
        }
    }

    /// Every draw returns `value`.
    pub fn constant(value: u32) -> Self {
        Self {
            script: VecDeque::new(),
            last: value,
            draws: 0,
        }
    }

    /// Queue more values after the current script.
    pub fn push(&mut self, value: u32) {
        self.script.push_back(value);
    }

    /// Number of dice drawn so far.
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Scripted values not yet drawn.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl DiceSource for ScriptedDice {
    fn draw(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.draws += 1;
        self.last.clamp(1, sides)
    }
}

/// A narrator that answers every event with the same line.
#[derive(Debug, Clone)]
pub struct ScriptedNarrator {
    line: String,
    calls: usize,
}

impl ScriptedNarrator {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            calls: 0,
        }
    }

    /// How many events were narrated.
    pub fn calls(&self) -> usize {
        self.calls
    }

    fn answer(&mut self) -> Result<Option<String>, NarrationError> {
        self.calls += 1;
        Ok(Some(self.line.clone()))
    }
}

impl Narrator for ScriptedNarrator {
    fn narrate_attack(
        &mut self,
        _attack: &AttackNarration<'_>,
    ) -> Result<Option<String>, NarrationError> {
        self.answer()
    }

    fn narrate_miss(&mut self, _: &str, _: &str) -> Result<Option<String>, NarrationError> {
        self.answer()
    }

    fn narrate_spell(
        &mut self,
        _spell: &SpellNarration<'_>,
    ) -> Result<Option<String>, NarrationError> {
        self.answer()
    }
}

/// A narrator that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingNarrator;

impl Narrator for FailingNarrator {
    fn narrate_attack(
        &mut self,
        _attack: &AttackNarration<'_>,
    ) -> Result<Option<String>, NarrationError> {
        Err(NarrationError::Unavailable("narrator offline".to_string()))
    }

    fn narrate_miss(&mut self, _: &str, _: &str) -> Result<Option<String>, NarrationError> {
        Err(NarrationError::Unavailable("narrator offline".to_string()))
    }

    fn narrate_defeat(&mut self, _: &str, _: &str) -> Result<Option<String>, NarrationError> {
        Err(NarrationError::Failed("no words".to_string()))
    }
}

/// Create a level 1 human with STR 16, DEX 14, CON 14 and 10 elsewhere.
///
/// Base HP 10, so 12 max HP. Unarmed, no spells, racial bonuses not applied.
pub fn sample_hero(name: &str) -> Character {
    let mut hero = Character::new(name, Race::Human, 10);
    hero.enter_rolled(AbilityScores::new(16, 14, 14, 10, 10, 10));
    hero
}
