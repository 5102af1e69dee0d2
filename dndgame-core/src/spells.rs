//! Spell catalog and spellcasting mechanics.
//!
//! A spell either damages or heals. Both kinds share the same potency rule:
//! roll the spell's dice, add the caster's INT modifier, and never go below 1.

use crate::abilities::Ability;
use crate::creature::Combatant;
use crate::dice::{DiceRoll, DiceSource};
use crate::error::{Result, RulesError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Schools of magic. Flavor only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellSchool {
    Abjuration,
    Conjuration,
    Divination,
    Enchantment,
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

impl SpellSchool {
    pub fn name(&self) -> &'static str {
        match self {
            SpellSchool::Abjuration => "Abjuration",
            SpellSchool::Conjuration => "Conjuration",
            SpellSchool::Divination => "Divination",
            SpellSchool::Enchantment => "Enchantment",
            SpellSchool::Evocation => "Evocation",
            SpellSchool::Illusion => "Illusion",
            SpellSchool::Necromancy => "Necromancy",
            SpellSchool::Transmutation => "Transmutation",
        }
    }
}

/// What a spell does to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellEffect {
    Damage(DiceRoll),
    Healing(DiceRoll),
}

impl SpellEffect {
    pub fn dice(&self) -> DiceRoll {
        match self {
            SpellEffect::Damage(dice) | SpellEffect::Healing(dice) => *dice,
        }
    }

    pub fn kind(&self) -> SpellKind {
        match self {
            SpellEffect::Damage(_) => SpellKind::Damage,
            SpellEffect::Healing(_) => SpellKind::Healing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellKind {
    Damage,
    Healing,
}

/// A spell definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    /// 0 for cantrips.
    pub level: u8,
    pub school: SpellSchool,
    pub description: String,
    pub effect: SpellEffect,
}

/// The result of a resolved spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellOutcome {
    pub spell: String,
    pub caster: String,
    pub target: String,
    pub kind: SpellKind,
    /// Damage dealt, or hit points actually restored after the max HP cap.
    pub amount: i32,
    pub target_down: bool,
    pub description: String,
    /// Flavor text, when cast in combat with a narrator attached.
    pub narration: Option<String>,
}

impl Spell {
    /// A spell that deals `count` dice of `sides` damage.
    pub fn damage(
        name: impl Into<String>,
        level: u8,
        school: SpellSchool,
        description: impl Into<String>,
        sides: u32,
        count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            school,
            description: description.into(),
            effect: SpellEffect::Damage(DiceRoll::new(count, sides)),
        }
    }

    /// A spell that heals `count` dice of `sides` hit points.
    pub fn healing(
        name: impl Into<String>,
        level: u8,
        school: SpellSchool,
        description: impl Into<String>,
        sides: u32,
        count: u32,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            school,
            description: description.into(),
            effect: SpellEffect::Healing(DiceRoll::new(count, sides)),
        }
    }

    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }

    pub fn kind(&self) -> SpellKind {
        self.effect.kind()
    }

    /// Roll the spell's potency for a caster with the given INT modifier.
    pub fn roll_potency(&self, int_modifier: i32, dice: &mut dyn DiceSource) -> i32 {
        (self.effect.dice().roll_with(dice) + int_modifier).max(1)
    }

    /// Cast at another combatant.
    pub fn cast(
        &self,
        caster: &dyn Combatant,
        target: &mut dyn Combatant,
        dice: &mut dyn DiceSource,
    ) -> Result<SpellOutcome> {
        let int_mod = caster.modifier(Ability::Intelligence)?;
        let potency = self.roll_potency(int_mod, dice);
        Ok(self.apply(caster.name(), potency, target))
    }

    /// Cast with the caster as the target.
    pub fn cast_on_self(
        &self,
        caster: &mut dyn Combatant,
        dice: &mut dyn DiceSource,
    ) -> Result<SpellOutcome> {
        let int_mod = caster.modifier(Ability::Intelligence)?;
        let potency = self.roll_potency(int_mod, dice);
        let caster_name = caster.name().to_string();
        Ok(self.apply(&caster_name, potency, caster))
    }

    /// Apply an already rolled potency to `target`.
    pub(crate) fn apply(
        &self,
        caster_name: &str,
        potency: i32,
        target: &mut dyn Combatant,
    ) -> SpellOutcome {
        let (amount, description) = match self.effect {
            SpellEffect::Damage(_) => {
                target.take_damage(potency);
                (
                    potency,
                    format!("{} deals {} damage to {}", self.name, potency, target.name()),
                )
            }
            SpellEffect::Healing(_) => {
                let healed = target.heal(potency);
                (
                    healed,
                    format!("{} heals {} for {} HP", self.name, target.name(), healed),
                )
            }
        };

        tracing::info!(
            spell = %self.name,
            caster = caster_name,
            target = target.name(),
            amount,
            "spell resolved"
        );

        SpellOutcome {
            spell: self.name.clone(),
            caster: caster_name.to_string(),
            target: target.name().to_string(),
            kind: self.kind(),
            amount,
            target_down: !target.is_alive(),
            description,
            narration: None,
        }
    }
}

impl fmt::Display for Spell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = if self.is_cantrip() {
            "cantrip".to_string()
        } else {
            format!("level {}", self.level)
        };
        write!(f, "{} ({}, {})", self.name, level, self.school.name())
    }
}

// ============================================================================
// Spellbook
// ============================================================================

/// Spells a character knows, in the order learned, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellBook {
    spells: Vec<Spell>,
}

impl SpellBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn a spell. Returns false if it was already known.
    pub fn add_spell(&mut self, spell: Spell) -> bool {
        if self.contains(&spell.name) {
            return false;
        }
        self.spells.push(spell);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Find a known spell by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Spell> {
        self.spells
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn spells(&self) -> &[Spell] {
        &self.spells
    }

    /// Known spells of exactly `level`.
    pub fn spells_by_level(&self, level: u8) -> Vec<&Spell> {
        self.spells.iter().filter(|s| s.level == level).collect()
    }

    /// Known spells of `max_level` or lower.
    pub fn available_spells(&self, max_level: u8) -> Vec<&Spell> {
        self.spells.iter().filter(|s| s.level <= max_level).collect()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

// ============================================================================
// Spell Database
// ============================================================================

/// Global spell database, keyed by lowercase name.
static SPELL_DATABASE: LazyLock<HashMap<String, Spell>> = LazyLock::new(build_spell_database);

/// Look up a spell by name (case-insensitive).
pub fn get_spell(name: &str) -> Result<Spell> {
    SPELL_DATABASE
        .get(&name.trim().to_lowercase())
        .cloned()
        .ok_or_else(|| RulesError::UnknownSpell(name.to_string()))
}

/// Get all spells in the database.
pub fn all_spells() -> impl Iterator<Item = &'static Spell> {
    SPELL_DATABASE.values()
}

fn build_spell_database() -> HashMap<String, Spell> {
    use SpellSchool::*;

    let spells = [
        // Cantrips
        Spell::damage("Fire Bolt", 0, Evocation, "A mote of fire hurled at a creature.", 10, 1),
        Spell::damage("Ray of Frost", 0, Evocation, "A frigid beam of blue-white light.", 8, 1),
        // Level 1
        Spell::damage(
            "Magic Missile",
            1,
            Evocation,
            "Three glowing darts of magical force.",
            4,
            3,
        ),
        Spell::damage(
            "Burning Hands",
            1,
            Evocation,
            "A thin sheet of flames from outstretched fingertips.",
            6,
            3,
        ),
        Spell::healing("Cure Wounds", 1, Evocation, "A touch that knits wounds closed.", 8, 1),
        Spell::healing(
            "Healing Word",
            1,
            Evocation,
            "A word of restoration spoken at range.",
            4,
            1,
        ),
        // Level 2
        Spell::damage("Shatter", 2, Evocation, "A painfully intense ringing noise.", 8, 3),
        // Level 3
        Spell::damage(
            "Fireball",
            3,
            Evocation,
            "A bright streak that blossoms into flame.",
            6,
            8,
        ),
    ];

    spells
        .into_iter()
        .map(|spell| (spell.name.to_lowercase(), spell))
        .collect()
}
