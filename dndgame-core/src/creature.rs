//! State and behavior shared by everything that can fight.
//!
//! [`Creature`] holds the common data (ability scores, hit points, armor
//! class, equipped weapon). [`Combatant`] is the capability set the combat
//! engine relies on; characters and enemies implement it on top of their own
//! `Creature`.

use crate::abilities::{Ability, AbilityScores};
use crate::dice::DiceSource;
use crate::error::{Result, RulesError};
use crate::weapons::Weapon;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Armor class of a creature with no armor.
pub const DEFAULT_ARMOR_CLASS: i32 = 10;

/// Unique identifier for anything that can fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatantId(pub Uuid);

impl CombatantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CombatantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Common combat state.
///
/// Hit points always stay within `0..=max_hp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    id: CombatantId,
    name: String,
    stats: Option<AbilityScores>,
    hp: i32,
    max_hp: i32,
    base_hp: i32,
    armor_class: i32,
    weapon: Weapon,
}

impl Creature {
    /// A creature with no ability scores yet and zero hit points.
    pub fn new(name: impl Into<String>, base_hp: i32) -> Self {
        Self {
            id: CombatantId::new(),
            name: name.into(),
            stats: None,
            hp: 0,
            max_hp: 0,
            base_hp,
            armor_class: DEFAULT_ARMOR_CLASS,
            weapon: Weapon::unarmed(),
        }
    }

    /// A creature with known scores and a fixed hit point maximum, at full health.
    pub fn with_stats(name: impl Into<String>, stats: AbilityScores, hp: i32) -> Self {
        let hp = hp.max(0);
        Self {
            stats: Some(stats),
            hp,
            max_hp: hp,
            base_hp: hp,
            ..Self::new(name, hp)
        }
    }

    pub fn id(&self) -> CombatantId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ability scores, or an error if they have not been set up yet.
    pub fn stats(&self) -> Result<&AbilityScores> {
        self.stats.as_ref().ok_or_else(|| RulesError::StatsNotRolled {
            name: self.name.clone(),
        })
    }

    pub fn has_stats(&self) -> bool {
        self.stats.is_some()
    }

    pub(crate) fn stats_mut(&mut self) -> Result<&mut AbilityScores> {
        match self.stats.as_mut() {
            Some(stats) => Ok(stats),
            None => Err(RulesError::StatsNotRolled {
                name: self.name.clone(),
            }),
        }
    }

    /// Replace the ability scores and reset hit points from the new CON.
    pub(crate) fn set_stats(&mut self, stats: AbilityScores) {
        let con = stats.modifier(Ability::Constitution);
        self.stats = Some(stats);
        self.reset_hp(con);
    }

    pub fn modifier(&self, ability: Ability) -> Result<i32> {
        Ok(self.stats()?.modifier(ability))
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn base_hp(&self) -> i32 {
        self.base_hp
    }

    /// Set current hit points, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Set the hit point maximum. Current hit points are clamped to it.
    pub fn set_max_hp(&mut self, max_hp: i32) {
        self.max_hp = max_hp.max(0);
        self.hp = self.hp.min(self.max_hp);
    }

    /// Raise both maximum and current hit points by `amount`.
    pub(crate) fn grow_max_hp(&mut self, amount: i32) {
        self.max_hp += amount;
        self.hp = (self.hp + amount).clamp(0, self.max_hp);
    }

    /// Recompute max HP as base HP plus the CON modifier and refill to full.
    pub(crate) fn recalculate_hp(&mut self) -> Result<()> {
        let con = self.modifier(Ability::Constitution)?;
        self.reset_hp(con);
        Ok(())
    }

    fn reset_hp(&mut self, con: i32) {
        self.max_hp = (self.base_hp + con).max(0);
        self.hp = self.max_hp;
    }

    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    pub fn set_armor_class(&mut self, armor_class: i32) {
        self.armor_class = armor_class;
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    /// Replace the equipped weapon, returning the previous one.
    pub fn equip_weapon(&mut self, weapon: Weapon) -> Weapon {
        std::mem::replace(&mut self.weapon, weapon)
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply damage, never dropping below 0. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0)).max(0);
        before - self.hp
    }

    /// Restore hit points, never exceeding the maximum. Returns the HP actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp).max(before);
        self.hp - before
    }

    /// Restore to full hit points.
    pub fn heal_to_full(&mut self) -> i32 {
        self.heal(self.max_hp)
    }
}

/// Anything that can take part in combat.
pub trait Combatant {
    fn creature(&self) -> &Creature;

    fn creature_mut(&mut self) -> &mut Creature;

    /// Bring ability scores and hit points into a combat-ready state.
    fn initialize_stats(&mut self, dice: &mut dyn DiceSource) -> Result<()>;

    fn id(&self) -> CombatantId {
        self.creature().id()
    }

    fn name(&self) -> &str {
        self.creature().name()
    }

    fn modifier(&self, ability: Ability) -> Result<i32> {
        self.creature().modifier(ability)
    }

    fn hp(&self) -> i32 {
        self.creature().hp()
    }

    fn max_hp(&self) -> i32 {
        self.creature().max_hp()
    }

    fn armor_class(&self) -> i32 {
        self.creature().armor_class()
    }

    fn weapon(&self) -> &Weapon {
        self.creature().weapon()
    }

    fn is_alive(&self) -> bool {
        self.creature().is_alive()
    }

    fn take_damage(&mut self, amount: i32) -> i32 {
        self.creature_mut().take_damage(amount)
    }

    fn heal(&mut self, amount: i32) -> i32 {
        self.creature_mut().heal(amount)
    }
}
