//! Enemies: fully specified at construction, never rolled.

use crate::abilities::AbilityScores;
use crate::creature::{Combatant, Creature};
use crate::dice::DiceSource;
use crate::error::Result;
use crate::weapons::{get_weapon, Weapon};
use serde::{Deserialize, Serialize};

/// Challenge rating given to enemies that don't set one.
pub const DEFAULT_CHALLENGE_RATING: f32 = 0.5;

/// Experience awarded for defeating a creature of the given challenge rating.
pub fn xp_for_challenge_rating(cr: f32) -> u32 {
    const TABLE: [(f32, u32); 9] = [
        (0.0, 10),
        (0.125, 25),
        (0.25, 50),
        (0.5, 100),
        (1.0, 200),
        (2.0, 450),
        (3.0, 700),
        (4.0, 1100),
        (5.0, 1800),
    ];
    TABLE
        .iter()
        .find(|(rating, _)| (rating - cr).abs() < f32::EPSILON)
        .map(|(_, xp)| *xp)
        .unwrap_or_else(|| ((200.0 * cr.max(0.0)) as u32).max(10))
}

/// A hostile creature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    creature: Creature,
    enemy_type: String,
    challenge_rating: f32,
    xp_value: u32,
}

impl Enemy {
    pub fn new(
        name: impl Into<String>,
        enemy_type: impl Into<String>,
        stats: AbilityScores,
        hp: i32,
    ) -> Self {
        Self {
            creature: Creature::with_stats(name, stats, hp),
            enemy_type: enemy_type.into(),
            challenge_rating: DEFAULT_CHALLENGE_RATING,
            xp_value: xp_for_challenge_rating(DEFAULT_CHALLENGE_RATING),
        }
    }

    pub fn with_armor_class(mut self, armor_class: i32) -> Self {
        self.creature.set_armor_class(armor_class);
        self
    }

    /// Set the challenge rating. The XP value follows the standard table.
    pub fn with_challenge_rating(mut self, cr: f32) -> Self {
        self.challenge_rating = cr;
        self.xp_value = xp_for_challenge_rating(cr);
        self
    }

    pub fn with_xp_value(mut self, xp_value: u32) -> Self {
        self.xp_value = xp_value;
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.creature.equip_weapon(weapon);
        self
    }

    pub fn enemy_type(&self) -> &str {
        &self.enemy_type
    }

    pub fn challenge_rating(&self) -> f32 {
        self.challenge_rating
    }

    pub fn xp_value(&self) -> u32 {
        self.xp_value
    }
}

impl Combatant for Enemy {
    fn creature(&self) -> &Creature {
        &self.creature
    }

    fn creature_mut(&mut self) -> &mut Creature {
        &mut self.creature
    }

    /// Enemies arrive with their scores; only make sure they're present.
    fn initialize_stats(&mut self, _dice: &mut dyn DiceSource) -> Result<()> {
        self.creature.stats().map(|_| ())
    }
}

// ============================================================================
// Stock enemies
// ============================================================================

fn stock_weapon(name: &str) -> Weapon {
    get_weapon(name).unwrap_or_else(|_| Weapon::unarmed())
}

pub fn create_goblin(name: impl Into<String>) -> Enemy {
    Enemy::new(name, "Goblin", AbilityScores::new(8, 14, 10, 10, 8, 8), 7)
        .with_armor_class(13)
        .with_challenge_rating(0.25)
        .with_weapon(stock_weapon("Scimitar"))
}

pub fn create_orc(name: impl Into<String>) -> Enemy {
    Enemy::new(name, "Orc", AbilityScores::new(16, 12, 16, 7, 11, 10), 15)
        .with_armor_class(13)
        .with_challenge_rating(0.5)
        .with_weapon(stock_weapon("Greataxe"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::Ability;
    use crate::testing::ScriptedDice;

    #[test]
    fn test_enemy_defaults() {
        let enemy = Enemy::new("Rat", "Beast", AbilityScores::uniform(10), 4);
        assert_eq!(enemy.hp(), 4);
        assert_eq!(enemy.max_hp(), 4);
        assert_eq!(enemy.armor_class(), 10);
        assert_eq!(enemy.challenge_rating(), 0.5);
        assert_eq!(enemy.xp_value(), 100);
        assert_eq!(enemy.weapon().name, "Unarmed Strike");
    }

    #[test]
    fn test_goblin() {
        let goblin = create_goblin("Snik");
        assert_eq!(goblin.name(), "Snik");
        assert_eq!(goblin.enemy_type(), "Goblin");
        assert_eq!(goblin.hp(), 7);
        assert_eq!(goblin.armor_class(), 13);
        assert_eq!(goblin.xp_value(), 50);
        assert_eq!(goblin.weapon().name, "Scimitar");
        assert_eq!(goblin.modifier(Ability::Dexterity).unwrap(), 2);
    }

    #[test]
    fn test_orc() {
        let orc = create_orc("Grok");
        assert_eq!(orc.hp(), 15);
        assert_eq!(orc.xp_value(), 100);
        assert_eq!(orc.weapon().name, "Greataxe");
        assert_eq!(orc.modifier(Ability::Strength).unwrap(), 3);
    }

    #[test]
    fn test_xp_table() {
        assert_eq!(xp_for_challenge_rating(0.0), 10);
        assert_eq!(xp_for_challenge_rating(0.125), 25);
        assert_eq!(xp_for_challenge_rating(1.0), 200);
        assert_eq!(xp_for_challenge_rating(5.0), 1800);
        // Off-table ratings fall back to 200 per point
        assert_eq!(xp_for_challenge_rating(10.0), 2000);
        assert_eq!(xp_for_challenge_rating(0.01), 10);
    }

    #[test]
    fn test_explicit_xp_value_wins() {
        let enemy = Enemy::new("Boss", "Ogre", AbilityScores::uniform(18), 59)
            .with_challenge_rating(2.0)
            .with_xp_value(999);
        assert_eq!(enemy.xp_value(), 999);
    }

    #[test]
    fn test_initialize_stats_keeps_state() {
        let mut goblin = create_goblin("Snik");
        let mut dice = ScriptedDice::constant(1);
        goblin.initialize_stats(&mut dice).unwrap();
        assert_eq!(goblin.hp(), 7);
        assert_eq!(goblin.modifier(Ability::Strength).unwrap(), -1);
    }
}
