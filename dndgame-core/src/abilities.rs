//! The six ability scores and their modifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    /// All abilities, in the order they are rolled.
    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

/// Modifier for a raw ability score.
///
/// Floors toward negative infinity: 9 gives -1, 3 gives -4.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// A complete set of ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    pub fn new(str: i32, dex: i32, con: i32, int: i32, wis: i32, cha: i32) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    /// Every score set to the same value.
    pub fn uniform(score: i32) -> Self {
        Self::new(score, score, score, score, score, score)
    }

    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn set(&mut self, ability: Ability, value: i32) {
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Add `amount` to one score.
    pub fn increase(&mut self, ability: Ability, amount: i32) {
        self.set(ability, self.get(ability) + amount);
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.get(ability))
    }

    /// Scores paired with their ability, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Ability, i32)> + '_ {
        Ability::all().into_iter().map(move |a| (a, self.get(a)))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::uniform(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_table() {
        assert_eq!(ability_modifier(1), -5);
        assert_eq!(ability_modifier(3), -4);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(16), 3);
        assert_eq!(ability_modifier(20), 5);
    }

    #[test]
    fn test_get_set_round_trip_per_ability() {
        let mut scores = AbilityScores::default();
        for (i, ability) in Ability::all().into_iter().enumerate() {
            scores.set(ability, 8 + i as i32);
        }
        assert_eq!(scores, AbilityScores::new(8, 9, 10, 11, 12, 13));
    }

    #[test]
    fn test_scores_modifier() {
        let scores = AbilityScores::new(10, 16, 8, 10, 10, 10);
        assert_eq!(scores.modifier(Ability::Strength), 0);
        assert_eq!(scores.modifier(Ability::Dexterity), 3);
        assert_eq!(scores.modifier(Ability::Constitution), -1);
    }

    #[test]
    fn test_iter_is_canonical_order() {
        let scores = AbilityScores::new(1, 2, 3, 4, 5, 6);
        let abbreviations: Vec<_> = scores.iter().map(|(a, _)| a.abbreviation()).collect();
        assert_eq!(abbreviations, ["STR", "DEX", "CON", "INT", "WIS", "CHA"]);
    }
}
