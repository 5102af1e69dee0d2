//! Playable races and their ability score bonuses.

use crate::abilities::{Ability, AbilityScores};
use crate::error::RulesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A playable race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Human,
    Elf,
    Dwarf,
    Halfling,
}

impl Race {
    pub fn name(&self) -> &'static str {
        match self {
            Race::Human => "Human",
            Race::Elf => "Elf",
            Race::Dwarf => "Dwarf",
            Race::Halfling => "Halfling",
        }
    }

    /// Short summary of the racial bonuses.
    pub fn description(&self) -> &'static str {
        match self {
            Race::Human => "+1 to all stats",
            Race::Elf => "+2 DEX",
            Race::Dwarf => "+2 CON",
            Race::Halfling => "+2 DEX, +1 CHA",
        }
    }

    /// Apply racial ability score bonuses to the given scores in place.
    pub fn apply_bonuses(&self, scores: &mut AbilityScores) {
        match self {
            Race::Human => {
                for ability in Ability::all() {
                    scores.increase(ability, 1);
                }
            }
            Race::Elf => scores.increase(Ability::Dexterity, 2),
            Race::Dwarf => scores.increase(Ability::Constitution, 2),
            Race::Halfling => {
                scores.increase(Ability::Dexterity, 2);
                scores.increase(Ability::Charisma, 1);
            }
        }
    }

    /// Every available race.
    pub fn all() -> &'static [Race] {
        &[Race::Human, Race::Elf, Race::Dwarf, Race::Halfling]
    }

    /// Look up a race by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Race, RulesError> {
        Race::all()
            .iter()
            .copied()
            .find(|race| race.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| RulesError::UnknownRace(name.to_string()))
    }
}

impl FromStr for Race {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Race::from_name(s)
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
