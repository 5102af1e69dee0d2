//! Step-by-step character creation.
//!
//! The builder collects a name, race and optional choices, then produces a
//! character whose stats are initialized, weapon equipped and spells learned.

use crate::abilities::AbilityScores;
use crate::character::Character;
use crate::config::GameConfig;
use crate::creature::Combatant;
use crate::dice::DiceSource;
use crate::error::RulesError;
use crate::race::Race;
use crate::spells::get_spell;
use crate::weapons::{get_weapon, starting_weapon_for_race, Weapon};

/// Base hit points for a new character before the CON modifier.
pub const DEFAULT_BASE_HP: i32 = 10;

/// How the builder obtains ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AbilityMethod {
    /// Roll 3d6 per ability.
    #[default]
    Rolled,
    /// Use scores supplied up front.
    Fixed(AbilityScores),
}

/// Error from character building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    MissingName,
    MissingRace,
    Rules(RulesError),
}

impl std::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuilderError::MissingName => write!(f, "Character name is required"),
            BuilderError::MissingRace => write!(f, "Race selection is required"),
            BuilderError::Rules(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for BuilderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuilderError::Rules(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RulesError> for BuilderError {
    fn from(e: RulesError) -> Self {
        BuilderError::Rules(e)
    }
}

/// Builder for new characters.
#[derive(Debug, Clone)]
pub struct CharacterBuilder {
    name: Option<String>,
    race: Option<Race>,
    base_hp: i32,
    ability_method: AbilityMethod,
    weapon: Option<String>,
    spells: Vec<String>,
}

impl Default for CharacterBuilder {
    fn default() -> Self {
        Self {
            name: None,
            race: None,
            base_hp: DEFAULT_BASE_HP,
            ability_method: AbilityMethod::default(),
            weapon: None,
            spells: Vec::new(),
        }
    }
}

impl CharacterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the configured base hit points.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new().base_hp(config.base_hp)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn race(mut self, race: Race) -> Self {
        self.race = Some(race);
        self
    }

    /// Select a race by name. Unknown names fail when building.
    pub fn race_name(mut self, name: &str) -> Result<Self, BuilderError> {
        self.race = Some(Race::from_name(name)?);
        Ok(self)
    }

    pub fn base_hp(mut self, base_hp: i32) -> Self {
        self.base_hp = base_hp;
        self
    }

    /// Use these scores instead of rolling. Racial bonuses still apply.
    pub fn ability_scores(mut self, scores: AbilityScores) -> Self {
        self.ability_method = AbilityMethod::Fixed(scores);
        self
    }

    /// Start with a weapon other than the race's default.
    pub fn weapon(mut self, name: impl Into<String>) -> Self {
        self.weapon = Some(name.into());
        self
    }

    /// Add a spell to learn, by catalog name.
    pub fn spell(mut self, name: impl Into<String>) -> Self {
        self.spells.push(name.into());
        self
    }

    pub fn spells<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.spells.extend(names.into_iter().map(Into::into));
        self
    }

    /// Build the character.
    ///
    /// Catalog lookups happen before any dice are rolled.
    pub fn build(self, dice: &mut dyn DiceSource) -> Result<Character, BuilderError> {
        let name = self.name.ok_or(BuilderError::MissingName)?;
        let race = self.race.ok_or(BuilderError::MissingRace)?;

        let weapon: Weapon = match &self.weapon {
            Some(weapon) => get_weapon(weapon)?,
            None => starting_weapon_for_race(race.name()),
        };
        let spells = self
            .spells
            .iter()
            .map(|spell| get_spell(spell))
            .collect::<Result<Vec<_>, _>>()?;

        let mut character = Character::new(name, race, self.base_hp);
        match self.ability_method {
            AbilityMethod::Rolled => character.initialize_stats(dice)?,
            AbilityMethod::Fixed(scores) => {
                character.assign_stats(scores)?;
                character.apply_racial_bonuses()?;
            }
        }
        character.equip_weapon(weapon);
        for spell in spells {
            character.learn_spell(spell);
        }

        tracing::info!(
            character = character.name(),
            race = %race,
            max_hp = character.max_hp(),
            weapon = %character.weapon().name,
            "character created"
        );
        Ok(character)
    }
}
