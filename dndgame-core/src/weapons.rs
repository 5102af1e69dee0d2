//! Weapon catalog.
//!
//! Weapons are immutable values looked up by name. Properties are
//! descriptive only; the attack formula reads nothing but the damage dice.

use crate::dice::DiceRoll;
use crate::error::RulesError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Weapon properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponProperty {
    Finesse,
    Light,
    Heavy,
    TwoHanded,
    Versatile,
}

impl WeaponProperty {
    pub fn name(&self) -> &'static str {
        match self {
            WeaponProperty::Finesse => "finesse",
            WeaponProperty::Light => "light",
            WeaponProperty::Heavy => "heavy",
            WeaponProperty::TwoHanded => "two-handed",
            WeaponProperty::Versatile => "versatile",
        }
    }
}

/// A weapon and its damage dice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage: DiceRoll,
    pub properties: Vec<WeaponProperty>,
}

impl Weapon {
    pub fn new(name: impl Into<String>, damage_dice: u32, damage_count: u32) -> Self {
        Self {
            name: name.into(),
            damage: DiceRoll::new(damage_count, damage_dice),
            properties: Vec::new(),
        }
    }

    pub fn with_damage_bonus(mut self, bonus: i32) -> Self {
        self.damage = self.damage.with_bonus(bonus);
        self
    }

    pub fn with_properties(mut self, properties: Vec<WeaponProperty>) -> Self {
        self.properties = properties;
        self
    }

    /// The fallback weapon every combatant holds when nothing else is equipped.
    pub fn unarmed() -> Self {
        Weapon::new("Unarmed Strike", 4, 1)
    }

    /// Sides on each damage die.
    pub fn damage_dice(&self) -> u32 {
        self.damage.sides
    }

    /// Number of damage dice rolled.
    pub fn damage_count(&self) -> u32 {
        self.damage.count
    }

    /// Flat damage added on a hit.
    pub fn damage_bonus(&self) -> i32 {
        self.damage.bonus
    }

    pub fn has_property(&self, property: WeaponProperty) -> bool {
        self.properties.contains(&property)
    }

    /// Damage in dice notation, e.g. "1d8" or "1d8+2".
    pub fn damage_description(&self) -> String {
        self.damage.to_string()
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self::unarmed()
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.damage)
    }
}

// ============================================================================
// Catalog
// ============================================================================

lazy_static::lazy_static! {
    /// Standard weapons keyed by lowercase lookup name.
    static ref WEAPONS: HashMap<&'static str, Weapon> = {
        use WeaponProperty::*;
        let mut m = HashMap::new();
        m.insert("unarmed", Weapon::unarmed());
        m.insert("unarmed strike", Weapon::unarmed());
        m.insert("dagger", Weapon::new("Dagger", 4, 1).with_properties(vec![Finesse, Light]));
        m.insert(
            "shortsword",
            Weapon::new("Shortsword", 6, 1).with_properties(vec![Finesse, Light]),
        );
        m.insert("scimitar", Weapon::new("Scimitar", 6, 1).with_properties(vec![Finesse, Light]));
        m.insert("longsword", Weapon::new("Longsword", 8, 1).with_properties(vec![Versatile]));
        m.insert(
            "greatsword",
            Weapon::new("Greatsword", 6, 2).with_properties(vec![TwoHanded, Heavy]),
        );
        m.insert("battleaxe", Weapon::new("Battleaxe", 8, 1).with_properties(vec![Versatile]));
        m.insert(
            "greataxe",
            Weapon::new("Greataxe", 12, 1).with_properties(vec![TwoHanded, Heavy]),
        );
        m.insert("mace", Weapon::new("Mace", 6, 1));
        m.insert("rapier", Weapon::new("Rapier", 8, 1).with_properties(vec![Finesse]));
        m.insert("warhammer", Weapon::new("Warhammer", 8, 1).with_properties(vec![Versatile]));
        m
    };
}

/// Get a standard weapon by name (case-insensitive).
pub fn get_weapon(name: &str) -> Result<Weapon, RulesError> {
    WEAPONS
        .get(name.trim().to_lowercase().as_str())
        .cloned()
        .ok_or_else(|| RulesError::UnknownWeapon(name.to_string()))
}

/// Names of every distinct weapon in the catalog, sorted.
pub fn weapon_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = WEAPONS
        .iter()
        .filter(|(key, _)| **key != "unarmed")
        .map(|(_, weapon)| weapon.name.as_str())
        .collect();
    names.sort_unstable();
    names
}

/// The weapon a new character of the named race starts with.
///
/// Unrecognized races start unarmed.
pub fn starting_weapon_for_race(race_name: &str) -> Weapon {
    let weapon = match race_name.trim().to_lowercase().as_str() {
        "human" => "longsword",
        "elf" => "shortsword",
        "dwarf" => "battleaxe",
        "halfling" => "dagger",
        _ => "unarmed",
    };
    get_weapon(weapon).unwrap_or_else(|_| Weapon::unarmed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_creation() {
        let weapon = Weapon::new("Longsword", 8, 1);
        assert_eq!(weapon.name, "Longsword");
        assert_eq!(weapon.damage_dice(), 8);
        assert_eq!(weapon.damage_count(), 1);
        assert_eq!(weapon.damage_bonus(), 0);
        assert!(weapon.properties.is_empty());
    }

    #[test]
    fn test_damage_description() {
        assert_eq!(Weapon::new("Dagger", 4, 1).damage_description(), "1d4");
        assert_eq!(Weapon::new("Greatsword", 6, 2).damage_description(), "2d6");
        assert_eq!(
            Weapon::new("Magic Sword", 8, 1)
                .with_damage_bonus(2)
                .damage_description(),
            "1d8+2"
        );
    }

    #[test]
    fn test_get_weapon() {
        let longsword = get_weapon("Longsword").unwrap();
        assert_eq!(longsword.name, "Longsword");
        assert_eq!(longsword.damage_dice(), 8);

        let rapier = get_weapon("rapier").unwrap();
        assert!(rapier.has_property(WeaponProperty::Finesse));

        assert_eq!(get_weapon("Unarmed").unwrap().name, "Unarmed Strike");
    }

    #[test]
    fn test_get_weapon_invalid() {
        assert_eq!(
            get_weapon("LaserGun"),
            Err(RulesError::UnknownWeapon("LaserGun".to_string()))
        );
    }

    #[test]
    fn test_catalog_contents() {
        let names = weapon_names();
        for expected in ["Dagger", "Longsword", "Greatsword", "Shortsword", "Unarmed Strike"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        assert_eq!(names.iter().filter(|n| **n == "Unarmed Strike").count(), 1);
    }

    #[test]
    fn test_starting_weapon_for_race() {
        assert_eq!(starting_weapon_for_race("Human").name, "Longsword");
        assert_eq!(starting_weapon_for_race("Elf").name, "Shortsword");
        assert_eq!(starting_weapon_for_race("Dwarf").name, "Battleaxe");
        assert_eq!(starting_weapon_for_race("Halfling").name, "Dagger");
    }

    #[test]
    fn test_starting_weapon_unknown_race() {
        assert_eq!(starting_weapon_for_race("Dragon").name, "Unarmed Strike");
    }
}
