//! Player characters: stat initialization, experience and spell resources.

use crate::abilities::{Ability, AbilityScores};
use crate::creature::{Combatant, Creature};
use crate::dice::DiceSource;
use crate::error::{Result, RulesError};
use crate::progression::{
    apply_slot_progression, next_threshold, SpellSlots, StatStage, HIT_DIE_SIDES,
    STARTING_XP_THRESHOLD,
};
use crate::race::Race;
use crate::spells::{Spell, SpellBook};
use crate::weapons::Weapon;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A player character.
///
/// Created empty: hit points stay at 0 until ability scores are rolled or
/// assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    creature: Creature,
    race: Race,
    level: u32,
    experience: u32,
    experience_to_next_level: u32,
    stat_stage: StatStage,
    spellbook: SpellBook,
    spell_slots: SpellSlots,
}

impl Character {
    pub fn new(name: impl Into<String>, race: Race, base_hp: i32) -> Self {
        Self {
            creature: Creature::new(name, base_hp),
            race,
            level: 1,
            experience: 0,
            experience_to_next_level: STARTING_XP_THRESHOLD,
            stat_stage: StatStage::Unrolled,
            spellbook: SpellBook::new(),
            spell_slots: SpellSlots::starting(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn race(&self) -> Race {
        self.race
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn experience_to_next_level(&self) -> u32 {
        self.experience_to_next_level
    }

    pub fn stat_stage(&self) -> StatStage {
        self.stat_stage
    }

    pub fn stats(&self) -> Result<&AbilityScores> {
        self.creature.stats()
    }

    pub fn spellbook(&self) -> &SpellBook {
        &self.spellbook
    }

    pub fn spell_slots(&self) -> &SpellSlots {
        &self.spell_slots
    }

    // ========================================================================
    // Stat initialization
    // ========================================================================

    /// Roll 3d6 for each ability in STR, DEX, CON, INT, WIS, CHA order and
    /// recompute hit points.
    pub fn roll_stats(&mut self, dice: &mut dyn DiceSource) {
        let mut scores = AbilityScores::default();
        for ability in Ability::all() {
            let roll = dice.roll(6, 3) as i32;
            debug!(
                character = self.name(),
                ability = ability.abbreviation(),
                roll,
                "rolled ability score"
            );
            scores.set(ability, roll);
        }
        self.enter_rolled(scores);
    }

    /// Use fixed scores instead of rolling. Bonuses have not been applied yet.
    pub fn assign_stats(&mut self, scores: AbilityScores) -> Result<()> {
        if let Some((ability, score)) = scores.iter().find(|(_, score)| *score < 1) {
            return Err(RulesError::InvalidScore { ability, score });
        }
        self.enter_rolled(scores);
        Ok(())
    }

    /// Store scores that are already known to be valid.
    pub(crate) fn enter_rolled(&mut self, scores: AbilityScores) {
        self.creature.set_stats(scores);
        self.stat_stage = StatStage::Rolled;
    }

    /// Apply the race's bonuses to this character's own scores and recompute
    /// hit points.
    pub fn apply_racial_bonuses(&mut self) -> Result<()> {
        if self.stat_stage != StatStage::Rolled {
            return Err(RulesError::InvalidStatStage {
                name: self.name().to_string(),
                action: "apply racial bonuses",
                stage: self.stat_stage,
            });
        }
        let race = self.race;
        race.apply_bonuses(self.creature.stats_mut()?);
        self.creature.recalculate_hp()?;
        self.stat_stage = StatStage::RaciallyAdjusted;
        debug!(
            character = self.name(),
            race = %race,
            max_hp = self.max_hp(),
            "applied racial bonuses"
        );
        Ok(())
    }

    // ========================================================================
    // Equipment
    // ========================================================================

    /// Equip a weapon. Returns the name of the weapon that was replaced.
    pub fn equip_weapon(&mut self, weapon: Weapon) -> String {
        let previous = self.creature.equip_weapon(weapon);
        debug!(
            character = self.name(),
            weapon = %self.weapon().name,
            previous = %previous.name,
            "equipped weapon"
        );
        previous.name
    }

    // ========================================================================
    // Experience
    // ========================================================================

    /// Add experience and level up as many times as it allows.
    ///
    /// Returns the number of levels gained. Fails without changing anything if
    /// ability scores are not set.
    pub fn gain_experience(&mut self, amount: u32, dice: &mut dyn DiceSource) -> Result<u32> {
        self.creature.stats()?;

        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.experience >= self.experience_to_next_level {
            self.level_up(dice)?;
            gained += 1;
        }
        Ok(gained)
    }

    /// Advance one level, spending the current threshold's worth of experience.
    fn level_up(&mut self, dice: &mut dyn DiceSource) -> Result<()> {
        let con = self.modifier(Ability::Constitution)?;

        self.level += 1;
        self.experience = self.experience.saturating_sub(self.experience_to_next_level);
        self.experience_to_next_level = next_threshold(self.experience_to_next_level);

        let roll = dice.roll(HIT_DIE_SIDES, 1) as i32;
        let hp_gain = (roll + con).max(1);
        self.creature.grow_max_hp(hp_gain);

        apply_slot_progression(&mut self.spell_slots, self.level);
        self.spell_slots.refill();

        info!(
            character = self.name(),
            level = self.level,
            hp_gain,
            max_hp = self.max_hp(),
            next = self.experience_to_next_level,
            "level up"
        );
        Ok(())
    }

    // ========================================================================
    // Resources
    // ========================================================================

    /// Restore hit points and every spell slot.
    pub fn rest(&mut self) {
        self.creature.heal_to_full();
        self.spell_slots.refill();
        info!(character = self.name(), hp = self.hp(), "rested");
    }

    pub fn can_cast(&self, level: u8) -> bool {
        self.spell_slots.can_cast(level)
    }

    /// Spend a slot of `level`. Returns `false`, changing nothing, when none is left.
    pub fn use_spell_slot(&mut self, level: u8) -> bool {
        self.spell_slots.use_slot(level)
    }

    /// Add a spell to the spellbook. Returns `false` if it was already known.
    pub fn learn_spell(&mut self, spell: Spell) -> bool {
        self.spellbook.add_spell(spell)
    }

    pub fn knows_spell(&self, name: &str) -> bool {
        self.spellbook.contains(name)
    }
}

impl Combatant for Character {
    fn creature(&self) -> &Creature {
        &self.creature
    }

    fn creature_mut(&mut self) -> &mut Creature {
        &mut self.creature
    }

    /// Roll fresh scores, then apply racial bonuses.
    fn initialize_stats(&mut self, dice: &mut dyn DiceSource) -> Result<()> {
        self.roll_stats(dice);
        self.apply_racial_bonuses()
    }
}
