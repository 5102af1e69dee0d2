//! Combat engine.
//!
//! [`Combat`] owns its participants and addresses them by [`CombatantId`].
//! It rolls initiative, resolves attacks and spells, and reports when the
//! fight is over. Turn order is the caller's business: the engine provides
//! the initiative sequence and a round counter, nothing more.

use crate::abilities::Ability;
use crate::character::Character;
use crate::creature::{Combatant, CombatantId, Creature};
use crate::dice::{DiceSource, RngDice};
use crate::enemy::Enemy;
use crate::error::{Result, RulesError};
use crate::narration::{best_effort, AttackNarration, NarrationError, Narrator, SpellNarration};
use crate::spells::SpellOutcome;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Natural to-hit roll that counts as a critical.
pub const CRITICAL_ROLL: i32 = 20;

// ============================================================================
// Participants
// ============================================================================

/// Anything the engine can hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Participant {
    Character(Character),
    Enemy(Enemy),
}

impl Participant {
    pub fn as_character(&self) -> Option<&Character> {
        match self {
            Participant::Character(c) => Some(c),
            Participant::Enemy(_) => None,
        }
    }

    pub fn as_character_mut(&mut self) -> Option<&mut Character> {
        match self {
            Participant::Character(c) => Some(c),
            Participant::Enemy(_) => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&Enemy> {
        match self {
            Participant::Enemy(e) => Some(e),
            Participant::Character(_) => None,
        }
    }

    pub fn into_character(self) -> Option<Character> {
        match self {
            Participant::Character(c) => Some(c),
            Participant::Enemy(_) => None,
        }
    }

    pub fn is_character(&self) -> bool {
        matches!(self, Participant::Character(_))
    }

    /// Experience awarded for defeating this participant.
    pub fn xp_value(&self) -> u32 {
        self.as_enemy().map_or(0, Enemy::xp_value)
    }
}

impl Combatant for Participant {
    fn creature(&self) -> &Creature {
        match self {
            Participant::Character(c) => c.creature(),
            Participant::Enemy(e) => e.creature(),
        }
    }

    fn creature_mut(&mut self) -> &mut Creature {
        match self {
            Participant::Character(c) => c.creature_mut(),
            Participant::Enemy(e) => e.creature_mut(),
        }
    }

    fn initialize_stats(&mut self, dice: &mut dyn DiceSource) -> Result<()> {
        match self {
            Participant::Character(c) => c.initialize_stats(dice),
            Participant::Enemy(e) => e.initialize_stats(dice),
        }
    }
}

impl From<Character> for Participant {
    fn from(character: Character) -> Self {
        Participant::Character(character)
    }
}

impl From<Enemy> for Participant {
    fn from(enemy: Enemy) -> Self {
        Participant::Enemy(enemy)
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// One slot in the initiative order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeEntry {
    pub id: CombatantId,
    pub name: String,
    /// d20 + DEX modifier.
    pub roll: i32,
}

/// Everything that happened during one attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attacker: String,
    pub defender: String,
    pub weapon: String,
    pub natural_roll: i32,
    pub attack_total: i32,
    pub target_ac: i32,
    pub hit: bool,
    /// Natural 20. Narrative only; damage is unchanged.
    pub critical: bool,
    /// Damage dealt, 0 on a miss.
    pub damage: i32,
    pub defender_down: bool,
    pub narration: Option<String>,
}

/// Result of trying to cast a spell in combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastResult {
    Resolved(SpellOutcome),
    /// No slot of the spell's level was left. Nothing changed.
    NoSlot,
}

// ============================================================================
// Engine
// ============================================================================

pub struct Combat {
    participants: Vec<Participant>,
    initiative: Vec<InitiativeEntry>,
    round: u32,
    dice: Box<dyn DiceSource>,
    narrator: Option<Box<dyn Narrator>>,
}

impl Combat {
    /// Start a fight using thread-local dice and no narrator.
    pub fn new(participants: Vec<Participant>) -> Self {
        Self {
            participants,
            initiative: Vec::new(),
            round: 1,
            dice: Box::new(RngDice::thread()),
            narrator: None,
        }
    }

    pub fn with_dice(mut self, dice: impl DiceSource + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    pub fn with_narrator(mut self, narrator: impl Narrator + 'static) -> Self {
        self.narrator = Some(Box::new(narrator));
        self
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn into_participants(self) -> Vec<Participant> {
        self.participants
    }

    /// Take back the participants together with the dice, for follow-up rolls.
    pub fn into_parts(self) -> (Vec<Participant>, Box<dyn DiceSource>) {
        (self.participants, self.dice)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id() == id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id() == id)
    }

    fn index_of(&self, id: CombatantId) -> Result<usize> {
        self.participants
            .iter()
            .position(|p| p.id() == id)
            .ok_or(RulesError::UnknownCombatant(id))
    }

    // ========================================================================
    // Initiative and rounds
    // ========================================================================

    /// Roll d20 + DEX for everyone and order them highest first.
    ///
    /// Equal rolls keep the order participants were added in.
    pub fn roll_initiative(&mut self) -> Result<&[InitiativeEntry]> {
        let mut order = Vec::with_capacity(self.participants.len());
        for participant in &self.participants {
            let dex = participant.modifier(Ability::Dexterity)?;
            let natural = self.dice.roll(20, 1) as i32;
            let roll = natural + dex;
            debug!(combatant = participant.name(), natural, dex, roll, "initiative");
            order.push(InitiativeEntry {
                id: participant.id(),
                name: participant.name().to_string(),
                roll,
            });
        }
        order.sort_by(|a, b| b.roll.cmp(&a.roll));
        self.initiative = order;
        Ok(&self.initiative)
    }

    /// The last rolled initiative order. Empty before `roll_initiative`.
    pub fn initiative_order(&self) -> &[InitiativeEntry] {
        &self.initiative
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn next_round(&mut self) -> u32 {
        self.round += 1;
        debug!(round = self.round, "next round");
        self.round
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Resolve a weapon attack.
    ///
    /// Hits when d20 + STR meets or beats the defender's AC. A hit deals the
    /// weapon's dice + STR, at least 1. A miss changes nothing.
    pub fn attack(
        &mut self,
        attacker_id: CombatantId,
        defender_id: CombatantId,
    ) -> Result<AttackOutcome> {
        let attacker_idx = self.index_of(attacker_id)?;
        let defender_idx = self.index_of(defender_id)?;

        let attacker = &self.participants[attacker_idx];
        let str_mod = attacker.modifier(Ability::Strength)?;
        let attacker_name = attacker.name().to_string();
        let weapon = attacker.weapon().clone();

        let natural_roll = self.dice.roll(20, 1) as i32;
        let attack_total = natural_roll + str_mod;
        let target_ac = self.participants[defender_idx].armor_class();
        let hit = attack_total >= target_ac;
        let critical = natural_roll == CRITICAL_ROLL;

        debug!(
            attacker = %attacker_name,
            natural_roll,
            attack_total,
            target_ac,
            hit,
            "attack roll"
        );

        let damage = if hit {
            let rolled = weapon.damage.roll_with(self.dice.as_mut());
            let damage = (rolled + str_mod).max(1);
            self.participants[defender_idx].take_damage(damage);
            debug!(attacker = %attacker_name, weapon = %weapon.name, rolled, damage, "damage");
            damage
        } else {
            0
        };

        let defender = &self.participants[defender_idx];
        let defender_name = defender.name().to_string();
        let defender_down = hit && !defender.is_alive();

        let narration = if hit {
            let mut text = self.narrate(|n| {
                n.narrate_attack(&AttackNarration {
                    attacker: &attacker_name,
                    defender: &defender_name,
                    weapon: &weapon.name,
                    damage,
                    critical,
                })
            });
            if defender_down {
                info!(fallen = %defender_name, victor = %attacker_name, "combatant down");
                let defeat = self.narrate(|n| n.narrate_defeat(&defender_name, &attacker_name));
                text = join_lines(text, defeat);
            }
            text
        } else {
            self.narrate(|n| n.narrate_miss(&attacker_name, &defender_name))
        };

        Ok(AttackOutcome {
            attacker: attacker_name,
            defender: defender_name,
            weapon: weapon.name,
            natural_roll,
            attack_total,
            target_ac,
            hit,
            critical,
            damage,
            defender_down,
            narration,
        })
    }

    /// Cast a known spell from a character's spellbook.
    ///
    /// The slot is checked and spent before the spell takes effect; with no
    /// slot left nothing happens and [`CastResult::NoSlot`] is returned.
    pub fn cast_spell(
        &mut self,
        caster_id: CombatantId,
        spell_name: &str,
        target_id: CombatantId,
    ) -> Result<CastResult> {
        let caster_idx = self.index_of(caster_id)?;
        let target_idx = self.index_of(target_id)?;

        let participant = &mut self.participants[caster_idx];
        let caster_name = participant.name().to_string();
        let caster = participant
            .as_character_mut()
            .ok_or_else(|| RulesError::NotASpellcaster(caster_name.clone()))?;
        let spell = caster
            .spellbook()
            .get(spell_name)
            .cloned()
            .ok_or_else(|| RulesError::SpellNotKnown {
                caster: caster_name.clone(),
                spell: spell_name.to_string(),
            })?;
        let int_mod = caster.modifier(Ability::Intelligence)?;

        if !caster.use_spell_slot(spell.level) {
            debug!(
                caster = %caster_name,
                spell = %spell.name,
                level = spell.level,
                "no spell slot"
            );
            return Ok(CastResult::NoSlot);
        }

        let potency = spell.roll_potency(int_mod, self.dice.as_mut());
        let mut outcome = spell.apply(&caster_name, potency, &mut self.participants[target_idx]);

        let mut text = self.narrate(|n| {
            n.narrate_spell(&SpellNarration {
                caster: &outcome.caster,
                spell: &outcome.spell,
                target: &outcome.target,
                kind: outcome.kind,
                amount: outcome.amount,
            })
        });
        if outcome.target_down {
            info!(fallen = %outcome.target, victor = %caster_name, "combatant down");
            let defeat = self.narrate(|n| n.narrate_defeat(&outcome.target, &caster_name));
            text = join_lines(text, defeat);
        }
        outcome.narration = text;

        Ok(CastResult::Resolved(outcome))
    }

    fn narrate<F>(&mut self, call: F) -> Option<String>
    where
        F: FnOnce(&mut dyn Narrator) -> std::result::Result<Option<String>, NarrationError>,
    {
        let narrator = self.narrator.as_deref_mut()?;
        best_effort("combat", call(narrator))
    }

    // ========================================================================
    // Outcome
    // ========================================================================

    /// Ids of everyone still standing, in the order they were added.
    pub fn living(&self) -> Vec<CombatantId> {
        self.participants
            .iter()
            .filter(|p| p.is_alive())
            .map(|p| p.id())
            .collect()
    }

    /// True once at most one participant is still standing.
    pub fn is_combat_over(&self) -> bool {
        self.participants.iter().filter(|p| p.is_alive()).count() <= 1
    }

    /// The sole survivor, if exactly one remains.
    pub fn winner(&self) -> Option<&Participant> {
        let mut living = self.participants.iter().filter(|p| p.is_alive());
        match (living.next(), living.next()) {
            (Some(winner), None) => Some(winner),
            _ => None,
        }
    }
}

fn join_lines(first: Option<String>, second: Option<String>) -> Option<String> {
    match (first, second) {
        (Some(a), Some(b)) => Some(format!("{a}\n{b}")),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::AbilityScores;
    use crate::enemy::create_goblin;
    use crate::race::Race;
    use crate::spells::get_spell;
    use crate::testing::{sample_hero, FailingNarrator, ScriptedDice, ScriptedNarrator};
    use crate::weapons::get_weapon;

    fn dummy(name: &str, hp: i32) -> Enemy {
        Enemy::new(name, "Dummy", AbilityScores::uniform(10), hp)
    }

    fn duel(dice: ScriptedDice) -> (Combat, CombatantId, CombatantId) {
        let mut hero = sample_hero("Hero");
        hero.equip_weapon(get_weapon("Longsword").unwrap());
        let goblin = create_goblin("Goblin");
        let (h, g) = (hero.id(), goblin.id());
        let combat = Combat::new(vec![hero.into(), goblin.into()]).with_dice(dice);
        (combat, h, g)
    }

    #[test]
    fn test_initiative_order_follows_rolls() {
        let a = dummy("A", 5);
        let b = dummy("B", 5);
        let (a_id, b_id) = (a.id(), b.id());

        let mut combat = Combat::new(vec![a.clone().into(), b.clone().into()])
            .with_dice(ScriptedDice::new([15, 10]));
        let order: Vec<_> = combat.roll_initiative().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![a_id, b_id]);

        let mut combat =
            Combat::new(vec![a.into(), b.into()]).with_dice(ScriptedDice::new([5, 18]));
        let order: Vec<_> = combat.roll_initiative().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![b_id, a_id]);
    }

    #[test]
    fn test_initiative_ties_keep_input_order() {
        let enemies: Vec<Enemy> = ["A", "B", "C"].iter().map(|n| dummy(n, 5)).collect();
        let ids: Vec<_> = enemies.iter().map(|e| e.id()).collect();
        let mut combat = Combat::new(enemies.into_iter().map(Participant::from).collect())
            .with_dice(ScriptedDice::constant(12));

        let order: Vec<_> = combat.roll_initiative().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_initiative_adds_dex() {
        let (mut combat, hero, goblin) = duel(ScriptedDice::new([10, 10]));
        let order = combat.roll_initiative().unwrap();
        // Both DEX +2, so the tie keeps the hero first
        assert_eq!(order[0].id, hero);
        assert_eq!(order[0].roll, 12);
        assert_eq!(order[1].id, goblin);
        assert_eq!(combat.initiative_order().len(), 2);
    }

    #[test]
    fn test_attack_equal_to_ac_hits() {
        // 10 + STR 3 = 13 vs goblin AC 13; longsword rolls 1
        let (mut combat, hero, goblin) = duel(ScriptedDice::new([10, 1]));
        let outcome = combat.attack(hero, goblin).unwrap();

        assert!(outcome.hit);
        assert_eq!(outcome.attack_total, 13);
        assert_eq!(outcome.target_ac, 13);
        assert_eq!(outcome.damage, 4);
        assert_eq!(combat.combatant(goblin).unwrap().hp(), 3);
    }

    #[test]
    fn test_attack_miss_changes_nothing() {
        let (mut combat, hero, goblin) = duel(ScriptedDice::new([9]));
        let outcome = combat.attack(hero, goblin).unwrap();

        assert!(!outcome.hit);
        assert_eq!(outcome.damage, 0);
        assert!(!outcome.defender_down);
        assert_eq!(combat.combatant(goblin).unwrap().hp(), 7);
    }

    #[test]
    fn test_attack_damage_floor_of_one() {
        let weakling = Enemy::new(
            "Weakling",
            "Commoner",
            AbilityScores::new(3, 10, 10, 10, 10, 10),
            4,
        )
        .with_weapon(get_weapon("Mace").unwrap());
        let target = dummy("Target", 10);
        let (w, t) = (weakling.id(), target.id());
        let mut combat = Combat::new(vec![weakling.into(), target.into()])
            .with_dice(ScriptedDice::new([20, 1]));

        let outcome = combat.attack(w, t).unwrap();
        // 1d6 of 1, STR -4 => -3, raised to 1
        assert!(outcome.hit);
        assert_eq!(outcome.damage, 1);
        assert_eq!(combat.combatant(t).unwrap().hp(), 9);
    }

    #[test]
    fn test_critical_is_flagged_but_not_doubled() {
        let (mut combat, hero, goblin) = duel(ScriptedDice::new([20, 3]));
        let outcome = combat.attack(hero, goblin).unwrap();

        assert!(outcome.critical);
        assert_eq!(outcome.natural_roll, 20);
        assert_eq!(outcome.damage, 6);
        assert_eq!(combat.combatant(goblin).unwrap().hp(), 1);
    }

    #[test]
    fn test_killing_blow_sets_defender_down() {
        let (mut combat, hero, goblin) = duel(ScriptedDice::new([15, 8]));
        let outcome = combat.attack(hero, goblin).unwrap();

        assert!(outcome.defender_down);
        assert_eq!(combat.combatant(goblin).unwrap().hp(), 0);
        assert!(combat.is_combat_over());
        assert_eq!(combat.winner().unwrap().id(), hero);
    }

    #[test]
    fn test_attack_unknown_combatant() {
        let (mut combat, hero, _) = duel(ScriptedDice::constant(10));
        let stranger = CombatantId::new();
        assert_eq!(
            combat.attack(hero, stranger),
            Err(RulesError::UnknownCombatant(stranger))
        );
    }

    #[test]
    fn test_attack_without_stats_fails() {
        let blank = Character::new("Blank", Race::Human, 10);
        let goblin = create_goblin("Goblin");
        let (b, g) = (blank.id(), goblin.id());
        let mut combat = Combat::new(vec![blank.into(), goblin.into()])
            .with_dice(ScriptedDice::constant(10));
        assert!(combat.attack(b, g).is_err());
    }

    #[test]
    fn test_combat_over_and_winner() {
        let mut player = dummy("P", 5);
        player.creature_mut().set_hp(0);
        let enemy = dummy("E", 5);
        let e_id = enemy.id();
        let combat = Combat::new(vec![player.into(), enemy.into()]);
        assert!(combat.is_combat_over());
        assert_eq!(combat.winner().unwrap().id(), e_id);

        let mut a = dummy("A", 5);
        let mut b = dummy("B", 5);
        a.creature_mut().set_hp(0);
        b.creature_mut().set_hp(0);
        let combat = Combat::new(vec![a.into(), b.into()]);
        assert!(combat.is_combat_over());
        assert!(combat.winner().is_none());

        let combat = Combat::new(vec![dummy("A", 5).into(), dummy("B", 5).into()]);
        assert!(!combat.is_combat_over());
        assert!(combat.winner().is_none());
        assert_eq!(combat.living().len(), 2);
    }

    #[test]
    fn test_round_counter() {
        let mut combat = Combat::new(vec![]);
        assert_eq!(combat.round(), 1);
        assert_eq!(combat.next_round(), 2);
        assert_eq!(combat.round(), 2);
    }

    #[test]
    fn test_cast_spell_spends_slot() {
        let mut hero = sample_hero("Mage");
        hero.learn_spell(get_spell("Magic Missile").unwrap());
        let goblin = create_goblin("Goblin");
        let (h, g) = (hero.id(), goblin.id());
        let mut combat = Combat::new(vec![hero.into(), goblin.into()])
            .with_dice(ScriptedDice::constant(1));

        let result = combat.cast_spell(h, "Magic Missile", g).unwrap();
        let CastResult::Resolved(outcome) = result else {
            panic!("expected the spell to resolve");
        };
        // 3d4 of 1s, INT +0
        assert_eq!(outcome.amount, 3);
        assert_eq!(combat.combatant(g).unwrap().hp(), 4);

        let slots = combat.combatant(h).unwrap().as_character().unwrap().spell_slots();
        assert_eq!(slots.remaining(1), 1);
    }

    #[test]
    fn test_cast_spell_without_slot_has_no_effect() {
        let mut hero = sample_hero("Mage");
        hero.learn_spell(get_spell("Magic Missile").unwrap());
        hero.use_spell_slot(1);
        hero.use_spell_slot(1);
        let goblin = create_goblin("Goblin");
        let (h, g) = (hero.id(), goblin.id());
        let mut combat = Combat::new(vec![hero.into(), goblin.into()])
            .with_dice(ScriptedDice::constant(4));

        assert_eq!(combat.cast_spell(h, "Magic Missile", g).unwrap(), CastResult::NoSlot);
        assert_eq!(combat.combatant(g).unwrap().hp(), 7);
    }

    #[test]
    fn test_cantrips_never_run_out() {
        let mut hero = sample_hero("Mage");
        hero.learn_spell(get_spell("Fire Bolt").unwrap());
        let target = dummy("Target", 100);
        let (h, t) = (hero.id(), target.id());
        let mut combat = Combat::new(vec![hero.into(), target.into()])
            .with_dice(ScriptedDice::constant(2));

        for _ in 0..5 {
            let result = combat.cast_spell(h, "Fire Bolt", t).unwrap();
            assert!(matches!(result, CastResult::Resolved(_)));
        }
        assert_eq!(combat.combatant(t).unwrap().hp(), 90);
    }

    #[test]
    fn test_healing_spell_on_self() {
        let mut hero = sample_hero("Cleric");
        hero.learn_spell(get_spell("Cure Wounds").unwrap());
        hero.take_damage(5);
        let h = hero.id();
        let mut combat = Combat::new(vec![hero.into()]).with_dice(ScriptedDice::constant(3));

        let CastResult::Resolved(outcome) = combat.cast_spell(h, "Cure Wounds", h).unwrap() else {
            panic!("expected the spell to resolve");
        };
        assert_eq!(outcome.amount, 3);
        assert_eq!(combat.combatant(h).unwrap().hp(), 10);
    }

    #[test]
    fn test_cast_spell_errors() {
        let hero = sample_hero("Fighter");
        let goblin = create_goblin("Goblin");
        let (h, g) = (hero.id(), goblin.id());
        let mut combat = Combat::new(vec![hero.into(), goblin.into()])
            .with_dice(ScriptedDice::constant(3));

        assert!(matches!(
            combat.cast_spell(h, "Fireball", g),
            Err(RulesError::SpellNotKnown { .. })
        ));
        assert!(matches!(
            combat.cast_spell(g, "Fireball", h),
            Err(RulesError::NotASpellcaster(_))
        ));
        let slots = combat.combatant(h).unwrap().as_character().unwrap().spell_slots();
        assert_eq!(slots.remaining(1), 2);
    }

    #[test]
    fn test_narration_is_attached() {
        let (combat, hero, goblin) = duel(ScriptedDice::new([15, 1]));
        let mut combat = combat.with_narrator(ScriptedNarrator::new("A mighty blow!"));
        let outcome = combat.attack(hero, goblin).unwrap();
        assert_eq!(outcome.narration.as_deref(), Some("A mighty blow!"));
    }

    #[test]
    fn test_narration_failure_does_not_affect_outcome() {
        let (combat, hero, goblin) = duel(ScriptedDice::new([15, 1]));
        let mut combat = combat.with_narrator(FailingNarrator);
        let outcome = combat.attack(hero, goblin).unwrap();
        assert!(outcome.hit);
        assert!(outcome.narration.is_none());
        assert_eq!(combat.combatant(goblin).unwrap().hp(), 3);
    }

    #[test]
    fn test_into_participants_returns_state() {
        let (mut combat, hero, goblin) = duel(ScriptedDice::new([15, 1]));
        combat.attack(hero, goblin).unwrap();
        let participants = combat.into_participants();
        assert!(participants[0].is_character());
        assert_eq!(participants[1].hp(), 3);
        assert_eq!(participants[1].xp_value(), 50);
    }
}
