//! Automatic encounters: one character against a group of enemies.
//!
//! Drives [`Combat`] the way an interactive game loop would. Every round
//! walks the initiative order, skips anyone who has fallen, and has the
//! character strike the first enemy still standing while each enemy strikes
//! the character. Combat end is checked after every action.

use crate::character::Character;
use crate::combat::{AttackOutcome, Combat, Participant};
use crate::config::GameConfig;
use crate::creature::{Combatant, CombatantId};
use crate::dice::DiceSource;
use crate::enemy::Enemy;
use crate::error::{Result, RulesError};
use crate::narration::Narrator;
use serde::{Deserialize, Serialize};
use tracing::info;

/// How an encounter ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterOutcome {
    Victory,
    Defeat,
    /// The round limit was reached with both sides standing.
    Stalemate,
}

/// Summary of a finished encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterReport {
    pub rounds: u32,
    pub outcome: EncounterOutcome,
    pub xp_awarded: u32,
    pub levels_gained: u32,
    /// One line per event, in order.
    pub log: Vec<String>,
}

/// Runs encounters with a fixed configuration.
pub struct Encounter {
    config: GameConfig,
    dice: Option<Box<dyn DiceSource>>,
    narrator: Option<Box<dyn Narrator>>,
}

impl Encounter {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            dice: None,
            narrator: None,
        }
    }

    /// Use these dice instead of the configured ones.
    pub fn with_dice(mut self, dice: impl DiceSource + 'static) -> Self {
        self.dice = Some(Box::new(dice));
        self
    }

    pub fn with_narrator(mut self, narrator: impl Narrator + 'static) -> Self {
        self.narrator = Some(Box::new(narrator));
        self
    }

    /// Fight until one side is down or the round limit is hit.
    ///
    /// The character is handed back along with the report, with any
    /// experience from a victory already applied.
    pub fn run(
        self,
        character: Character,
        enemies: Vec<Enemy>,
    ) -> Result<(Character, EncounterReport)> {
        let hero_id = character.id();
        let enemy_xp = enemies
            .iter()
            .map(Enemy::xp_value)
            .fold(0u32, u32::saturating_add);
        let max_rounds = self.config.max_rounds.max(1);

        let dice = self.dice.unwrap_or_else(|| self.config.dice());
        let mut participants: Vec<Participant> = vec![character.into()];
        participants.extend(enemies.into_iter().map(Participant::from));

        let mut combat = Combat::new(participants).with_dice(dice);
        if self.config.narration {
            if let Some(narrator) = self.narrator {
                combat = combat.with_narrator(narrator);
            }
        }

        let mut log = Vec::new();
        let order: Vec<CombatantId> = combat.roll_initiative()?.iter().map(|e| e.id).collect();
        for entry in combat.initiative_order() {
            log.push(format!("Initiative: {} rolls {}", entry.name, entry.roll));
        }

        'fight: loop {
            for &actor in &order {
                if combat.is_combat_over() {
                    break 'fight;
                }
                let Some(target) = choose_target(&combat, actor, hero_id) else {
                    continue;
                };
                let outcome = combat.attack(actor, target)?;
                log.push(format!("Round {}: {}", combat.round(), describe(&outcome)));
                if let Some(text) = outcome.narration {
                    log.push(text);
                }
                if !combat.combatant(hero_id).is_some_and(|p| p.is_alive()) {
                    break 'fight;
                }
            }
            if combat.is_combat_over() || combat.round() >= max_rounds {
                break;
            }
            combat.next_round();
        }

        let rounds = combat.round();
        let (participants, mut dice) = combat.into_parts();
        let enemies_standing = participants
            .iter()
            .any(|p| !p.is_character() && p.is_alive());
        let mut character = participants
            .into_iter()
            .find(|p| p.id() == hero_id)
            .and_then(Participant::into_character)
            .ok_or(RulesError::UnknownCombatant(hero_id))?;

        let outcome = if !character.is_alive() {
            EncounterOutcome::Defeat
        } else if enemies_standing {
            EncounterOutcome::Stalemate
        } else {
            EncounterOutcome::Victory
        };

        let (xp_awarded, levels_gained) = if outcome == EncounterOutcome::Victory {
            let levels = character.gain_experience(enemy_xp, dice.as_mut())?;
            log.push(format!("{} gains {} XP", character.name(), enemy_xp));
            (enemy_xp, levels)
        } else {
            (0, 0)
        };

        info!(?outcome, rounds, xp_awarded, levels_gained, "encounter finished");

        Ok((
            character,
            EncounterReport {
                rounds,
                outcome,
                xp_awarded,
                levels_gained,
                log,
            },
        ))
    }
}

/// Who `actor` should hit, or `None` if it can't act.
fn choose_target(combat: &Combat, actor: CombatantId, hero: CombatantId) -> Option<CombatantId> {
    let participant = combat.combatant(actor)?;
    if !participant.is_alive() {
        return None;
    }
    if participant.is_character() {
        combat
            .participants()
            .iter()
            .find(|p| !p.is_character() && p.is_alive())
            .map(|p| p.id())
    } else {
        combat
            .combatant(hero)
            .filter(|p| p.is_alive())
            .map(|p| p.id())
    }
}

fn describe(outcome: &AttackOutcome) -> String {
    if !outcome.hit {
        return format!("{} misses {}", outcome.attacker, outcome.defender);
    }
    let mut line = format!(
        "{} hits {} with {} for {} damage",
        outcome.attacker, outcome.defender, outcome.weapon, outcome.damage
    );
    if outcome.critical {
        line.push_str(" (critical)");
    }
    if outcome.defender_down {
        line.push_str(&format!(", {} falls", outcome.defender));
    }
    line
}
