//! Experience curve, stat initialization stages and spell slot tracking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Experience needed to go from level 1 to level 2.
pub const STARTING_XP_THRESHOLD: u32 = 100;

/// Die rolled for hit points gained on each level up.
pub const HIT_DIE_SIDES: u32 = 8;

/// Highest spell level tracked.
pub const MAX_SPELL_LEVEL: u8 = 9;

/// Threshold for the level after one with `threshold`: ×1.5, truncated.
pub fn next_threshold(threshold: u32) -> u32 {
    (threshold as u64 * 3 / 2).min(u32::MAX as u64) as u32
}

/// Where a character is in stat initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StatStage {
    #[default]
    Unrolled,
    Rolled,
    RaciallyAdjusted,
}

impl fmt::Display for StatStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatStage::Unrolled => "not rolled",
            StatStage::Rolled => "rolled",
            StatStage::RaciallyAdjusted => "racially adjusted",
        };
        write!(f, "{label}")
    }
}

/// Remaining and maximum spell slots for levels 0 through 9.
///
/// Level 0 (cantrips) is never consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSlots {
    current: [u32; 10],
    maximum: [u32; 10],
}

impl SpellSlots {
    /// Slots of a new level 1 character.
    pub fn starting() -> Self {
        let mut maximum = [0; 10];
        maximum[0] = 1;
        maximum[1] = 2;
        Self {
            current: maximum,
            maximum,
        }
    }

    fn index(level: u8) -> Option<usize> {
        (level <= MAX_SPELL_LEVEL).then_some(level as usize)
    }

    /// Remaining slots at `level`, or 0 for untracked levels.
    pub fn remaining(&self, level: u8) -> u32 {
        Self::index(level).map_or(0, |i| self.current[i])
    }

    /// Maximum slots at `level`, or 0 for untracked levels.
    pub fn maximum(&self, level: u8) -> u32 {
        Self::index(level).map_or(0, |i| self.maximum[i])
    }

    /// Raise or lower the capacity of one level. Does not refill.
    pub fn set_maximum(&mut self, level: u8, maximum: u32) {
        if let Some(i) = Self::index(level) {
            self.maximum[i] = maximum;
            self.current[i] = self.current[i].min(maximum);
        }
    }

    pub fn can_cast(&self, level: u8) -> bool {
        self.remaining(level) > 0
    }

    /// Consume a slot of `level` if one is available.
    ///
    /// Cantrips succeed without being consumed. Returns whether the cast may
    /// go ahead; nothing changes when it returns `false`.
    pub fn use_slot(&mut self, level: u8) -> bool {
        if !self.can_cast(level) {
            return false;
        }
        if level > 0 {
            self.current[level as usize] -= 1;
        }
        true
    }

    pub fn refill(&mut self) {
        self.current = self.maximum;
    }

    /// `(level, remaining, maximum)` for every level with capacity.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32, u32)> + '_ {
        (0..=MAX_SPELL_LEVEL)
            .map(move |level| (level, self.remaining(level), self.maximum(level)))
            .filter(|(_, _, max)| *max > 0)
    }
}

impl Default for SpellSlots {
    fn default() -> Self {
        Self::starting()
    }
}

/// Apply the slot capacity rules for a character of `level`.
pub fn apply_slot_progression(slots: &mut SpellSlots, level: u32) {
    if level >= 2 {
        slots.set_maximum(1, 3);
    }
    if level >= 3 {
        slots.set_maximum(2, 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_growth() {
        assert_eq!(next_threshold(100), 150);
        assert_eq!(next_threshold(150), 225);
        assert_eq!(next_threshold(225), 337);
    }

    #[test]
    fn test_starting_slots() {
        let slots = SpellSlots::starting();
        assert_eq!(slots.maximum(0), 1);
        assert_eq!(slots.maximum(1), 2);
        assert_eq!(slots.maximum(2), 0);
        assert!(slots.can_cast(0));
        assert!(slots.can_cast(1));
        assert!(!slots.can_cast(2));
        assert!(!slots.can_cast(10));
    }

    #[test]
    fn test_use_slot_decrements_by_one() {
        let mut slots = SpellSlots::starting();
        assert!(slots.use_slot(1));
        assert_eq!(slots.remaining(1), 1);
        assert!(slots.use_slot(1));
        assert_eq!(slots.remaining(1), 0);
    }

    #[test]
    fn test_use_slot_when_empty_changes_nothing() {
        let mut slots = SpellSlots::starting();
        slots.use_slot(1);
        slots.use_slot(1);
        let before = slots.clone();
        assert!(!slots.use_slot(1));
        assert_eq!(slots, before);
    }

    #[test]
    fn test_cantrips_are_never_consumed() {
        let mut slots = SpellSlots::starting();
        for _ in 0..50 {
            assert!(slots.use_slot(0));
        }
        assert_eq!(slots.remaining(0), 1);
    }

    #[test]
    fn test_untracked_level_is_rejected() {
        let mut slots = SpellSlots::starting();
        assert!(!slots.use_slot(12));
    }

    #[test]
    fn test_slot_progression() {
        let mut slots = SpellSlots::starting();
        apply_slot_progression(&mut slots, 2);
        assert_eq!(slots.maximum(1), 3);
        assert_eq!(slots.maximum(2), 0);

        apply_slot_progression(&mut slots, 3);
        assert_eq!(slots.maximum(2), 2);

        slots.refill();
        assert_eq!(slots.remaining(1), 3);
        assert_eq!(slots.remaining(2), 2);
    }

    #[test]
    fn test_iter_skips_empty_levels() {
        let levels: Vec<u8> = SpellSlots::starting().iter().map(|(l, _, _)| l).collect();
        assert_eq!(levels, vec![0, 1]);
    }
}
