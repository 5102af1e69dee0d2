//! Dice rolling.
//!
//! Every roll in the engine goes through a [`DiceSource`], which callers hand
//! in explicitly. Production code uses [`RngDice`] over a `rand` generator;
//! tests substitute [`crate::testing::ScriptedDice`] to force exact results.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source of uniformly distributed die results.
pub trait DiceSource {
    /// Draw a single die with `sides` faces, in `1..=sides`. A die with no
    /// faces draws 0.
    fn draw(&mut self, sides: u32) -> u32;

    /// Roll `count` dice with `sides` faces and return the sum.
    fn roll(&mut self, sides: u32, count: u32) -> u32 {
        (0..count).map(|_| self.draw(sides)).sum()
    }
}

impl<D: DiceSource + ?Sized> DiceSource for Box<D> {
    fn draw(&mut self, sides: u32) -> u32 {
        (**self).draw(sides)
    }
}

/// Dice backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngDice<R> {
    rng: R,
}

impl<R: Rng> RngDice<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngDice<ThreadRng> {
    /// Dice drawn from the thread-local generator.
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl RngDice<StdRng> {
    /// Reproducible dice: the same seed always yields the same rolls.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> DiceSource for RngDice<R> {
    fn draw(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.rng.gen_range(1..=sides)
    }
}

/// A fixed dice expression such as `2d6+2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    pub count: u32,
    pub sides: u32,
    pub bonus: i32,
}

impl DiceRoll {
    pub const fn new(count: u32, sides: u32) -> Self {
        Self {
            count,
            sides,
            bonus: 0,
        }
    }

    pub const fn with_bonus(mut self, bonus: i32) -> Self {
        self.bonus = bonus;
        self
    }

    /// Roll the dice and add the flat bonus.
    pub fn roll_with(&self, dice: &mut dyn DiceSource) -> i32 {
        dice.roll(self.sides, self.count) as i32 + self.bonus
    }

    /// Lowest possible result.
    pub fn min(&self) -> i32 {
        self.count as i32 + self.bonus
    }

    /// Highest possible result.
    pub fn max(&self) -> i32 {
        (self.count * self.sides) as i32 + self.bonus
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.bonus {
            0 => Ok(()),
            b if b > 0 => write!(f, "+{b}"),
            b => write!(f, "{b}"),
        }
    }
}
