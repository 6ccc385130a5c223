//! Random draws that resolve a single transition.
//!
//! A draw is an integer uniformly distributed in `[1, 100]`. Sources are
//! injected into the simulation so tests can replay a fixed sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest valid draw.
pub const DRAW_MIN: u8 = 1;
/// Largest valid draw.
pub const DRAW_MAX: u8 = 100;

/// A single draw in `[1, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Draw(u8);

impl Draw {
    /// Returns `None` for values outside `[1, 100]`.
    ///
    /// ```rust
    /// use markov_walk::core::Draw;
    ///
    /// assert!(Draw::new(1).is_some());
    /// assert!(Draw::new(100).is_some());
    /// assert!(Draw::new(0).is_none());
    /// assert!(Draw::new(101).is_none());
    /// ```
    pub fn new(value: u8) -> Option<Self> {
        (DRAW_MIN..=DRAW_MAX).contains(&value).then_some(Self(value))
    }

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(DRAW_MIN as i64, DRAW_MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Draw {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Draw::new(value).ok_or_else(|| format!("draw {value} outside [1, 100]"))
    }
}

impl From<Draw> for u8 {
    fn from(draw: Draw) -> Self {
        draw.0
    }
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of draws for the simulation.
pub trait DrawSource: Send {
    fn draw(&mut self) -> Draw;
}

/// Uniform draws from a seedable `StdRng`.
pub struct SeededDraws {
    rng: StdRng,
}

impl SeededDraws {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl DrawSource for SeededDraws {
    fn draw(&mut self) -> Draw {
        Draw(self.rng.gen_range(DRAW_MIN..=DRAW_MAX))
    }
}

/// Replays a fixed list of draws, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct ScriptedDraws {
    script: Vec<Draw>,
    position: usize,
}

impl ScriptedDraws {
    /// Values are clamped into `[1, 100]`. An empty script always draws 1.
    pub fn new(values: impl IntoIterator<Item = u8>) -> Self {
        Self {
            script: values.into_iter().map(|v| Draw::clamped(v as i64)).collect(),
            position: 0,
        }
    }
}

impl DrawSource for ScriptedDraws {
    fn draw(&mut self) -> Draw {
        let Some(draw) = self.script.get(self.position % self.script.len().max(1)) else {
            return Draw(DRAW_MIN);
        };
        self.position = self.position.wrapping_add(1);
        *draw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_pins_to_bounds() {
        assert_eq!(Draw::clamped(-5).value(), 1);
        assert_eq!(Draw::clamped(0).value(), 1);
        assert_eq!(Draw::clamped(42).value(), 42);
        assert_eq!(Draw::clamped(250).value(), 100);
    }

    #[test]
    fn seeded_draws_stay_in_range() {
        let mut source = SeededDraws::new(7);
        for _ in 0..10_000 {
            let draw = source.draw().value();
            assert!((DRAW_MIN..=DRAW_MAX).contains(&draw));
        }
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let mut a = SeededDraws::new(99);
        let mut b = SeededDraws::new(99);
        let left: Vec<Draw> = (0..50).map(|_| a.draw()).collect();
        let right: Vec<Draw> = (0..50).map(|_| b.draw()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn scripted_draws_cycle() {
        let mut source = ScriptedDraws::new([15, 31, 81]);
        let draws: Vec<u8> = (0..5).map(|_| source.draw().value()).collect();
        assert_eq!(draws, vec![15, 31, 81, 15, 31]);
    }

    #[test]
    fn empty_script_draws_one() {
        let mut source = ScriptedDraws::new(Vec::new());
        assert_eq!(source.draw().value(), 1);
    }

    #[test]
    fn draw_deserialization_rejects_out_of_range() {
        assert!(serde_json::from_str::<Draw>("0").is_err());
        assert_eq!(serde_json::from_str::<Draw>("64").unwrap().value(), 64);
    }
}
