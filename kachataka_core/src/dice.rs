use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::validate_house_edge;
use crate::error::{EngineError, EngineResult};
use crate::math::floor_cents;
use crate::rng::{RoundRng, INT_HEX_CHARS};

/// Number of distinct rolls, 0.00 through 100.00.
pub const ROLL_OUTCOMES: u64 = 10_001;

/// Dice roll in hundredths, so 7324 reads as 73.24.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct DiceRoll(u16);

impl DiceRoll {
    pub const MAX: DiceRoll = DiceRoll(10_000);

    pub fn from_hundredths(hundredths: u16) -> Option<Self> {
        (hundredths <= Self::MAX.0).then_some(Self(hundredths))
    }

    pub fn hundredths(self) -> u16 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 100.0
    }
}

impl From<DiceRoll> for f64 {
    fn from(roll: DiceRoll) -> Self {
        roll.value()
    }
}

impl TryFrom<f64> for DiceRoll {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        let hundredths = (value * 100.0).round();
        if !(0.0..=10_000.0).contains(&hundredths) {
            return Err(format!("dice roll {value} outside 0.00..=100.00"));
        }
        Ok(Self(hundredths as u16))
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Over,
    Under,
}

/// Rolls the dice from the `round_id:dice` HMAC.
///
/// The leading 8 hex characters reduced modulo 10001 give the roll in
/// hundredths.
pub fn generate_dice_result(server_seed: &str, round_id: &str) -> DiceRoll {
    let num = RoundRng::new(server_seed, round_id).int(Some("dice"), INT_HEX_CHARS);
    let roll = DiceRoll((num % ROLL_OUTCOMES) as u16);
    debug!(round_id, %roll, "rolled dice");
    roll
}

pub fn win_probability(threshold: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Over => (100.0 - threshold) / 100.0,
        Direction::Under => threshold / 100.0,
    }
}

/// Payout multiplier for a threshold bet: `(1 / p) * (1 - house_edge)`,
/// truncated to cents.
pub fn dice_multiplier(threshold: f64, direction: Direction, house_edge: f64) -> EngineResult<f64> {
    validate_house_edge(house_edge)?;
    let p = win_probability(threshold, direction);
    if p > 1.0 {
        return Err(EngineError::WinProbabilityAboveOne { threshold });
    }
    if !(p > 0.0) {
        return Err(EngineError::ZeroWinProbability { threshold });
    }
    Ok(floor_cents((1.0 / p) * (1.0 - house_edge)))
}

/// Strict comparison: a roll equal to the threshold loses both ways.
pub fn dice_wins(roll: DiceRoll, threshold: f64, direction: Direction) -> bool {
    match direction {
        Direction::Over => roll.value() > threshold,
        Direction::Under => roll.value() < threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "3f1c9a7e5b2d4c8a0e6f1b3d5a7c9e2f4b6d8a0c1e3f5a7b9d2c4e6f8a1b3c5d";

    #[test]
    fn reference_rolls() {
        assert_eq!(generate_dice_result(SEED, "round-42").hundredths(), 7324);
        assert_eq!(generate_dice_result(SEED, "1").hundredths(), 9990);
        assert_eq!(generate_dice_result(SEED, "2").to_string(), "13.64");
    }

    #[test]
    fn symmetric_at_even_odds() {
        let over = dice_multiplier(50.0, Direction::Over, 0.0).unwrap();
        let under = dice_multiplier(50.0, Direction::Under, 0.0).unwrap();
        assert_eq!(over, under);
        assert_eq!(over, 2.0);
        assert_eq!(dice_multiplier(50.0, Direction::Over, 0.02), Ok(1.96));
    }

    #[test]
    fn long_shot_under_two() {
        assert_eq!(dice_multiplier(2.0, Direction::Under, 0.02), Ok(49.0));
        assert_eq!(dice_multiplier(98.0, Direction::Over, 0.02), Ok(49.0));
    }

    #[test]
    fn degenerate_thresholds_fail() {
        assert_eq!(
            dice_multiplier(0.0, Direction::Under, 0.02),
            Err(EngineError::ZeroWinProbability { threshold: 0.0 })
        );
        assert_eq!(
            dice_multiplier(100.0, Direction::Over, 0.02),
            Err(EngineError::ZeroWinProbability { threshold: 100.0 })
        );
        assert_eq!(
            dice_multiplier(120.0, Direction::Under, 0.02),
            Err(EngineError::WinProbabilityAboveOne { threshold: 120.0 })
        );
        assert_eq!(
            dice_multiplier(-5.0, Direction::Over, 0.02),
            Err(EngineError::WinProbabilityAboveOne { threshold: -5.0 })
        );
    }

    #[test]
    fn roll_equal_to_threshold_loses() {
        let roll = DiceRoll::from_hundredths(5000).unwrap();
        assert!(!dice_wins(roll, 50.0, Direction::Over));
        assert!(!dice_wins(roll, 50.0, Direction::Under));
        assert!(dice_wins(roll, 49.99, Direction::Over));
    }

    #[test]
    fn roll_serializes_as_number() {
        let roll = DiceRoll::from_hundredths(7324).unwrap();
        assert_eq!(serde_json::to_string(&roll).unwrap(), "73.24");
        let back: DiceRoll = serde_json::from_str("73.24").unwrap();
        assert_eq!(back, roll);
        assert!(serde_json::from_str::<DiceRoll>("100.01").is_err());
        assert!(DiceRoll::from_hundredths(10_001).is_none());
    }
}
