//! Tunable per-game parameters.
//!
//! House edge and RTP settings only enter the payout formulas; the raw
//! HMAC draws never depend on them.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::paytable::Paytable;
use crate::symbols::ReelConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub crash: CrashConfig,
    pub dice: DiceConfig,
    pub mines: MinesConfig,
    pub slots: SlotsConfig,
}

impl GameConfig {
    pub fn validate(&self) -> EngineResult<()> {
        self.crash.validate()?;
        self.dice.validate()?;
        self.mines.validate()?;
        self.slots.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CrashConfig {
    pub house_factor: f64,
    /// Settlement cap; `None` leaves the multiplier unbounded.
    pub max_multiplier: Option<f64>,
    /// Growth constant `k` of the display curve `e^(k*t)`, per second.
    pub growth_rate: f64,
}

impl Default for CrashConfig {
    fn default() -> Self {
        Self {
            house_factor: 0.97,
            max_multiplier: Some(100.0),
            growth_rate: 0.06,
        }
    }
}

impl CrashConfig {
    pub fn validate(&self) -> EngineResult<()> {
        validate_house_factor(self.house_factor)?;
        if let Some(cap) = self.max_multiplier {
            if !(cap >= 1.0) {
                return Err(EngineError::InvalidCrashCap(cap));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiceConfig {
    pub house_edge: f64,
    pub min_threshold: f64,
    pub max_threshold: f64,
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            house_edge: 0.02,
            min_threshold: 2.0,
            max_threshold: 98.0,
        }
    }
}

impl DiceConfig {
    pub fn validate(&self) -> EngineResult<()> {
        validate_house_edge(self.house_edge)?;
        for threshold in [self.min_threshold, self.max_threshold] {
            if !(threshold > 0.0 && threshold < 100.0) {
                return Err(EngineError::ThresholdOutOfRange {
                    threshold,
                    min: 0.0,
                    max: 100.0,
                });
            }
        }
        if self.min_threshold > self.max_threshold {
            return Err(EngineError::ThresholdOutOfRange {
                threshold: self.min_threshold,
                min: 0.0,
                max: self.max_threshold,
            });
        }
        Ok(())
    }

    pub fn check_threshold(&self, threshold: f64) -> EngineResult<()> {
        if !(threshold >= self.min_threshold && threshold <= self.max_threshold) {
            return Err(EngineError::ThresholdOutOfRange {
                threshold,
                min: self.min_threshold,
                max: self.max_threshold,
            });
        }
        Ok(())
    }
}

/// How the mines layout is shuffled from the round's HMAC.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleMode {
    /// Fisher-Yates driven by a 233280-period LCG seeded from one digest.
    #[default]
    Lcg,
    /// Fisher-Yates with a fresh HMAC draw per swap.
    HmacCounter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MinesConfig {
    pub grid_size: usize,
    pub min_mines: usize,
    pub max_mines: usize,
    pub shuffle: ShuffleMode,
}

impl Default for MinesConfig {
    fn default() -> Self {
        Self {
            grid_size: 5,
            min_mines: 1,
            max_mines: 24,
            shuffle: ShuffleMode::Lcg,
        }
    }
}

impl MinesConfig {
    pub fn cells(&self) -> usize {
        self.grid_size * self.grid_size
    }

    pub fn validate(&self) -> EngineResult<()> {
        crate::mines::check_grid_size(self.grid_size)?;
        let cells = self.cells();
        if self.min_mines == 0 || self.min_mines > self.max_mines || self.max_mines >= cells {
            return Err(EngineError::InvalidMineCount {
                mine_count: self.max_mines,
                min: 1,
                max: cells - 1,
                cells,
            });
        }
        Ok(())
    }

    pub fn check_mine_count(&self, mine_count: usize) -> EngineResult<()> {
        if mine_count < self.min_mines || mine_count > self.max_mines {
            return Err(EngineError::InvalidMineCount {
                mine_count,
                min: self.min_mines,
                max: self.max_mines,
                cells: self.cells(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlotsConfig {
    pub rows: usize,
    pub cols: usize,
    /// One table per grid cell, row-major.
    pub reels: Vec<ReelConfig>,
    pub paytable: Paytable,
    /// Advertised return to player; informational only.
    pub rtp: f64,
}

impl Default for SlotsConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            reels: vec![ReelConfig::default_table(); 9],
            paytable: Paytable::simple_default(),
            rtp: 0.87,
        }
    }
}

impl SlotsConfig {
    pub fn validate(&self) -> EngineResult<()> {
        let cells = self.rows * self.cols;
        if cells == 0 || self.reels.len() != cells {
            return Err(EngineError::ReelCountMismatch {
                rows: self.rows,
                cols: self.cols,
                cells,
                reels: self.reels.len(),
            });
        }
        for (i, reel) in self.reels.iter().enumerate() {
            if reel.total_weight() == 0 {
                return Err(EngineError::EmptyReel(i));
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_house_factor(house_factor: f64) -> EngineResult<()> {
    if !(house_factor > 0.0 && house_factor <= 1.0) {
        return Err(EngineError::InvalidHouseFactor(house_factor));
    }
    Ok(())
}

pub(crate) fn validate_house_edge(house_edge: f64) -> EngineResult<()> {
    if !(house_edge >= 0.0 && house_edge < 1.0) {
        return Err(EngineError::InvalidHouseEdge(house_edge));
    }
    Ok(())
}
