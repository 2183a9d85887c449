use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SlotsConfig;
use crate::error::{EngineError, EngineResult};
use crate::paytable::Paytable;
use crate::rng::{RoundRng, INT_HEX_CHARS};
use crate::symbols::{ReelConfig, Symbol};

/// Draws one symbol per reel; reel `i` uses the `round_id:slot:i` HMAC.
pub fn generate_slot_result(
    server_seed: &str,
    round_id: &str,
    reels: &[ReelConfig],
) -> EngineResult<Vec<Symbol>> {
    let rng = RoundRng::new(server_seed, round_id);
    reels
        .iter()
        .enumerate()
        .map(|(i, reel)| {
            let total = reel.total_weight();
            if total == 0 {
                return Err(EngineError::EmptyReel(i));
            }
            let num = rng.int(Some(&format!("slot:{i}")), INT_HEX_CHARS);
            reel.pick(num % total).ok_or(EngineError::EmptyReel(i))
        })
        .collect()
}

/// Visible symbols, stored row-major.
///
/// Always holds exactly `rows * cols` symbols with both dimensions non-zero;
/// deserialization goes through the same check as [`SlotGrid::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSlotGrid")]
pub struct SlotGrid {
    rows: usize,
    cols: usize,
    symbols: Vec<Symbol>,
}

#[derive(Deserialize)]
struct RawSlotGrid {
    rows: usize,
    cols: usize,
    symbols: Vec<Symbol>,
}

impl TryFrom<RawSlotGrid> for SlotGrid {
    type Error = EngineError;

    fn try_from(raw: RawSlotGrid) -> EngineResult<Self> {
        SlotGrid::new(raw.rows, raw.cols, raw.symbols)
    }
}

impl SlotGrid {
    pub fn new(rows: usize, cols: usize, symbols: Vec<Symbol>) -> EngineResult<Self> {
        if rows == 0 || cols == 0 || rows.checked_mul(cols) != Some(symbols.len()) {
            return Err(EngineError::InvalidSlotGrid {
                rows,
                cols,
                symbols: symbols.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            symbols,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

/// Fills the configured grid, one reel table per cell.
pub fn spin_grid(server_seed: &str, round_id: &str, config: &SlotsConfig) -> EngineResult<SlotGrid> {
    config.validate()?;
    let symbols = generate_slot_result(server_seed, round_id, &config.reels)?;
    debug!(round_id, ?symbols, "spun slot grid");
    SlotGrid::new(config.rows, config.cols, symbols)
}

/// Cell indices of every payline: each row, then both diagonals on square grids.
pub fn paylines(rows: usize, cols: usize) -> Vec<Vec<usize>> {
    let mut lines: Vec<Vec<usize>> = (0..rows)
        .map(|r| (0..cols).map(|c| r * cols + c).collect())
        .collect();
    if rows == cols && rows > 1 {
        lines.push((0..rows).map(|i| i * cols + i).collect());
        lines.push((0..rows).map(|i| i * cols + (cols - 1 - i)).collect());
    }
    lines
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineWin {
    pub line: usize,
    pub symbol: Symbol,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotPayout {
    pub lines: Vec<LineWin>,
    pub total: f64,
}

/// Pays `bet * value` for every line of identical symbols; wins stack.
pub fn evaluate_payout(grid: &SlotGrid, paytable: &Paytable, bet: f64) -> SlotPayout {
    let mut lines = Vec::new();
    for (idx, cells) in paylines(grid.rows, grid.cols).iter().enumerate() {
        let mut line = cells.iter().map(|&c| grid.symbols.get(c));
        let Some(Some(first)) = line.next() else {
            continue;
        };
        if line.all(|s| s == Some(first)) {
            let value = paytable.value_of(*first);
            if value > 0.0 {
                lines.push(LineWin {
                    line: idx,
                    symbol: *first,
                    amount: bet * value,
                });
            }
        }
    }
    let total = lines.iter().map(|l| l.amount).sum();
    SlotPayout { lines, total }
}

/// Expected return per unit bet implied by the reel weights and paytable.
pub fn theoretical_rtp(config: &SlotsConfig) -> EngineResult<f64> {
    config.validate()?;
    let mut rtp = 0.0;
    for cells in paylines(config.rows, config.cols) {
        for entry in &config.paytable.0 {
            let p: f64 = cells
                .iter()
                .map(|&c| config.reels[c].probability(entry.symbol))
                .product();
            rtp += p * entry.value;
        }
    }
    Ok(rtp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbol::*;

    const SEED: &str = "3f1c9a7e5b2d4c8a0e6f1b3d5a7c9e2f4b6d8a0c1e3f5a7b9d2c4e6f8a1b3c5d";

    #[test]
    fn reference_grid() {
        let grid = spin_grid(SEED, "round-42", &SlotsConfig::default()).unwrap();
        assert_eq!(
            grid.symbols(),
            [Bell, Cherry, Lemon, Grape, Cherry, Cherry, Cherry, Bell, Cherry]
        );
        let payout = evaluate_payout(&grid, &Paytable::simple_default(), 100.0);
        assert_eq!(payout.total, 0.0);
        assert!(payout.lines.is_empty());
    }

    #[test]
    fn middle_row_cherries_pay_double() {
        let grid = SlotGrid::new(
            3,
            3,
            vec![Lemon, Bell, Seven, Cherry, Cherry, Cherry, Grape, Orange, Lemon],
        )
        .unwrap();
        let payout = evaluate_payout(&grid, &Paytable::simple_default(), 100.0);
        assert_eq!(payout.total, 200.0);
        assert_eq!(
            payout.lines,
            vec![LineWin {
                line: 1,
                symbol: Cherry,
                amount: 200.0
            }]
        );
    }

    #[test]
    fn lines_stack_additively() {
        let grid = SlotGrid::new(3, 3, vec![Seven; 9]).unwrap();
        let payout = evaluate_payout(&grid, &Paytable::simple_default(), 1.0);
        assert_eq!(payout.lines.len(), 5);
        assert_eq!(payout.total, 250.0);
    }

    #[test]
    fn malformed_grids_are_rejected() {
        assert_eq!(
            SlotGrid::new(3, 0, vec![]),
            Err(EngineError::InvalidSlotGrid {
                rows: 3,
                cols: 0,
                symbols: 0
            })
        );
        assert!(SlotGrid::new(3, 3, vec![Cherry; 8]).is_err());

        let short: Result<SlotGrid, _> =
            serde_json::from_str(r#"{"rows":3,"cols":3,"symbols":[]}"#);
        assert!(short.is_err());
        let ok: SlotGrid =
            serde_json::from_str(r#"{"rows":1,"cols":3,"symbols":["Seven","Seven","Seven"]}"#)
                .unwrap();
        assert_eq!(evaluate_payout(&ok, &Paytable::simple_default(), 1.0).total, 50.0);
    }

    #[test]
    fn payline_layout() {
        assert_eq!(
            paylines(3, 3),
            vec![
                vec![0, 1, 2],
                vec![3, 4, 5],
                vec![6, 7, 8],
                vec![0, 4, 8],
                vec![2, 4, 6]
            ]
        );
        assert_eq!(paylines(1, 3), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn empty_reel_is_rejected() {
        let reels = vec![ReelConfig::default_table(), ReelConfig::new(vec![])];
        assert_eq!(
            generate_slot_result(SEED, "1", &reels),
            Err(EngineError::EmptyReel(1))
        );
    }

    #[test]
    fn default_rtp() {
        let rtp = theoretical_rtp(&SlotsConfig::default()).unwrap();
        assert!((rtp - 0.87185).abs() < 1e-9, "rtp={rtp}");
    }
}
