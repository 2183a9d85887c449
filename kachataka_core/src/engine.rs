use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    config::GameConfig,
    crash::{cash_out_wins, crash_multiplier},
    dice::{dice_multiplier, dice_wins, generate_dice_result, DiceRoll, Direction},
    error::{EngineError, EngineResult},
    mines::{generate_mine_positions, mines_multiplier, reveal},
    seed::{verify_result, Verification},
    slots::{evaluate_payout, spin_grid, SlotGrid},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Game {
    Crash,
    Mines,
    Dice,
    Slots,
}

impl Game {
    pub fn as_str(self) -> &'static str {
        match self {
            Game::Crash => "crash",
            Game::Mines => "mines",
            Game::Dice => "dice",
            Game::Slots => "slots",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Game {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crash" => Ok(Game::Crash),
            "mines" => Ok(Game::Mines),
            "dice" => Ok(Game::Dice),
            "slots" | "slot" => Ok(Game::Slots),
            other => Err(format!("unknown game: {other}")),
        }
    }
}

/// What the player committed to before the round resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Wager {
    /// Automatic cash-out target.
    Crash { cash_out: f64 },
    /// Tiles revealed in order before cashing out.
    Mines { mine_count: usize, picks: Vec<u8> },
    Dice { threshold: f64, direction: Direction },
    Slots,
}

impl Wager {
    pub fn game(&self) -> Game {
        match self {
            Wager::Crash { .. } => Game::Crash,
            Wager::Mines { .. } => Game::Mines,
            Wager::Dice { .. } => Game::Dice,
            Wager::Slots => Game::Slots,
        }
    }

    pub fn draw(&self) -> Draw {
        match self {
            Wager::Crash { .. } => Draw::Crash,
            Wager::Mines { mine_count, .. } => Draw::Mines {
                mine_count: *mine_count,
            },
            Wager::Dice { .. } => Draw::Dice,
            Wager::Slots => Draw::Slots,
        }
    }
}

/// Provably-fair draw for one round, keyed by game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", rename_all = "snake_case")]
pub enum Outcome {
    Crash { crash_point: f64 },
    Mines { grid_size: usize, mines: BTreeSet<u8> },
    Dice { roll: DiceRoll },
    Slots { grid: SlotGrid },
}

impl Outcome {
    pub fn game(&self) -> Game {
        match self {
            Outcome::Crash { .. } => Game::Crash,
            Outcome::Mines { .. } => Game::Mines,
            Outcome::Dice { .. } => Game::Dice,
            Outcome::Slots { .. } => Game::Slots,
        }
    }

    /// Rebuilds the draw request, so a stored outcome can be re-derived.
    pub fn draw(&self) -> Draw {
        match self {
            Outcome::Crash { .. } => Draw::Crash,
            Outcome::Mines { mines, .. } => Draw::Mines {
                mine_count: mines.len(),
            },
            Outcome::Dice { .. } => Draw::Dice,
            Outcome::Slots { .. } => Draw::Slots,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    pub game: Game,
    pub outcome: Outcome,
    /// Zero on a loss.
    pub multiplier: f64,
    pub win_amount: f64,
}

impl RoundResult {
    /// True only when the round returns more than the stake.
    pub fn is_win(&self) -> bool {
        self.multiplier > 1.0
    }
}

/// Which draw a round needs; everything else about the wager only affects settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    Crash,
    Mines { mine_count: usize },
    Dice,
    Slots,
}

/// Derives the provably-fair outcome for a round, without settling anything.
pub fn derive_outcome(
    server_seed: &str,
    round_id: &str,
    config: &GameConfig,
    draw: Draw,
) -> EngineResult<Outcome> {
    match draw {
        Draw::Crash => Ok(Outcome::Crash {
            crash_point: crash_multiplier(server_seed, round_id, &config.crash)?,
        }),
        Draw::Mines { mine_count } => {
            config.mines.validate()?;
            config.mines.check_mine_count(mine_count)?;
            let mines = generate_mine_positions(
                server_seed,
                round_id,
                config.mines.grid_size,
                mine_count,
                config.mines.shuffle,
            )?;
            Ok(Outcome::Mines {
                grid_size: config.mines.grid_size,
                mines,
            })
        }
        Draw::Dice => Ok(Outcome::Dice {
            roll: generate_dice_result(server_seed, round_id),
        }),
        Draw::Slots => Ok(Outcome::Slots {
            grid: spin_grid(server_seed, round_id, &config.slots)?,
        }),
    }
}

fn settle(config: &GameConfig, wager: &Wager, outcome: &Outcome, bet: f64) -> EngineResult<f64> {
    let multiplier = match (wager, outcome) {
        (Wager::Crash { cash_out }, Outcome::Crash { crash_point }) => {
            if cash_out_wins(*cash_out, *crash_point) {
                *cash_out
            } else {
                0.0
            }
        }
        (Wager::Mines { mine_count, picks }, Outcome::Mines { grid_size, mines }) => {
            if reveal(mines, picks, *grid_size)? {
                mines_multiplier(picks.len(), *mine_count, *grid_size)?
            } else {
                0.0
            }
        }
        (
            Wager::Dice {
                threshold,
                direction,
            },
            Outcome::Dice { roll },
        ) => {
            let multiplier = dice_multiplier(*threshold, *direction, config.dice.house_edge)?;
            if dice_wins(*roll, *threshold, *direction) {
                multiplier
            } else {
                0.0
            }
        }
        (Wager::Slots, Outcome::Slots { grid }) => {
            evaluate_payout(grid, &config.slots.paytable, bet).total / bet
        }
        _ => unreachable!("outcome derived for a different game"),
    };
    Ok(multiplier)
}

fn check_wager(config: &GameConfig, wager: &Wager, bet: f64) -> EngineResult<()> {
    if !(bet > 0.0 && bet.is_finite()) {
        return Err(EngineError::InvalidBet(bet));
    }
    match wager {
        Wager::Crash { cash_out } => {
            if !(*cash_out >= 1.0 && cash_out.is_finite()) {
                return Err(EngineError::InvalidCashOut(*cash_out));
            }
            match config.crash.max_multiplier {
                Some(cap) if *cash_out > cap => Err(EngineError::CashOutAboveCap {
                    cash_out: *cash_out,
                    cap,
                }),
                _ => Ok(()),
            }
        }
        Wager::Mines { picks, .. } if picks.is_empty() => Err(EngineError::NoPicks),
        Wager::Dice { threshold, .. } => config.dice.check_threshold(*threshold),
        _ => Ok(()),
    }
}

/// Resolves one round: derive the outcome, then settle the wager against it.
pub fn play_round(
    server_seed: &str,
    round_id: &str,
    config: &GameConfig,
    wager: &Wager,
    bet: f64,
) -> EngineResult<RoundResult> {
    check_wager(config, wager, bet)?;
    let outcome = derive_outcome(server_seed, round_id, config, wager.draw())?;
    let multiplier = settle(config, wager, &outcome, bet)?;
    let win_amount = bet * multiplier;
    debug!(
        game = %wager.game(),
        round_id,
        multiplier,
        win_amount,
        "settled round"
    );
    Ok(RoundResult {
        game: wager.game(),
        outcome,
        multiplier,
        win_amount,
    })
}

/// Audits a finished round from its revealed seed.
///
/// The commitment is checked first; only a matching seed is then used to
/// re-derive the outcome and compare it with what the player was shown.
pub fn verify_round(
    server_seed: &str,
    published_hash: &str,
    round_id: &str,
    config: &GameConfig,
    shown: &Outcome,
) -> EngineResult<Verification> {
    if !verify_result(server_seed, published_hash) {
        return Ok(Verification::CommitmentMismatch);
    }
    let derived = derive_outcome(server_seed, round_id, config, shown.draw())?;
    if &derived != shown {
        warn!(round_id, game = %shown.game(), "revealed seed does not reproduce outcome");
        return Ok(Verification::OutcomeMismatch);
    }
    Ok(Verification::Verified)
}
