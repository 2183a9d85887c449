pub mod config;
pub mod crash;
pub mod dice;
pub mod engine;
pub mod error;
pub mod math;
pub mod mines;
pub mod paytable;
pub mod rng;
pub mod seed;
pub mod slots;
pub mod symbols;

pub use crate::config::{
    CrashConfig, DiceConfig, GameConfig, MinesConfig, ShuffleMode, SlotsConfig,
};
pub use crate::crash::{crash_multiplier, crash_point, display_multiplier, time_to_reach};
pub use crate::dice::{dice_multiplier, generate_dice_result, DiceRoll, Direction};
pub use crate::engine::{
    derive_outcome, play_round, verify_round, Draw, Game, Outcome, RoundResult, Wager,
};
pub use crate::error::{EngineError, EngineResult};
pub use crate::mines::{generate_mine_positions, mines_multiplier, MAX_GRID_SIZE};
pub use crate::paytable::{Paytable, PaytableEntry};
pub use crate::rng::{hex_to_float, hmac_sha256_hex, sha256_hex, RoundRng};
pub use crate::seed::{verify_result, SeedCommitment, ServerSeed, Verification};
pub use crate::slots::{
    evaluate_payout, generate_slot_result, spin_grid, theoretical_rtp, SlotGrid, SlotPayout,
};
pub use crate::symbols::{ReelConfig, Symbol, WeightedSymbol};
