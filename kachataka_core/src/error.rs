use thiserror::Error;

/// Invalid configuration or wager supplied to the engine.
///
/// These are caller bugs rather than runtime conditions, so every check
/// fails fast instead of clamping.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid seed: {0}")]
    InvalidSeed(String),
    #[error("grid size {0} out of range (2..=10)")]
    InvalidGridSize(usize),
    #[error("mine count {mine_count} out of range {min}..={max} for {cells} cells")]
    InvalidMineCount {
        mine_count: usize,
        min: usize,
        max: usize,
        cells: usize,
    },
    #[error("cannot open {opened} tiles with only {safe} safe tiles")]
    TooManyReveals { opened: usize, safe: usize },
    #[error("pick {pick} is outside a grid of {cells} cells")]
    PickOutOfRange { pick: u8, cells: usize },
    #[error("pick {0} was revealed twice")]
    DuplicatePick(u8),
    #[error("mines wager reveals no tiles")]
    NoPicks,
    #[error("dice threshold {threshold} leaves no winning outcome")]
    ZeroWinProbability { threshold: f64 },
    #[error("dice threshold {threshold} gives a win probability above 1")]
    WinProbabilityAboveOne { threshold: f64 },
    #[error("dice threshold {threshold} outside {min}..={max}")]
    ThresholdOutOfRange { threshold: f64, min: f64, max: f64 },
    #[error("house factor {0} must be in (0, 1]")]
    InvalidHouseFactor(f64),
    #[error("house edge {0} must be in [0, 1)")]
    InvalidHouseEdge(f64),
    #[error("crash cap {0} must be at least 1.00")]
    InvalidCrashCap(f64),
    #[error("cash-out target {0} must be at least 1.00")]
    InvalidCashOut(f64),
    #[error("cash-out target {cash_out} exceeds the {cap} crash cap")]
    CashOutAboveCap { cash_out: f64, cap: f64 },
    #[error("reel {0} has no weighted symbols")]
    EmptyReel(usize),
    #[error("slot grid {rows}x{cols} needs {cells} reels, got {reels}")]
    ReelCountMismatch {
        rows: usize,
        cols: usize,
        cells: usize,
        reels: usize,
    },
    #[error("slot grid {rows}x{cols} cannot hold {symbols} symbols")]
    InvalidSlotGrid {
        rows: usize,
        cols: usize,
        symbols: usize,
    },
    #[error("bet amount {0} must be positive and finite")]
    InvalidBet(f64),
}

pub type EngineResult<T> = Result<T, EngineError>;
