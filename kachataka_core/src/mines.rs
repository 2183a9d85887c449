use std::collections::BTreeSet;

use tracing::debug;

use crate::config::ShuffleMode;
use crate::error::{EngineError, EngineResult};
use crate::math::floor_cents;
use crate::rng::{Lcg, RoundRng, FLOAT_HEX_CHARS};

/// Largest supported board edge.
///
/// Up to 100 cells every reveal raises the multiplier by more than a cent,
/// so the cent-floored table stays strictly increasing.
pub const MAX_GRID_SIZE: usize = 10;

pub fn check_grid_size(grid_size: usize) -> EngineResult<()> {
    if !(2..=MAX_GRID_SIZE).contains(&grid_size) {
        return Err(EngineError::InvalidGridSize(grid_size));
    }
    Ok(())
}

fn check_mine_count(mine_count: usize, cells: usize) -> EngineResult<()> {
    if mine_count == 0 || mine_count >= cells {
        return Err(EngineError::InvalidMineCount {
            mine_count,
            min: 1,
            max: cells - 1,
            cells,
        });
    }
    Ok(())
}

/// Places `mine_count` mines on a `grid_size x grid_size` board.
///
/// One HMAC over `round_id:mines` seeds the shuffle; the first
/// `mine_count` cells of the shuffled board are mined.
pub fn generate_mine_positions(
    server_seed: &str,
    round_id: &str,
    grid_size: usize,
    mine_count: usize,
    mode: ShuffleMode,
) -> EngineResult<BTreeSet<u8>> {
    check_grid_size(grid_size)?;
    let cells = grid_size * grid_size;
    check_mine_count(mine_count, cells)?;

    let rng = RoundRng::new(server_seed, round_id);
    let mut board: Vec<u8> = (0..cells).map(|c| c as u8).collect();
    match mode {
        ShuffleMode::Lcg => {
            let mut lcg = Lcg::new(rng.int(Some("mines"), FLOAT_HEX_CHARS));
            for i in (1..cells).rev() {
                let j = (lcg.next_float() * (i + 1) as f64).floor() as usize;
                board.swap(i, j);
            }
        }
        ShuffleMode::HmacCounter => {
            for i in (1..cells).rev() {
                let draw = rng.int(Some(&format!("mines:{i}")), FLOAT_HEX_CHARS);
                let j = (draw % (i as u64 + 1)) as usize;
                board.swap(i, j);
            }
        }
    }

    let mines: BTreeSet<u8> = board.into_iter().take(mine_count).collect();
    debug!(round_id, ?mode, ?mines, "placed mines");
    Ok(mines)
}

/// Fair payout after `opened_tiles` consecutive safe reveals.
///
/// Compounds `(cells - i) / (safe - i)` for each reveal and truncates to cents.
pub fn mines_multiplier(
    opened_tiles: usize,
    total_mines: usize,
    grid_size: usize,
) -> EngineResult<f64> {
    check_grid_size(grid_size)?;
    let cells = grid_size * grid_size;
    check_mine_count(total_mines, cells)?;
    let safe = cells - total_mines;
    if opened_tiles > safe {
        return Err(EngineError::TooManyReveals {
            opened: opened_tiles,
            safe,
        });
    }
    let multiplier = (0..opened_tiles).fold(1.0f64, |acc, i| {
        acc * ((cells - i) as f64 / (safe - i) as f64)
    });
    Ok(floor_cents(multiplier))
}

/// Checks a reveal sequence and reports whether it stayed clear of mines.
pub fn reveal(mines: &BTreeSet<u8>, picks: &[u8], grid_size: usize) -> EngineResult<bool> {
    check_grid_size(grid_size)?;
    let cells = grid_size * grid_size;
    let mut seen = BTreeSet::new();
    for &pick in picks {
        if usize::from(pick) >= cells {
            return Err(EngineError::PickOutOfRange { pick, cells });
        }
        if !seen.insert(pick) {
            return Err(EngineError::DuplicatePick(pick));
        }
    }
    Ok(picks.iter().all(|p| !mines.contains(p)))
}
