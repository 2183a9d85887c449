use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{validate_house_factor, CrashConfig};
use crate::error::EngineResult;
use crate::math::floor_cents;
use crate::rng::RoundRng;

/// Uncapped crash point for a round.
///
/// `r` in `[0, 1)` comes from the bare round-id HMAC; the fair multiplier
/// `1 / (1 - r)` is scaled by `house_factor`, truncated to cents and floored
/// at 1.00. `r == 0` settles at exactly 1.00.
pub fn crash_point(server_seed: &str, round_id: &str, house_factor: f64) -> EngineResult<f64> {
    validate_house_factor(house_factor)?;
    let r = RoundRng::new(server_seed, round_id).float(None);
    if r == 0.0 {
        return Ok(1.0);
    }
    let fair = 1.0 / (1.0 - r);
    let adjusted = fair * house_factor;
    let crash = floor_cents(adjusted).max(1.0);
    debug!(round_id, r, crash, "derived crash point");
    Ok(crash)
}

/// Settlement multiplier: the crash point clipped to the configured cap.
pub fn crash_multiplier(
    server_seed: &str,
    round_id: &str,
    config: &CrashConfig,
) -> EngineResult<f64> {
    config.validate()?;
    let point = crash_point(server_seed, round_id, config.house_factor)?;
    match config.max_multiplier {
        Some(cap) if point > cap => {
            warn!(round_id, point, cap, "crash point clipped to cap");
            Ok(cap)
        }
        _ => Ok(point),
    }
}

/// A cash-out target pays only if the round survives to it.
pub fn cash_out_wins(cash_out: f64, crash: f64) -> bool {
    cash_out <= crash
}

/// Cosmetic multiplier shown `elapsed` into the round: `e^(k*t)`.
///
/// Never used for settlement.
pub fn display_multiplier(elapsed: Duration, growth_rate: f64) -> f64 {
    (growth_rate * elapsed.as_secs_f64()).exp()
}

/// How long the display curve takes to reach `multiplier`.
pub fn time_to_reach(multiplier: f64, growth_rate: f64) -> Duration {
    if multiplier <= 1.0 || growth_rate <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(multiplier.ln() / growth_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    const ZERO_SEED: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    #[test]
    fn zero_seed_reference() {
        assert_eq!(crash_point(ZERO_SEED, "1", 0.97), Ok(1.91));
    }

    #[test]
    fn house_factor_scales_payout() {
        let fair = crash_point(ZERO_SEED, "1", 1.0).unwrap();
        let edged = crash_point(ZERO_SEED, "1", 0.97).unwrap();
        assert!(edged <= fair);
    }

    #[test]
    fn cap_clips_settlement() {
        let config = CrashConfig {
            max_multiplier: Some(1.5),
            ..CrashConfig::default()
        };
        assert_eq!(crash_multiplier(ZERO_SEED, "1", &config), Ok(1.5));
        let uncapped = CrashConfig {
            max_multiplier: None,
            ..CrashConfig::default()
        };
        assert_eq!(crash_multiplier(ZERO_SEED, "1", &uncapped), Ok(1.91));
    }

    #[test]
    fn rejects_bad_house_factor() {
        assert_eq!(
            crash_point(ZERO_SEED, "1", 0.0),
            Err(EngineError::InvalidHouseFactor(0.0))
        );
    }

    #[test]
    fn display_curve_is_separate_from_settlement() {
        assert_eq!(display_multiplier(Duration::ZERO, 0.06), 1.0);
        let t = time_to_reach(1.91, 0.06);
        assert!((display_multiplier(t, 0.06) - 1.91).abs() < 1e-9);
        assert_eq!(time_to_reach(1.0, 0.06), Duration::ZERO);
    }

    #[test]
    fn cash_out_boundary() {
        assert!(cash_out_wins(1.91, 1.91));
        assert!(!cash_out_wins(1.92, 1.91));
    }
}
