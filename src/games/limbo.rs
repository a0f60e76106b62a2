//! Limbo and crash
//!
//! Both use the inverse-CDF construction `floor(rtp / u * 100) / 100`, which
//! makes `P(result >= m) = rtp / m` for every target `m`.

use crate::errors::{FairplayError, FairplayResult};
use crate::games::rng::clamp_draw;
use crate::games::types::{payout_for, CrashOutcome, LimboOutcome};

pub const MIN_TARGET: f64 = 1.01;
pub const DEFAULT_MAX_MULTIPLIER: f64 = 1_000_000.0;
const GRID_TOLERANCE: f64 = 1e-6;

/// Inverse-CDF multiplier for a draw, floored to two decimals
pub fn inverse_cdf_multiplier(u: f64, rtp: f64, max_multiplier: f64) -> f64 {
    let u = clamp_draw(u);
    let raw = (rtp / u * 100.0).floor() / 100.0;
    raw.clamp(1.0, max_multiplier)
}

/// A validated limbo target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimboBet {
    target: f64,
}

impl LimboBet {
    pub fn new(target: f64, max_multiplier: f64) -> FairplayResult<Self> {
        if !target.is_finite() || target < MIN_TARGET || target > max_multiplier {
            return Err(FairplayError::invalid_parameter(
                "target",
                format!("{} is outside [{}, {}]", target, MIN_TARGET, max_multiplier),
            ));
        }
        // Results land on the 0.01 grid, so an off-grid target only wins
        // at the next cent up while still paying itself.
        let cents = target * 100.0;
        if (cents - cents.round()).abs() > GRID_TOLERANCE {
            return Err(FairplayError::invalid_parameter(
                "target",
                format!("{} is not a multiple of 0.01", target),
            ));
        }
        Ok(Self {
            target: cents.round() / 100.0,
        })
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn win_probability(&self, rtp: f64) -> f64 {
        rtp / self.target
    }
}

/// Pays exactly the chosen target on a win, not the drawn result
pub fn resolve(
    u: f64,
    bet: &LimboBet,
    bet_amount: f64,
    rtp: f64,
    max_multiplier: f64,
) -> LimboOutcome {
    let result = inverse_cdf_multiplier(u, rtp, max_multiplier);
    let won = result >= bet.target;
    let multiplier = if won { bet.target } else { 0.0 };

    LimboOutcome {
        result,
        won,
        multiplier,
        payout: payout_for(bet_amount, multiplier),
    }
}

/// Crash point for a round. The climb and cash-out race live with the client.
pub fn crash_point(u: f64, rtp: f64, max_multiplier: f64) -> CrashOutcome {
    CrashOutcome {
        crash_point: inverse_cdf_multiplier(u, rtp, max_multiplier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_cdf_bounds() {
        assert_eq!(inverse_cdf_multiplier(0.0, 0.99, DEFAULT_MAX_MULTIPLIER), 1_000_000.0);
        assert_eq!(inverse_cdf_multiplier(1.0, 0.99, DEFAULT_MAX_MULTIPLIER), 1.0);
        assert_eq!(inverse_cdf_multiplier(0.5, 0.99, DEFAULT_MAX_MULTIPLIER), 1.98);
    }

    #[test]
    fn test_known_draw() {
        let u = 0.8296809342190636;
        assert_eq!(inverse_cdf_multiplier(u, 0.99, DEFAULT_MAX_MULTIPLIER), 1.19);
        assert_eq!(crash_point(u, 0.97, DEFAULT_MAX_MULTIPLIER).crash_point, 1.16);
    }

    #[test]
    fn test_target_validation() {
        assert!(LimboBet::new(1.01, DEFAULT_MAX_MULTIPLIER).is_ok());
        for bad in [1.0, 0.5, f64::NAN, 2_000_000.0] {
            assert!(matches!(
                LimboBet::new(bad, DEFAULT_MAX_MULTIPLIER),
                Err(FairplayError::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn test_target_must_sit_on_cent_grid() {
        for bad in [1.011, 2.005, 1.999] {
            assert!(matches!(
                LimboBet::new(bad, DEFAULT_MAX_MULTIPLIER),
                Err(FairplayError::InvalidParameter { ref field, .. }) if field == "target"
            ));
        }

        let bet = LimboBet::new(1.37, DEFAULT_MAX_MULTIPLIER).unwrap();
        assert_eq!(bet.target(), 1.37);
        assert!((bet.win_probability(0.99) - 0.99 / 1.37).abs() < 1e-12);
        assert_eq!(LimboBet::new(2.5, DEFAULT_MAX_MULTIPLIER).unwrap().target(), 2.5);
    }

    #[test]
    fn test_win_pays_target_not_result() {
        let bet = LimboBet::new(1.5, DEFAULT_MAX_MULTIPLIER).unwrap();
        let outcome = resolve(0.1, &bet, 10.0, 0.99, DEFAULT_MAX_MULTIPLIER);
        assert_eq!(outcome.result, 9.89);
        assert!(outcome.won);
        assert_eq!(outcome.multiplier, 1.5);
        assert_eq!(outcome.payout, 15.0);

        let outcome = resolve(0.9, &bet, 10.0, 0.99, DEFAULT_MAX_MULTIPLIER);
        assert!(!outcome.won);
        assert_eq!(outcome.payout, 0.0);
    }
}
