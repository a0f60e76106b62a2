//! Two-die sum (2..=12)
//!
//! The draw selects one of 36 equally likely `(d1, d2)` pairs. Win
//! probabilities are exact combination counts over 36, never approximated.

use crate::errors::{FairplayError, FairplayResult};
use crate::games::types::{payout_for, round8, DiceMode, DiceOutcome};

pub const MIN_TARGET: u8 = 2;
pub const MAX_TARGET: u8 = 12;
const OUTCOMES: u32 = 36;

/// Number of `(d1, d2)` pairs that sum to `sum`
pub fn combinations_for_sum(sum: u8) -> u32 {
    if !(MIN_TARGET..=MAX_TARGET).contains(&sum) {
        return 0;
    }
    6 - (7 - sum as i32).unsigned_abs()
}

/// Winning combinations (out of 36) for a bet
pub fn winning_combinations(mode: DiceMode, target: u8) -> u32 {
    (MIN_TARGET..=MAX_TARGET)
        .filter(|&sum| match mode {
            DiceMode::Over => sum > target,
            DiceMode::Under => sum <= target,
        })
        .map(combinations_for_sum)
        .sum()
}

/// A validated dice bet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceBet {
    mode: DiceMode,
    target: u8,
    wins: u32,
}

impl DiceBet {
    pub fn new(mode: DiceMode, target: i64) -> FairplayResult<Self> {
        if target < MIN_TARGET as i64 || target > MAX_TARGET as i64 {
            return Err(FairplayError::invalid_parameter(
                "target",
                format!("{} is outside [{}, {}]", target, MIN_TARGET, MAX_TARGET),
            ));
        }
        let target = target as u8;
        let wins = winning_combinations(mode, target);
        if wins == 0 || wins == OUTCOMES {
            return Err(FairplayError::invalid_parameter(
                "target",
                format!("{:?} {} can never lose or never win", mode, target),
            ));
        }
        Ok(Self { mode, target, wins })
    }

    pub fn mode(&self) -> DiceMode {
        self.mode
    }

    pub fn target(&self) -> u8 {
        self.target
    }

    /// Exact win probability as `(winning, total)`
    pub fn win_odds(&self) -> (u32, u32) {
        (self.wins, OUTCOMES)
    }

    pub fn win_probability(&self) -> f64 {
        self.wins as f64 / OUTCOMES as f64
    }

    /// `rtp / P(win)`, computed as `rtp * 36 / wins` to keep one rounding step
    pub fn multiplier(&self, rtp: f64) -> f64 {
        round8(rtp * OUTCOMES as f64 / self.wins as f64)
    }

    pub fn is_win(&self, sum: u8) -> bool {
        match self.mode {
            DiceMode::Over => sum > self.target,
            DiceMode::Under => sum <= self.target,
        }
    }
}

/// Map a draw onto a die pair
pub fn roll(u: f64) -> (u8, u8) {
    let idx = ((u * OUTCOMES as f64).floor() as u32).min(OUTCOMES - 1);
    ((idx / 6 + 1) as u8, (idx % 6 + 1) as u8)
}

pub fn resolve(u: f64, bet: &DiceBet, bet_amount: f64, rtp: f64) -> DiceOutcome {
    let (d1, d2) = roll(u);
    let sum = d1 + d2;
    let won = bet.is_win(sum);
    let multiplier = if won { bet.multiplier(rtp) } else { 0.0 };

    DiceOutcome {
        roll: sum,
        d1,
        d2,
        won,
        multiplier,
        payout: payout_for(bet_amount, multiplier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_counts() {
        let counts: Vec<u32> = (2..=12).map(combinations_for_sum).collect();
        assert_eq!(counts, vec![1, 2, 3, 4, 5, 6, 5, 4, 3, 2, 1]);
        assert_eq!(counts.iter().sum::<u32>(), 36);
    }

    #[test]
    fn test_exact_probabilities_at_seven() {
        let over = DiceBet::new(DiceMode::Over, 7).unwrap();
        let under = DiceBet::new(DiceMode::Under, 7).unwrap();
        assert_eq!(over.win_odds(), (15, 36));
        assert_eq!(under.win_odds(), (21, 36));
    }

    #[test]
    fn test_roll_covers_every_pair() {
        let mut seen = std::collections::HashSet::new();
        for idx in 0..36 {
            let u = (idx as f64 + 0.5) / 36.0;
            seen.insert(roll(u));
        }
        assert_eq!(seen.len(), 36);
        assert_eq!(roll(0.0), (1, 1));
        assert_eq!(roll(0.999_999_999_999), (6, 6));
    }

    #[test]
    fn test_target_validation() {
        for bad in [1, 13, -4] {
            assert!(matches!(
                DiceBet::new(DiceMode::Over, bad),
                Err(FairplayError::InvalidParameter { .. })
            ));
        }
        assert!(DiceBet::new(DiceMode::Over, 12).is_err());
        assert!(DiceBet::new(DiceMode::Under, 12).is_err());
        assert!(DiceBet::new(DiceMode::Over, 2).is_ok());
        assert!(DiceBet::new(DiceMode::Under, 2).is_ok());
    }

    #[test]
    fn test_multiplier_over_seven() {
        let bet = DiceBet::new(DiceMode::Over, 7).unwrap();
        assert_eq!(bet.multiplier(0.99), round8(0.99 * 36.0 / 15.0));
        // 5 + 6 = 11 > 7
        let outcome = resolve(0.83, &bet, 2.0, 0.99);
        assert_eq!((outcome.d1, outcome.d2, outcome.roll), (5, 6, 11));
        assert!(outcome.won);
        assert_eq!(outcome.payout, round8(2.0 * bet.multiplier(0.99)));
    }
}
