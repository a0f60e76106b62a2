use crate::games::types::{payout_for, round8, CoinChoice, CoinFlipOutcome};

/// Compute the coin face from a uniform draw
pub fn compute_coinflip(u: f64) -> CoinChoice {
    if u < 0.5 {
        CoinChoice::Heads
    } else {
        CoinChoice::Tails
    }
}

/// Flat multiplier paid on a correct call
pub fn win_multiplier(rtp: f64) -> f64 {
    round8(2.0 * rtp)
}

pub fn resolve(u: f64, choice: CoinChoice, bet_amount: f64, rtp: f64) -> CoinFlipOutcome {
    let outcome = compute_coinflip(u);
    let won = outcome == choice;
    let multiplier = if won { win_multiplier(rtp) } else { 0.0 };

    CoinFlipOutcome {
        outcome,
        won,
        multiplier,
        payout: payout_for(bet_amount, multiplier),
    }
}
