//! Return-to-player checks
//!
//! Draw-based games use stratified draws `u = (i + 0.5) / N`, which makes the
//! expectation exact up to 1/N. Slots RTP is checked exactly by enumeration;
//! a sampled run over real HMAC draws only checks the LCG path stays close.

use fairplay::games::types::*;
use fairplay::games::{coinflip, dice, limbo, mines, rng, GameRules, SeededSequence};
use fairplay::FairplayError;

const N: usize = 1_000_000;

fn stratified(n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |i| (i as f64 + 0.5) / n as f64)
}

/// Replays fixed floats; each one selects `floor(x * len)`
struct FixedSequence {
    values: Vec<f64>,
    pos: usize,
}

impl SeededSequence for FixedSequence {
    fn next_float(&mut self) -> f64 {
        let value = self.values[self.pos];
        self.pos += 1;
        value
    }
}

#[test]
fn test_coinflip_rtp() {
    for choice in [CoinChoice::Heads, CoinChoice::Tails] {
        let total: f64 = stratified(N)
            .map(|u| coinflip::resolve(u, choice, 1.0, 0.99).payout)
            .sum();
        assert!((total / N as f64 - 0.99).abs() < 1e-9, "{:?}", choice);
    }
}

#[test]
fn test_dice_rtp_every_target() {
    // 36 * 1000 draws hit each die pair exactly 1000 times.
    let draws = 36_000;
    for mode in [DiceMode::Over, DiceMode::Under] {
        for target in 2..=12 {
            let Ok(bet) = dice::DiceBet::new(mode, target) else {
                continue;
            };
            let total: f64 = stratified(draws)
                .map(|u| dice::resolve(u, &bet, 1.0, 0.99).payout)
                .sum();
            let rtp = total / draws as f64;
            assert!((rtp - 0.99).abs() < 1e-6, "{:?} {} gave {}", mode, target, rtp);
        }
    }
}

#[test]
fn test_dice_win_probabilities() {
    let over = dice::DiceBet::new(DiceMode::Over, 7).unwrap();
    assert_eq!(over.mode(), DiceMode::Over);
    assert_eq!(over.target(), 7);
    assert_eq!(over.win_odds(), (15, 36));
    assert_eq!(over.win_probability(), 15.0 / 36.0);

    let under = dice::DiceBet::new(DiceMode::Under, 8).unwrap();
    assert_eq!(under.win_odds(), (26, 36));

    // Stratified draws win exactly as often as the combination count says.
    let draws = 36_000;
    let wins = stratified(draws)
        .filter(|&u| dice::resolve(u, &under, 1.0, 0.99).won)
        .count();
    assert_eq!(wins as f64 / draws as f64, under.win_probability());
}

#[test]
fn test_limbo_tail_probabilities() {
    let results: Vec<f64> = stratified(N)
        .map(|u| limbo::inverse_cdf_multiplier(u, 0.99, limbo::DEFAULT_MAX_MULTIPLIER))
        .collect();

    for m in [1.5, 2.0, 10.0, 100.0] {
        let hits = results.iter().filter(|&&r| r >= m).count();
        let p = hits as f64 / N as f64;
        assert!((p - 0.99 / m).abs() < 1e-4, "P(result >= {}) = {}", m, p);
    }
}

#[test]
fn test_limbo_rtp() {
    for target in [1.01, 2.0, 5.0, 50.0] {
        let bet = limbo::LimboBet::new(target, limbo::DEFAULT_MAX_MULTIPLIER).unwrap();
        let total: f64 = stratified(N)
            .map(|u| limbo::resolve(u, &bet, 1.0, 0.99, limbo::DEFAULT_MAX_MULTIPLIER).payout)
            .sum();
        let rtp = total / N as f64;
        assert!((rtp - 0.99).abs() < 1e-3, "target {} gave {}", target, rtp);
    }
}

#[test]
fn test_limbo_targets_are_on_cent_grid() {
    let max = limbo::DEFAULT_MAX_MULTIPLIER;

    // 1.011 would only win when the result reaches 1.02 yet pay 1.011.
    for target in [1.011, 1.015, 3.333] {
        let rejected = limbo::LimboBet::new(target, max);
        assert!(
            matches!(rejected, Err(FairplayError::InvalidParameter { .. })),
            "target {} accepted",
            target
        );
    }

    for target in [1.37, 3.33, 7.77] {
        let bet = limbo::LimboBet::new(target, max).unwrap();
        let hits = stratified(N)
            .filter(|&u| limbo::resolve(u, &bet, 1.0, 0.99, max).won)
            .count();
        let p = hits as f64 / N as f64;
        assert!((p - bet.win_probability(0.99)).abs() < 1e-4, "target {} won {}", target, p);
        assert!((p * bet.target() - 0.99).abs() < 1e-3, "target {} gave {}", target, p * target);
    }
}

#[test]
fn test_crash_tail_probabilities() {
    let points: Vec<f64> = stratified(N)
        .map(|u| limbo::crash_point(u, 0.97, limbo::DEFAULT_MAX_MULTIPLIER).crash_point)
        .collect();

    assert!(points.iter().all(|&p| p >= 1.0));
    for m in [2.0, 3.0, 20.0] {
        let p = points.iter().filter(|&&c| c >= m).count() as f64 / N as f64;
        assert!((p - 0.97 / m).abs() < 1e-4, "P(crash >= {}) = {}", m, p);
    }
}

#[test]
fn test_slots_rtp_by_enumeration() {
    let rules = GameRules::default();
    let machine = &rules.slots;
    let n = machine.symbols().len();

    let mut total = 0.0;
    for a in 0..n {
        for b in 0..n {
            for c in 0..n {
                let pick = |k: usize| (k as f64 + 0.5) / n as f64;
                let mut sequence = FixedSequence {
                    values: vec![pick(a), pick(b), pick(c)],
                    pos: 0,
                };
                total += machine.resolve(&mut sequence, 1.0).multiplier;
            }
        }
    }

    let rtp = total / (n * n * n) as f64;
    assert!((rtp - 0.96).abs() < 1e-6, "enumerated slots RTP {}", rtp);
    assert!((machine.expected_return() - 0.96).abs() < 1e-12);
}

#[test]
fn test_slots_sampled_return_within_three_standard_errors() {
    let rules = GameRules::default();
    let draws = 200_000u64;

    let total: f64 = (0..draws)
        .map(|nonce| {
            let u = rng::uniform_draw("slots-rtp-seed", "auditor", nonce);
            rules.slots.resolve(&mut rng::seed_secondary_generator(u), 1.0).payout
        })
        .sum();

    // Payouts reach 100x, so the standard error at 200k draws is about 0.01.
    // The exact figure comes from test_slots_rtp_by_enumeration.
    let rtp = total / draws as f64;
    assert!((rtp - 0.96).abs() < 0.03, "sampled slots RTP {}", rtp);
}

#[test]
fn test_mines_cells_are_uniform() {
    let bet = mines::MinesBet::new(5, mines::DEFAULT_GRID_SIZE).unwrap();
    assert_eq!(bet.grid_size(), 25);
    let draws = 20_000u64;
    let mut counts = vec![0u32; bet.grid_size() as usize];

    for nonce in 0..draws {
        let u = rng::uniform_draw("mines-seed", "auditor", nonce);
        let layout = mines::place_mines(&mut rng::seed_secondary_generator(u), &bet);
        assert_eq!(layout.mines.len(), 5);
        for cell in layout.mines {
            counts[cell as usize] += 1;
        }
    }

    // Expected 4000 per cell, sd about 57.
    for (cell, &count) in counts.iter().enumerate() {
        assert!((3_600..=4_400).contains(&count), "cell {} hit {} times", cell, count);
    }
}
