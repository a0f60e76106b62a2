//! Three-reel slots
//!
//! The paytable shape is free-form; a single scale factor, recomputed from the
//! symbol set, paytable and RTP, makes the realised expected return equal the
//! configured RTP exactly.

use crate::config::SlotsConfig;
use crate::errors::{ConfigurationError, FairplayResult};
use crate::games::rng::SeededSequence;
use crate::games::types::{payout_for, round8, SlotsOutcome};
use std::collections::HashMap;

/// Raw (unscaled) multiplier for a reel combination
fn raw_payout(reels: [usize; 3], triples: &HashMap<usize, f64>, pair_payout: f64) -> f64 {
    let [a, b, c] = reels;
    if a == b && b == c {
        if let Some(&payout) = triples.get(&a) {
            return payout;
        }
    }
    if a == b || b == c || a == c {
        return pair_payout;
    }
    0.0
}

/// Probability-weighted average of raw payouts over every combination
fn raw_expected_value(symbol_count: usize, triples: &HashMap<usize, f64>, pair_payout: f64) -> f64 {
    let mut total = 0.0;
    for a in 0..symbol_count {
        for b in 0..symbol_count {
            for c in 0..symbol_count {
                total += raw_payout([a, b, c], triples, pair_payout);
            }
        }
    }
    total / (symbol_count * symbol_count * symbol_count) as f64
}

/// Scale factor mapping the raw paytable onto the target RTP
pub fn compute_scale_factor(config: &SlotsConfig, rtp: f64) -> FairplayResult<f64> {
    let triples = index_triples(config)?;
    let ev = raw_expected_value(config.symbols.len(), &triples, config.pair_payout);
    if ev.is_nan() || ev <= 0.0 {
        return Err(ConfigurationError::InvalidValue {
            field: "slots".to_string(),
            value: ev.to_string(),
            reason: "paytable has no positive expected payout".to_string(),
        }
        .into());
    }
    Ok(rtp / ev)
}

fn index_triples(config: &SlotsConfig) -> FairplayResult<HashMap<usize, f64>> {
    if config.symbols.len() < 2 {
        return Err(
            ConfigurationError::MissingRequired("slots.symbols (at least 2)".to_string()).into(),
        );
    }
    let mut triples = HashMap::new();
    for (symbol, &payout) in &config.triple_payouts {
        let idx = config
            .symbols
            .iter()
            .position(|s| s == symbol)
            .ok_or_else(|| ConfigurationError::InvalidValue {
                field: "slots.triple_payouts".to_string(),
                value: symbol.clone(),
                reason: "symbol is not in slots.symbols".to_string(),
            })?;
        if !payout.is_finite() || payout < 0.0 {
            return Err(ConfigurationError::InvalidValue {
                field: format!("slots.triple_payouts.{}", symbol),
                value: payout.to_string(),
                reason: "payout must be a non-negative number".to_string(),
            }
            .into());
        }
        triples.insert(idx, payout);
    }
    Ok(triples)
}

/// A paytable bound to its computed scale factor
#[derive(Debug, Clone)]
pub struct SlotMachine {
    symbols: Vec<String>,
    triples: HashMap<usize, f64>,
    pair_payout: f64,
    scale: f64,
    rtp: f64,
}

impl SlotMachine {
    pub fn new(config: &SlotsConfig, rtp: f64) -> FairplayResult<Self> {
        let triples = index_triples(config)?;
        let scale = compute_scale_factor(config, rtp)?;
        Ok(Self {
            symbols: config.symbols.clone(),
            triples,
            pair_payout: config.pair_payout,
            scale,
            rtp,
        })
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale
    }

    pub fn rtp(&self) -> f64 {
        self.rtp
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Scaled expected return, equal to the configured RTP up to float error
    pub fn expected_return(&self) -> f64 {
        raw_expected_value(self.symbols.len(), &self.triples, self.pair_payout) * self.scale
    }

    /// Spin three reels from a seeded sequence
    pub fn spin<S: SeededSequence + ?Sized>(&self, rng: &mut S) -> [usize; 3] {
        let n = self.symbols.len();
        [rng.next_index(n), rng.next_index(n), rng.next_index(n)]
    }

    fn label(&self, reels: [usize; 3]) -> String {
        let [a, b, c] = reels;
        if a == b && b == c && self.triples.contains_key(&a) {
            format!("three {}", self.symbols[a])
        } else if a == b || b == c || a == c {
            "pair".to_string()
        } else {
            "no win".to_string()
        }
    }

    pub fn resolve<S: SeededSequence + ?Sized>(
        &self,
        rng: &mut S,
        bet_amount: f64,
    ) -> SlotsOutcome {
        let reels = self.spin(rng);
        let raw = raw_payout(reels, &self.triples, self.pair_payout);
        let multiplier = round8(raw * self.scale);
        let won = multiplier > 0.0;

        SlotsOutcome {
            reels: reels.map(|i| self.symbols[i].clone()),
            won,
            multiplier,
            payout: payout_for(bet_amount, multiplier),
            label: if won { self.label(reels) } else { "no win".to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::rng::Lcg;

    #[test]
    fn test_default_paytable_scale() {
        let config = SlotsConfig::default();
        let machine = SlotMachine::new(&config, 0.96).unwrap();
        // Raw EV of the default table is 465/343.
        assert!((machine.scale_factor() - 0.96 * 343.0 / 465.0).abs() < 1e-12);
        assert!((machine.expected_return() - 0.96).abs() < 1e-12);
    }

    #[test]
    fn test_scale_tracks_rtp_and_paytable() {
        let mut config = SlotsConfig::default();
        let a = compute_scale_factor(&config, 0.96).unwrap();
        let b = compute_scale_factor(&config, 0.90).unwrap();
        assert!((a / b - 0.96 / 0.90).abs() < 1e-12);

        config.pair_payout = 0.0;
        let machine = SlotMachine::new(&config, 0.95).unwrap();
        assert!((machine.expected_return() - 0.95).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_symbol_in_paytable() {
        let mut config = SlotsConfig::default();
        config.triple_payouts.insert("diamond".to_string(), 500.0);
        assert!(SlotMachine::new(&config, 0.96).is_err());
    }

    #[test]
    fn test_empty_paytable_rejected() {
        let mut config = SlotsConfig::default();
        config.triple_payouts.clear();
        config.pair_payout = 0.0;
        assert!(SlotMachine::new(&config, 0.96).is_err());
    }

    #[test]
    fn test_known_spin() {
        let machine = SlotMachine::new(&SlotsConfig::default(), 0.96).unwrap();
        let mut rng = Lcg::from_draw(0.8296809342190636);
        let outcome = machine.resolve(&mut rng, 1.0);
        assert_eq!(outcome.reels, ["seven", "cherry", "bell"].map(String::from));
        assert!(!outcome.won);
        assert_eq!(outcome.label, "no win");
    }

    #[test]
    fn test_pair_label_and_payout() {
        let machine = SlotMachine::new(&SlotsConfig::default(), 0.96).unwrap();
        assert_eq!(machine.label([1, 1, 3]), "pair");
        assert_eq!(machine.label([6, 6, 6]), "three seven");
        assert_eq!(raw_payout([1, 3, 1], &machine.triples, 2.0), 2.0);
    }
}
