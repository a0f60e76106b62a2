//! Offline verification
//!
//! Recomputes the commitment, the draw and optionally a game outcome from
//! `(server_seed, client_seed, nonce)` alone. Needs no round store, which is
//! what lets a player check a settled bet independently.

use crate::errors::FairplayResult;
use crate::games::types::*;
use crate::games::{blackjack, coinflip, dice, limbo, mines, rng, validate, GameRules};
use crate::rounds::commitment::hash_server_seed;
use serde::{Deserialize, Serialize};

/// Game parameters for a recomputation, tagged by `game`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "game", rename_all = "lowercase")]
pub enum GameParams {
    #[serde(rename_all = "camelCase")]
    CoinFlip { bet_amount: f64, choice: CoinChoice },
    #[serde(rename_all = "camelCase")]
    Dice {
        bet_amount: f64,
        mode: DiceMode,
        target: i64,
    },
    #[serde(rename_all = "camelCase")]
    Limbo { bet_amount: f64, target: f64 },
    Crash,
    #[serde(rename_all = "camelCase")]
    Slots { bet_amount: f64 },
    #[serde(rename_all = "camelCase")]
    Mines { mine_count: i64 },
    Blackjack,
}

impl GameParams {
    pub fn game_type(&self) -> GameType {
        match self {
            GameParams::CoinFlip { .. } => GameType::CoinFlip,
            GameParams::Dice { .. } => GameType::Dice,
            GameParams::Limbo { .. } => GameType::Limbo,
            GameParams::Crash => GameType::Crash,
            GameParams::Slots { .. } => GameType::Slots,
            GameParams::Mines { .. } => GameType::Mines,
            GameParams::Blackjack => GameType::Blackjack,
        }
    }

    /// Resolve against a draw, validating parameters first
    pub fn resolve(&self, rules: &GameRules, u: f64) -> FairplayResult<GameResolution> {
        let resolution = match self {
            GameParams::CoinFlip { bet_amount, choice } => {
                validate::bet_amount(*bet_amount)?;
                let rtp = rules.coinflip_rtp;
                GameResolution::CoinFlip(coinflip::resolve(u, *choice, *bet_amount, rtp))
            }
            GameParams::Dice {
                bet_amount,
                mode,
                target,
            } => {
                validate::bet_amount(*bet_amount)?;
                let bet = dice::DiceBet::new(*mode, *target)?;
                GameResolution::Dice(dice::resolve(u, &bet, *bet_amount, rules.dice_rtp))
            }
            GameParams::Limbo { bet_amount, target } => {
                validate::bet_amount(*bet_amount)?;
                let bet = limbo::LimboBet::new(*target, rules.limbo_max_multiplier)?;
                GameResolution::Limbo(limbo::resolve(
                    u,
                    &bet,
                    *bet_amount,
                    rules.limbo_rtp,
                    rules.limbo_max_multiplier,
                ))
            }
            GameParams::Crash => GameResolution::Crash(limbo::crash_point(
                u,
                rules.crash_rtp,
                rules.limbo_max_multiplier,
            )),
            GameParams::Slots { bet_amount } => {
                validate::bet_amount(*bet_amount)?;
                let mut sequence = rng::seed_secondary_generator(u);
                GameResolution::Slots(rules.slots.resolve(&mut sequence, *bet_amount))
            }
            GameParams::Mines { mine_count } => {
                let bet = mines::MinesBet::new(*mine_count, rules.mines_grid_size)?;
                let mut sequence = rng::seed_secondary_generator(u);
                GameResolution::Mines(mines::place_mines(&mut sequence, &bet))
            }
            GameParams::Blackjack => {
                let mut sequence = rng::seed_secondary_generator(u);
                GameResolution::Blackjack(blackjack::deal(&mut sequence))
            }
        };
        Ok(resolution)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum GameResolution {
    CoinFlip(CoinFlipOutcome),
    Dice(DiceOutcome),
    Limbo(LimboOutcome),
    Crash(CrashOutcome),
    Slots(SlotsOutcome),
    Mines(MinesOutcome),
    Blackjack(BlackjackDeal),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// SHA-256 of the supplied server seed
    pub server_seed_hash: String,
    /// Whether it equals the hash committed at round open, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_matches: Option<bool>,
    pub hmac: String,
    pub random: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GameResolution>,
}

pub fn verify(
    rules: &GameRules,
    server_seed: &str,
    committed_hash: Option<&str>,
    client_seed: &str,
    nonce: u64,
    params: Option<&GameParams>,
) -> FairplayResult<VerificationReport> {
    validate::client_seed(client_seed)?;

    let server_seed_hash = hash_server_seed(server_seed);
    let hash_matches = committed_hash.map(|h| h.eq_ignore_ascii_case(&server_seed_hash));
    let random = rng::uniform_draw(server_seed, client_seed, nonce);
    let outcome = params.map(|p| p.resolve(rules, random)).transpose()?;

    Ok(VerificationReport {
        server_seed_hash,
        hash_matches,
        hmac: rng::hmac_hex(server_seed, client_seed, nonce),
        random,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FairplayError;

    #[test]
    fn test_params_deserialize() {
        let params: GameParams = serde_json::from_value(serde_json::json!({
            "game": "dice", "betAmount": 1.0, "mode": "over", "target": 7
        }))
        .unwrap();
        assert_eq!(
            params,
            GameParams::Dice {
                bet_amount: 1.0,
                mode: DiceMode::Over,
                target: 7
            }
        );

        let params: GameParams =
            serde_json::from_value(serde_json::json!({"game": "blackjack"})).unwrap();
        assert_eq!(params.game_type(), GameType::Blackjack);
    }

    #[test]
    fn test_verify_detects_hash_mismatch() {
        let rules = GameRules::default();
        let good = hash_server_seed("abc");
        let report = verify(&rules, "abc", Some(&good), "player1", 0, None).unwrap();
        assert_eq!(report.hash_matches, Some(true));

        let report = verify(&rules, "abd", Some(&good), "player1", 0, None).unwrap();
        assert_eq!(report.hash_matches, Some(false));
    }

    #[test]
    fn test_verify_recomputes_outcome() {
        let rules = GameRules::default();
        let params = GameParams::Dice {
            bet_amount: 1.0,
            mode: DiceMode::Over,
            target: 7,
        };
        let report = verify(&rules, "abc", None, "player1", 0, Some(&params)).unwrap();
        match report.outcome {
            Some(GameResolution::Dice(d)) => {
                assert_eq!((d.d1, d.d2), (5, 6));
                assert!(d.won);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_verify_rejects_bad_input() {
        let rules = GameRules::default();
        assert!(matches!(
            verify(&rules, "abc", None, "", 0, None),
            Err(FairplayError::InvalidClientSeed)
        ));
        let params = GameParams::Mines { mine_count: 30 };
        assert!(matches!(
            verify(&rules, "abc", None, "player1", 0, Some(&params)),
            Err(FairplayError::InvalidParameter { .. })
        ));
    }
}
