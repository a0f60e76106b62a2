//! Round lifecycle
//!
//! Opens rounds, turns `(round, client seed, nonce)` into draws, hands the
//! draw to a game resolver and applies the configured reveal policy.
//! Validation always runs before the round is read, so a rejected request
//! never changes round state.

use crate::config::{FairplayConfig, RevealPolicy};
use crate::errors::{FairplayError, FairplayResult};
use crate::games::types::*;
use crate::games::verify::{self, GameParams, VerificationReport};
use crate::games::{
    blackjack, coinflip, dice, limbo, mines, rng, validate, GameRules,
};
use crate::metrics::EngineMetrics;
use crate::rounds::commitment::{RevealedSeed, RoundCommitment, SeedCommitment};
use crate::rounds::store::{InMemoryRoundStore, RoundStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Raw draw exposed for client-side verification tooling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    pub round_id: String,
    pub random: f64,
    pub server_seed_hash: String,
}

/// Public view of a stored round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundInfo {
    pub round_id: String,
    pub server_seed_hash: String,
    pub created_at: DateTime<Utc>,
    pub revealed: bool,
}

/// Advertised parameters of one game
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameInfo {
    pub game: GameType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_edge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_factor: Option<f64>,
}

/// Wager summary an outcome reports for metrics and logs
pub trait Wager {
    /// `(won, multiplier, payout)` for games that settle a bet
    fn settlement(&self) -> Option<(bool, f64, f64)> {
        None
    }
}

impl Wager for CoinFlipOutcome {
    fn settlement(&self) -> Option<(bool, f64, f64)> {
        Some((self.won, self.multiplier, self.payout))
    }
}

impl Wager for DiceOutcome {
    fn settlement(&self) -> Option<(bool, f64, f64)> {
        Some((self.won, self.multiplier, self.payout))
    }
}

impl Wager for LimboOutcome {
    fn settlement(&self) -> Option<(bool, f64, f64)> {
        Some((self.won, self.multiplier, self.payout))
    }
}

impl Wager for SlotsOutcome {
    fn settlement(&self) -> Option<(bool, f64, f64)> {
        Some((self.won, self.multiplier, self.payout))
    }
}

impl Wager for CrashOutcome {}
impl Wager for MinesOutcome {}
impl Wager for BlackjackDeal {}

pub struct RoundLifecycleService {
    commitment: SeedCommitment,
    rules: GameRules,
    reveal_policy: RevealPolicy,
    metrics: Arc<EngineMetrics>,
}

impl RoundLifecycleService {
    pub fn new(
        store: Arc<dyn RoundStore>,
        rules: GameRules,
        reveal_policy: RevealPolicy,
        reveal_grace: Duration,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            commitment: SeedCommitment::new(store, reveal_grace),
            rules,
            reveal_policy,
            metrics,
        }
    }

    /// Service over an in-memory round store
    pub fn from_config(config: &FairplayConfig) -> FairplayResult<Self> {
        let rules = GameRules::from_config(&config.games, &config.slots)?;
        Ok(Self::new(
            Arc::new(InMemoryRoundStore::new()),
            rules,
            config.rounds.reveal_policy,
            Duration::from_secs(config.rounds.reveal_grace_secs),
            Arc::new(EngineMetrics::new()),
        ))
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn reveal_policy(&self) -> RevealPolicy {
        self.reveal_policy
    }

    pub fn metrics(&self) -> Arc<EngineMetrics> {
        self.metrics.clone()
    }

    pub fn store(&self) -> Arc<dyn RoundStore> {
        self.commitment.store()
    }

    pub async fn open_round(&self) -> FairplayResult<RoundCommitment> {
        let opened = self.commitment.open_round().await?;
        self.metrics.record_round_opened();
        Ok(opened)
    }

    pub async fn reveal(&self, round_id: &str) -> FairplayResult<RevealedSeed> {
        let was_revealed = self.track(self.commitment.round(round_id).await)?.is_revealed();
        let revealed = self.track(self.commitment.reveal(round_id).await)?;
        if !was_revealed {
            self.metrics.record_round_revealed();
        }
        Ok(revealed)
    }

    pub async fn round_info(&self, round_id: &str) -> FairplayResult<RoundInfo> {
        let round = self.track(self.commitment.round(round_id).await)?;
        Ok(RoundInfo {
            round_id: round.round_id().to_string(),
            server_seed_hash: round.server_seed_hash().to_string(),
            created_at: round.created_at(),
            revealed: round.is_revealed(),
        })
    }

    /// Raw draw for auditing; only served once the round is revealed
    pub async fn draw(
        &self,
        round_id: &str,
        client_seed: &str,
        nonce: u64,
    ) -> FairplayResult<DrawResult> {
        self.track(validate::client_seed(client_seed))?;
        let round = self.track(self.commitment.round(round_id).await)?;
        if !round.is_revealed() {
            return self.track(Err(FairplayError::RoundNotRevealed(round_id.to_string())));
        }

        Ok(DrawResult {
            round_id: round.round_id().to_string(),
            random: rng::uniform_draw(round.server_seed(), client_seed, nonce),
            server_seed_hash: round.server_seed_hash().to_string(),
        })
    }

    pub async fn play_coinflip(
        &self,
        round_id: &str,
        client_seed: &str,
        nonce: u64,
        bet_amount: f64,
        choice: CoinChoice,
    ) -> FairplayResult<Settled<CoinFlipOutcome>> {
        self.track(check_wager(client_seed, bet_amount))?;
        let rtp = self.rules.coinflip_rtp;
        self.settle(GameType::CoinFlip, round_id, client_seed, nonce, Some(bet_amount), |u| {
            coinflip::resolve(u, choice, bet_amount, rtp)
        })
        .await
    }

    pub async fn play_dice(
        &self,
        round_id: &str,
        client_seed: &str,
        nonce: u64,
        bet_amount: f64,
        mode: DiceMode,
        target: i64,
    ) -> FairplayResult<Settled<DiceOutcome>> {
        self.track(check_wager(client_seed, bet_amount))?;
        let bet = self.track(dice::DiceBet::new(mode, target))?;
        let rtp = self.rules.dice_rtp;
        self.settle(GameType::Dice, round_id, client_seed, nonce, Some(bet_amount), |u| {
            dice::resolve(u, &bet, bet_amount, rtp)
        })
        .await
    }

    pub async fn play_limbo(
        &self,
        round_id: &str,
        client_seed: &str,
        nonce: u64,
        bet_amount: f64,
        target: f64,
    ) -> FairplayResult<Settled<LimboOutcome>> {
        self.track(check_wager(client_seed, bet_amount))?;
        let max = self.rules.limbo_max_multiplier;
        let bet = self.track(limbo::LimboBet::new(target, max))?;
        let rtp = self.rules.limbo_rtp;
        self.settle(GameType::Limbo, round_id, client_seed, nonce, Some(bet_amount), |u| {
            limbo::resolve(u, &bet, bet_amount, rtp, max)
        })
        .await
    }

    pub async fn start_crash(
        &self,
        round_id: &str,
        client_seed: &str,
        nonce: u64,
    ) -> FairplayResult<Settled<CrashOutcome>> {
        self.track(validate::client_seed(client_seed))?;
        let (rtp, max) = (self.rules.crash_rtp, self.rules.limbo_max_multiplier);
        self.settle(GameType::Crash, round_id, client_seed, nonce, None, |u| {
            limbo::crash_point(u, rtp, max)
        })
        .await
    }

    pub async fn play_slots(
        &self,
        round_id: &str,
        client_seed: &str,
        nonce: u64,
        bet_amount: f64,
    ) -> FairplayResult<Settled<SlotsOutcome>> {
        self.track(check_wager(client_seed, bet_amount))?;
        let machine = &self.rules.slots;
        self.settle(GameType::Slots, round_id, client_seed, nonce, Some(bet_amount), |u| {
            machine.resolve(&mut rng::seed_secondary_generator(u), bet_amount)
        })
        .await
    }

    pub async fn start_mines(
        &self,
        round_id: &str,
        client_seed: &str,
        nonce: u64,
        mine_count: i64,
    ) -> FairplayResult<Settled<MinesOutcome>> {
        self.track(validate::client_seed(client_seed))?;
        let bet = self.track(mines::MinesBet::new(mine_count, self.rules.mines_grid_size))?;
        self.settle(GameType::Mines, round_id, client_seed, nonce, None, |u| {
            mines::place_mines(&mut rng::seed_secondary_generator(u), &bet)
        })
        .await
    }

    pub async fn deal_blackjack(
        &self,
        round_id: &str,
        client_seed: &str,
        nonce: u64,
    ) -> FairplayResult<Settled<BlackjackDeal>> {
        self.track(validate::client_seed(client_seed))?;
        self.settle(GameType::Blackjack, round_id, client_seed, nonce, None, |u| {
            blackjack::deal(&mut rng::seed_secondary_generator(u))
        })
        .await
    }

    /// Recompute a bet from disclosed values without touching the store
    pub fn verify(
        &self,
        server_seed: &str,
        committed_hash: Option<&str>,
        client_seed: &str,
        nonce: u64,
        params: Option<&GameParams>,
    ) -> FairplayResult<VerificationReport> {
        self.track(verify::verify(
            &self.rules,
            server_seed,
            committed_hash,
            client_seed,
            nonce,
            params,
        ))
    }

    pub fn catalogue(&self) -> Vec<GameInfo> {
        GameType::all()
            .into_iter()
            .map(|game| {
                let rtp = self.rules.rtp(game);
                GameInfo {
                    game,
                    rtp,
                    house_edge: rtp.map(|r| round8(1.0 - r)),
                    scale_factor: (game == GameType::Slots)
                        .then(|| self.rules.slots.scale_factor()),
                }
            })
            .collect()
    }

    /// One HMAC draw, one resolver call, then the reveal policy
    async fn settle<T, F>(
        &self,
        game: GameType,
        round_id: &str,
        client_seed: &str,
        nonce: u64,
        bet_amount: Option<f64>,
        resolve: F,
    ) -> FairplayResult<Settled<T>>
    where
        T: Wager,
        F: FnOnce(f64) -> T,
    {
        let round = self.track(self.commitment.round(round_id).await)?;
        if round.is_revealed() {
            self.metrics.record_rejection();
            return Err(FairplayError::RoundRevealed(round_id.to_string()));
        }

        let u = rng::uniform_draw(round.server_seed(), client_seed, nonce);
        let outcome = resolve(u);

        let server_seed = match self.reveal_policy {
            RevealPolicy::Immediate => Some(self.reveal(round_id).await?.server_seed),
            RevealPolicy::Deferred => None,
        };

        let settlement = outcome.settlement();
        self.metrics.record_game(
            game,
            bet_amount
                .zip(settlement)
                .map(|(amount, (won, _, payout))| (amount, won, payout)),
        );
        match settlement {
            Some((won, multiplier, payout)) => tracing::info!(
                game = %game,
                round_id = %round_id,
                nonce,
                won,
                multiplier,
                payout,
                "Bet settled"
            ),
            None => tracing::info!(game = %game, round_id = %round_id, nonce, "Game resolved"),
        }

        Ok(Settled {
            outcome,
            proof: Proof {
                round_id: round.round_id().to_string(),
                server_seed_hash: round.server_seed_hash().to_string(),
                server_seed,
                client_seed: client_seed.to_string(),
                nonce,
            },
        })
    }

    /// Count and log rejected requests on their way out
    fn track<T>(&self, result: FairplayResult<T>) -> FairplayResult<T> {
        if let Err(e) = &result {
            self.metrics.record_rejection();
            tracing::debug!(code = e.code(), error = %e, "Request rejected");
        }
        result
    }
}

fn check_wager(client_seed: &str, bet_amount: f64) -> FairplayResult<()> {
    validate::client_seed(client_seed)?;
    validate::bet_amount(bet_amount)
}
