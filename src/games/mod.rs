pub mod blackjack;
pub mod coinflip;
pub mod dice;
pub mod limbo;
pub mod mines;
pub mod rng;
pub mod slots;
pub mod types;
pub mod validate;
pub mod verify;

pub use rng::{seed_secondary_generator, uniform_draw, Lcg, SeededSequence};
pub use slots::SlotMachine;
pub use types::*;

use crate::config::{GamesConfig, SlotsConfig};
use crate::errors::FairplayResult;

/// Per-game RTP constants and limits, resolved once from configuration
#[derive(Debug, Clone)]
pub struct GameRules {
    pub coinflip_rtp: f64,
    pub dice_rtp: f64,
    pub limbo_rtp: f64,
    pub crash_rtp: f64,
    pub limbo_max_multiplier: f64,
    pub mines_grid_size: u8,
    pub slots: SlotMachine,
}

impl GameRules {
    pub fn from_config(games: &GamesConfig, slots: &SlotsConfig) -> FairplayResult<Self> {
        Ok(Self {
            coinflip_rtp: games.coinflip_rtp,
            dice_rtp: games.dice_rtp,
            limbo_rtp: games.limbo_rtp,
            crash_rtp: games.crash_rtp,
            limbo_max_multiplier: games.limbo_max_multiplier,
            mines_grid_size: games.mines_grid_size,
            slots: SlotMachine::new(slots, games.slots_rtp)?,
        })
    }

    /// RTP for a game; `None` for games without a payout of their own
    pub fn rtp(&self, game: GameType) -> Option<f64> {
        match game {
            GameType::CoinFlip => Some(self.coinflip_rtp),
            GameType::Dice => Some(self.dice_rtp),
            GameType::Limbo => Some(self.limbo_rtp),
            GameType::Crash => Some(self.crash_rtp),
            GameType::Slots => Some(self.slots.rtp()),
            GameType::Mines | GameType::Blackjack => None,
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        let games = GamesConfig::default();
        Self {
            coinflip_rtp: games.coinflip_rtp,
            dice_rtp: games.dice_rtp,
            limbo_rtp: games.limbo_rtp,
            crash_rtp: games.crash_rtp,
            limbo_max_multiplier: games.limbo_max_multiplier,
            mines_grid_size: games.mines_grid_size,
            slots: SlotMachine::new(&SlotsConfig::default(), games.slots_rtp)
                .unwrap_or_else(|e| unreachable!("default paytable is valid: {}", e)),
        }
    }
}
