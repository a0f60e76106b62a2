//! Fairplay - Provably Fair Game Engine
//!
//! Commit/reveal seed handling, an HMAC-SHA256 draw, and deterministic
//! resolvers for coin flip, dice, limbo, crash, slots, mines and blackjack.
//! Any settled bet can be recomputed from `(server_seed, client_seed, nonce)`
//! once the server seed is revealed.

pub mod api;
pub mod config;
pub mod errors;
pub mod games;
pub mod metrics;
pub mod rounds;

pub use config::{ConfigLoader, FairplayConfig, RevealPolicy};
pub use errors::{FairplayError, FairplayResult};
pub use games::{GameRules, GameType};
pub use rounds::{RoundLifecycleService, RoundStore};
