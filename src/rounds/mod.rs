//! Round lifecycle: commitment, storage, play and retention

pub mod commitment;
pub mod retention;
pub mod service;
pub mod store;

pub use commitment::{hash_server_seed, RevealedSeed, RoundCommitment, SeedCommitment};
pub use retention::RetentionSweeper;
pub use service::{DrawResult, GameInfo, RoundInfo, RoundLifecycleService};
pub use store::{InMemoryRoundStore, Round, RoundStore};
