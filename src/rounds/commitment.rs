//! Seed commitment
//!
//! Opening a round draws a 256-bit server seed from the OS CSPRNG and
//! publishes only its SHA-256. The raw seed leaves this boundary on reveal.

use crate::errors::{FairplayError, FairplayResult};
use crate::rounds::store::{Round, RoundStore};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Server seed entropy in bytes
pub const SERVER_SEED_BYTES: usize = 32;

/// SHA-256 of the seed string, hex-encoded
pub fn hash_server_seed(server_seed: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(server_seed.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_server_seed() -> String {
    let mut bytes = [0u8; SERVER_SEED_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Public half of a freshly opened round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoundCommitment {
    pub round_id: String,
    pub server_seed_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevealedSeed {
    pub round_id: String,
    pub server_seed: String,
    pub server_seed_hash: String,
}

pub struct SeedCommitment {
    store: Arc<dyn RoundStore>,
    reveal_grace: Duration,
}

impl SeedCommitment {
    pub fn new(store: Arc<dyn RoundStore>, reveal_grace: Duration) -> Self {
        Self {
            store,
            reveal_grace,
        }
    }

    pub fn store(&self) -> Arc<dyn RoundStore> {
        self.store.clone()
    }

    /// Commit to a new seed; unrevealed rounds never expire
    pub async fn open_round(&self) -> FairplayResult<RoundCommitment> {
        let round_id = Uuid::new_v4().to_string();
        let server_seed = generate_server_seed();
        let server_seed_hash = hash_server_seed(&server_seed);

        let round = Round::new(round_id.clone(), server_seed, server_seed_hash.clone());
        self.store.set(round, None).await?;

        tracing::info!(round_id = %round_id, server_seed_hash = %server_seed_hash, "Round opened");

        Ok(RoundCommitment {
            round_id,
            server_seed_hash,
        })
    }

    /// Look up a live round
    pub async fn round(&self, round_id: &str) -> FairplayResult<Round> {
        self.store
            .get(round_id)
            .await?
            .ok_or_else(|| FairplayError::RoundNotFound(round_id.to_string()))
    }

    /// Disclose the seed. Idempotent: later calls return the same seed and
    /// leave the eviction deadline set by the first reveal untouched.
    pub async fn reveal(&self, round_id: &str) -> FairplayResult<RevealedSeed> {
        let round = self.round(round_id).await?;

        let round = if round.is_revealed() {
            round
        } else {
            let revealed = round.into_revealed();
            self.store
                .set(revealed.clone(), Some(self.reveal_grace))
                .await?;
            tracing::info!(round_id = %round_id, "Round revealed");
            revealed
        };

        Ok(RevealedSeed {
            round_id: round.round_id().to_string(),
            server_seed: round.server_seed().to_string(),
            server_seed_hash: round.server_seed_hash().to_string(),
        })
    }
}
