//! Round storage
//!
//! The engine only sees the `RoundStore` trait. The in-memory store below is
//! for tests and single-process deployments; a durable store (database or
//! cache with TTL) plugs in behind the same trait so reveal survives restarts.

use crate::errors::FairplayResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// A committed round. The seed and its hash never change after creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Round {
    round_id: String,
    server_seed: String,
    server_seed_hash: String,
    created_at: DateTime<Utc>,
    revealed_at: Option<DateTime<Utc>>,
}

impl Round {
    pub(crate) fn new(round_id: String, server_seed: String, server_seed_hash: String) -> Self {
        Self {
            round_id,
            server_seed,
            server_seed_hash,
            created_at: Utc::now(),
            revealed_at: None,
        }
    }

    pub fn round_id(&self) -> &str {
        &self.round_id
    }

    /// Secret until the round is revealed; only the engine reads it
    pub(crate) fn server_seed(&self) -> &str {
        &self.server_seed
    }

    pub fn server_seed_hash(&self) -> &str {
        &self.server_seed_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn revealed_at(&self) -> Option<DateTime<Utc>> {
        self.revealed_at
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }

    /// Copy of this round marked as revealed; seed and hash are carried over untouched
    pub(crate) fn into_revealed(mut self) -> Self {
        if self.revealed_at.is_none() {
            self.revealed_at = Some(Utc::now());
        }
        self
    }
}

/// Key-value store for rounds with optional per-entry TTL
#[async_trait]
pub trait RoundStore: Send + Sync {
    /// Fetch a live round; expired entries read as absent
    async fn get(&self, round_id: &str) -> FairplayResult<Option<Round>>;

    /// Insert or replace a round. `ttl = None` keeps it until deleted.
    async fn set(&self, round: Round, ttl: Option<Duration>) -> FairplayResult<()>;

    /// Remove a round, returning whether it existed
    async fn delete(&self, round_id: &str) -> FairplayResult<bool>;

    /// Drop every expired entry, returning how many were removed
    async fn purge_expired(&self) -> FairplayResult<usize>;

    /// Number of stored rounds, including not-yet-purged expired ones
    async fn len(&self) -> FairplayResult<usize>;
}

struct StoredRound {
    round: Round,
    expires_at: Option<Instant>,
}

impl StoredRound {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map_or(false, |at| at <= now)
    }
}

/// Lock-free in-process round store
#[derive(Default)]
pub struct InMemoryRoundStore {
    rounds: DashMap<String, StoredRound>,
}

impl InMemoryRoundStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoundStore for InMemoryRoundStore {
    async fn get(&self, round_id: &str) -> FairplayResult<Option<Round>> {
        let now = Instant::now();
        let found = self.rounds.get(round_id).map(|entry| {
            if entry.is_expired(now) {
                None
            } else {
                Some(entry.round.clone())
            }
        });

        match found {
            Some(Some(round)) => Ok(Some(round)),
            Some(None) => {
                self.rounds.remove_if(round_id, |_, entry| entry.is_expired(now));
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, round: Round, ttl: Option<Duration>) -> FairplayResult<()> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.rounds
            .insert(round.round_id.clone(), StoredRound { round, expires_at });
        Ok(())
    }

    async fn delete(&self, round_id: &str) -> FairplayResult<bool> {
        Ok(self.rounds.remove(round_id).is_some())
    }

    async fn purge_expired(&self) -> FairplayResult<usize> {
        let now = Instant::now();
        let before = self.rounds.len();
        self.rounds.retain(|_, entry| !entry.is_expired(now));
        Ok(before.saturating_sub(self.rounds.len()))
    }

    async fn len(&self) -> FairplayResult<usize> {
        Ok(self.rounds.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_round(id: &str) -> Round {
        Round::new(id.to_string(), "seed".to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = InMemoryRoundStore::new();
        store.set(sample_round("r1"), None).await.unwrap();

        let round = store.get("r1").await.unwrap().expect("round stored");
        assert_eq!(round.round_id(), "r1");
        assert_eq!(round.server_seed(), "seed");

        assert!(store.delete("r1").await.unwrap());
        assert!(store.get("r1").await.unwrap().is_none());
        assert!(!store.delete("r1").await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_rounds_read_as_absent() {
        let store = InMemoryRoundStore::new();
        store.set(sample_round("gone"), Some(Duration::ZERO)).await.unwrap();
        store.set(sample_round("kept"), None).await.unwrap();

        assert!(store.get("gone").await.unwrap().is_none());
        assert!(store.get("kept").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = InMemoryRoundStore::new();
        store.set(sample_round("a"), Some(Duration::ZERO)).await.unwrap();
        store.set(sample_round("b"), Some(Duration::ZERO)).await.unwrap();
        store.set(sample_round("c"), Some(Duration::from_secs(3_600))).await.unwrap();
        store.set(sample_round("d"), None).await.unwrap();

        assert_eq!(store.purge_expired().await.unwrap(), 2);
        assert_eq!(store.len().await.unwrap(), 2);
    }

    #[test]
    fn test_reveal_marks_once() {
        let round = sample_round("r").into_revealed();
        let first = round.revealed_at();
        let again = round.into_revealed();
        assert!(first.is_some());
        assert_eq!(again.revealed_at(), first);
        assert_eq!(again.server_seed(), "seed");
    }
}
