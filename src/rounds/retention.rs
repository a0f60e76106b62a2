//! Background eviction of revealed rounds
//!
//! Revealed rounds carry a TTL set at reveal time. Reads already treat
//! expired entries as absent; the sweeper reclaims their memory.

use crate::metrics::EngineMetrics;
use crate::rounds::store::RoundStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub struct RetentionSweeper {
    store: Arc<dyn RoundStore>,
    metrics: Arc<EngineMetrics>,
    interval: Duration,
    running: Arc<AtomicBool>,
}

impl RetentionSweeper {
    pub fn new(
        store: Arc<dyn RoundStore>,
        metrics: Arc<EngineMetrics>,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            metrics,
            interval,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Start sweeping on the current runtime
    pub fn spawn(
        store: Arc<dyn RoundStore>,
        metrics: Arc<EngineMetrics>,
        interval: Duration,
    ) -> Arc<Self> {
        let sweeper = Arc::new(Self::new(store, metrics, interval));
        sweeper.clone().spawn_task();
        sweeper
    }

    fn spawn_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(self.interval);
            // The first tick completes immediately.
            tick.tick().await;

            while self.running.load(Ordering::SeqCst) {
                tick.tick().await;
                if !self.running.load(Ordering::SeqCst) {
                    break;
                }
                self.sweep_once().await;
            }
            tracing::debug!("Retention sweeper stopped");
        });
    }

    /// Purge expired rounds once, returning how many were evicted
    pub async fn sweep_once(&self) -> usize {
        match self.store.purge_expired().await {
            Ok(0) => 0,
            Ok(evicted) => {
                self.metrics.record_rounds_evicted(evicted);
                tracing::info!(evicted, "Evicted revealed rounds");
                evicted
            }
            Err(e) => {
                tracing::warn!(error = %e, "Round sweep failed");
                0
            }
        }
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rounds::commitment::SeedCommitment;
    use crate::rounds::store::InMemoryRoundStore;

    #[tokio::test]
    async fn test_sweep_evicts_only_revealed_rounds() {
        let store: Arc<dyn RoundStore> = Arc::new(InMemoryRoundStore::new());
        let commitment = SeedCommitment::new(store.clone(), Duration::ZERO);
        let metrics = Arc::new(EngineMetrics::new());

        let kept = commitment.open_round().await.unwrap();
        let revealed = commitment.open_round().await.unwrap();
        commitment.reveal(&revealed.round_id).await.unwrap();

        let sweeper =
            RetentionSweeper::new(store.clone(), metrics.clone(), Duration::from_secs(60));
        assert_eq!(sweeper.sweep_once().await, 1);
        assert_eq!(store.len().await.unwrap(), 1);
        assert!(commitment.round(&kept.round_id).await.is_ok());
        assert!(metrics.to_prometheus_format().contains("fairplay_rounds_evicted_total 1"));
    }

    #[tokio::test]
    async fn test_spawned_sweeper_runs_and_stops() {
        let store: Arc<dyn RoundStore> = Arc::new(InMemoryRoundStore::new());
        let commitment = SeedCommitment::new(store.clone(), Duration::ZERO);
        let opened = commitment.open_round().await.unwrap();
        commitment.reveal(&opened.round_id).await.unwrap();

        let sweeper = RetentionSweeper::spawn(
            store.clone(),
            Arc::new(EngineMetrics::new()),
            Duration::from_millis(10),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.len().await.unwrap(), 0);

        sweeper.stop();
        assert!(!sweeper.is_running());
    }
}
