//! Engine metrics with Prometheus text export

use crate::games::GameType;
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};

const GAME_COUNT: usize = 7;

fn game_slot(game: GameType) -> usize {
    match game {
        GameType::CoinFlip => 0,
        GameType::Dice => 1,
        GameType::Limbo => 2,
        GameType::Crash => 3,
        GameType::Slots => 4,
        GameType::Mines => 5,
        GameType::Blackjack => 6,
    }
}

/// f64 accumulator stored as raw bits
#[derive(Default)]
struct AtomicF64(AtomicU64);

impl AtomicF64 {
    fn add(&self, value: f64) {
        let _ = self.0.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
            Some((f64::from_bits(bits) + value).to_bits())
        });
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::SeqCst))
    }
}

#[derive(Default)]
pub struct EngineMetrics {
    rounds_opened: AtomicU64,
    rounds_revealed: AtomicU64,
    rounds_evicted: AtomicU64,
    rejected_requests: AtomicU64,
    bets: [AtomicU64; GAME_COUNT],
    wins: [AtomicU64; GAME_COUNT],
    wagered: [AtomicF64; GAME_COUNT],
    paid: [AtomicF64; GAME_COUNT],
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_round_opened(&self) {
        self.rounds_opened.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_round_revealed(&self) {
        self.rounds_revealed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_rounds_evicted(&self, count: usize) {
        self.rounds_evicted.fetch_add(count as u64, Ordering::SeqCst);
    }

    pub fn record_rejection(&self) {
        self.rejected_requests.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a resolved game; wager-less games pass `None`
    pub fn record_game(&self, game: GameType, wager: Option<(f64, bool, f64)>) {
        let slot = game_slot(game);
        self.bets[slot].fetch_add(1, Ordering::SeqCst);
        if let Some((bet_amount, won, payout)) = wager {
            if won {
                self.wins[slot].fetch_add(1, Ordering::SeqCst);
            }
            self.wagered[slot].add(bet_amount);
            self.paid[slot].add(payout);
        }
    }

    pub fn rounds_opened(&self) -> u64 {
        self.rounds_opened.load(Ordering::SeqCst)
    }

    pub fn rounds_revealed(&self) -> u64 {
        self.rounds_revealed.load(Ordering::SeqCst)
    }

    pub fn bets(&self, game: GameType) -> u64 {
        self.bets[game_slot(game)].load(Ordering::SeqCst)
    }

    /// Generate Prometheus metrics format
    pub fn to_prometheus_format(&self) -> String {
        let mut output = String::new();

        let counters = [
            (
                "fairplay_rounds_opened_total",
                "Rounds opened (seed committed)",
                &self.rounds_opened,
            ),
            (
                "fairplay_rounds_revealed_total",
                "Rounds whose seed was revealed",
                &self.rounds_revealed,
            ),
            (
                "fairplay_rounds_evicted_total",
                "Revealed rounds evicted after the grace period",
                &self.rounds_evicted,
            ),
            (
                "fairplay_rejected_requests_total",
                "Requests rejected by validation or lookup",
                &self.rejected_requests,
            ),
        ];
        for (name, help, value) in counters {
            let _ = write!(
                output,
                "# HELP {name} {help}\n# TYPE {name} counter\n{name} {}\n\n",
                value.load(Ordering::SeqCst)
            );
        }

        let _ = writeln!(output, "# HELP fairplay_bets_total Resolved games per game type");
        let _ = writeln!(output, "# TYPE fairplay_bets_total counter");
        for game in GameType::all() {
            let _ = writeln!(
                output,
                "fairplay_bets_total{{game=\"{}\"}} {}",
                game,
                self.bets(game)
            );
        }
        output.push('\n');

        let _ = writeln!(output, "# HELP fairplay_wins_total Winning bets per game type");
        let _ = writeln!(output, "# TYPE fairplay_wins_total counter");
        for game in GameType::all() {
            let _ = writeln!(
                output,
                "fairplay_wins_total{{game=\"{}\"}} {}",
                game,
                self.wins[game_slot(game)].load(Ordering::SeqCst)
            );
        }
        output.push('\n');

        let _ = writeln!(
            output,
            "# HELP fairplay_wagered_total Total amount wagered per game type"
        );
        let _ = writeln!(output, "# TYPE fairplay_wagered_total counter");
        for game in GameType::all() {
            let _ = writeln!(
                output,
                "fairplay_wagered_total{{game=\"{}\"}} {}",
                game,
                self.wagered[game_slot(game)].get()
            );
        }
        output.push('\n');

        let _ = writeln!(output, "# HELP fairplay_paid_total Total amount paid out per game type");
        let _ = writeln!(output, "# TYPE fairplay_paid_total counter");
        for game in GameType::all() {
            let _ = writeln!(
                output,
                "fairplay_paid_total{{game=\"{}\"}} {}",
                game,
                self.paid[game_slot(game)].get()
            );
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_export() {
        let metrics = EngineMetrics::new();
        metrics.record_round_opened();
        metrics.record_game(GameType::Dice, Some((2.0, true, 4.0)));
        metrics.record_game(GameType::Dice, Some((1.0, false, 0.0)));
        metrics.record_game(GameType::Blackjack, None);

        assert_eq!(metrics.rounds_opened(), 1);
        assert_eq!(metrics.bets(GameType::Dice), 2);

        let text = metrics.to_prometheus_format();
        assert!(text.contains("fairplay_rounds_opened_total 1"));
        assert!(text.contains("fairplay_bets_total{game=\"dice\"} 2"));
        assert!(text.contains("fairplay_wagered_total{game=\"dice\"} 3"));
        assert!(text.contains("fairplay_bets_total{game=\"blackjack\"} 1"));
    }
}
