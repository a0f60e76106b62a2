//! Route Definitions
//!
//! Maps URLs to handlers with type-safe routing.

use super::handlers::*;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness and Prometheus scrape
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        // Round lifecycle
        .route("/api/rounds", post(open_round_handler))
        .route("/api/rounds/:round_id", get(round_info_handler))
        .route("/api/rounds/:round_id/reveal", post(reveal_handler))
        .route("/api/rounds/:round_id/draw", post(draw_handler))
        // Games
        .route("/api/rounds/:round_id/coinflip", post(coinflip_handler))
        .route("/api/rounds/:round_id/dice", post(dice_handler))
        .route("/api/rounds/:round_id/limbo", post(limbo_handler))
        .route("/api/rounds/:round_id/crash", post(crash_handler))
        .route("/api/rounds/:round_id/slots", post(slots_handler))
        .route("/api/rounds/:round_id/mines", post(mines_handler))
        .route("/api/rounds/:round_id/blackjack", post(blackjack_handler))
        // Offline verification and catalogue
        .route("/api/verify", post(verify_handler))
        .route("/api/games", get(catalogue_handler))
        .with_state(state)
}
