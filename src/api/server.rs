//! API Server
//!
//! Wires the round service, middleware stack and retention sweeper into a
//! single axum server with graceful shutdown.

use super::{
    handlers::AppState,
    middleware::{create_cors_layer, request_id_middleware},
    routes::create_router,
};
use crate::config::{FairplayConfig, ServerConfig};
use crate::errors::FairplayResult;
use crate::rounds::{RetentionSweeper, RoundLifecycleService};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Router with the full middleware stack
pub fn build_app(state: Arc<AppState>, server: &ServerConfig) -> axum::Router {
    create_router(state)
        // Request ID middleware (first for tracing)
        .layer(axum::middleware::from_fn(request_id_middleware))
        // CORS layer (before timeout to handle preflight)
        .layer(create_cors_layer(server.allowed_origins.clone()))
        .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
}

pub struct ApiServer {
    config: FairplayConfig,
    service: Arc<RoundLifecycleService>,
}

impl ApiServer {
    pub fn new(config: FairplayConfig) -> FairplayResult<Self> {
        let service = Arc::new(RoundLifecycleService::from_config(&config)?);
        Ok(Self { config, service })
    }

    pub fn service(&self) -> Arc<RoundLifecycleService> {
        self.service.clone()
    }

    /// Start the API server
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.get_socket_addr()?;
        let sweeper = RetentionSweeper::spawn(
            self.service.store(),
            self.service.metrics(),
            Duration::from_secs(self.config.rounds.sweep_interval_secs),
        );

        let app = build_app(Arc::new(AppState::new(self.service.clone())), &self.config.server);

        info!("Starting Fairplay API Server");
        info!("   Listen: http://{}", addr);
        self.log_server_info();

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        sweeper.stop();
        info!("API Server stopped gracefully");
        Ok(())
    }

    fn get_socket_addr(&self) -> Result<SocketAddr, Box<dyn std::error::Error>> {
        Ok(SocketAddr::from((
            self.config.server.host.parse::<std::net::IpAddr>()?,
            self.config.server.port,
        )))
    }

    fn log_server_info(&self) {
        let rules = self.service.rules();
        info!("Server Configuration:");
        info!("   Version: {}", env!("CARGO_PKG_VERSION"));
        info!("   CORS: {:?}", self.config.server.allowed_origins);
        info!("   Request timeout: {}s", self.config.server.request_timeout_secs);
        info!("   Reveal policy: {:?}", self.config.rounds.reveal_policy);
        info!("   Reveal grace: {}s", self.config.rounds.reveal_grace_secs);
        info!(
            "   Slots: rtp {} scale {:.6}",
            rules.slots.rtp(),
            rules.slots.scale_factor()
        );

        info!("Available endpoints:");
        info!("   POST /api/rounds                 - Open round (commit seed)");
        info!("   GET  /api/rounds/:id             - Round info");
        info!("   POST /api/rounds/:id/reveal      - Reveal server seed");
        info!("   POST /api/rounds/:id/draw        - Raw draw (revealed rounds)");
        info!("   POST /api/rounds/:id/<game>      - Play a game");
        info!("        <game>: coinflip, dice, limbo, crash, slots, mines, blackjack");
        info!("   POST /api/verify                 - Offline verification");
        info!("   GET  /api/games                  - Game catalogue");
        info!("   GET  /health, /metrics");
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
