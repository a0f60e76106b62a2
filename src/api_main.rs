//! Fairplay API Server Binary
//!
//! Standalone HTTP API for provably fair game rounds.

use clap::Parser;
use fairplay::api::ApiServer;
use fairplay::config::{self, ConfigLoader};

#[derive(Parser, Debug)]
#[command(name = "fairplay-api")]
#[command(about = "Provably fair game engine API server", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// API server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// API server port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Allowed CORS origins (comma-separated, use * for all)
    #[arg(long)]
    cors_origins: Option<String>,

    /// Write the default configuration to this path and exit
    #[arg(long)]
    write_sample_config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fairplay=info,fairplay_api=info,tower_http=info".into()),
        )
        .init();

    if let Some(path) = args.write_sample_config {
        config::generate_sample_config(&path)?;
        tracing::info!("Sample configuration written to {}", path);
        return Ok(());
    }

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_path(path);
    }
    let mut config = loader.load()?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(origins) = args.cors_origins {
        config.server.allowed_origins = origins.split(',').map(|s| s.trim().to_string()).collect();
    }
    config::validate(&config)?;

    let server = ApiServer::new(config)?;
    server.run().await?;

    Ok(())
}
