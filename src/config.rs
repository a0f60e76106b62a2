//! Configuration management for the fairplay engine
//!
//! Defaults, an optional TOML file, then `FAIRPLAY_*` environment overrides,
//! validated once at load time.

use crate::errors::{ConfigurationError, FairplayResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FairplayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub rounds: RoundsConfig,
    #[serde(default)]
    pub games: GamesConfig,
    #[serde(default)]
    pub slots: SlotsConfig,
}

/// HTTP server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

/// When the server seed is disclosed
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RevealPolicy {
    /// Seed stays secret until an explicit reveal call, which seals the round
    Deferred,
    /// Every settling response discloses the seed and seals the round
    Immediate,
}

impl std::str::FromStr for RevealPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deferred" => Ok(RevealPolicy::Deferred),
            "immediate" => Ok(RevealPolicy::Immediate),
            other => Err(format!("unknown reveal policy '{}'", other)),
        }
    }
}

/// Round retention and reveal discipline
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundsConfig {
    pub reveal_policy: RevealPolicy,
    /// How long a revealed round stays readable before eviction
    pub reveal_grace_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for RoundsConfig {
    fn default() -> Self {
        Self {
            reveal_policy: RevealPolicy::Deferred,
            reveal_grace_secs: 3_600,
            sweep_interval_secs: 60,
        }
    }
}

/// Per-game return-to-player targets and limits
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
    pub coinflip_rtp: f64,
    pub dice_rtp: f64,
    pub limbo_rtp: f64,
    pub crash_rtp: f64,
    pub slots_rtp: f64,
    pub limbo_max_multiplier: f64,
    pub mines_grid_size: u8,
}

impl Default for GamesConfig {
    fn default() -> Self {
        Self {
            coinflip_rtp: 0.99,
            dice_rtp: 0.99,
            limbo_rtp: 0.99,
            crash_rtp: 0.97,
            slots_rtp: 0.96,
            limbo_max_multiplier: 1_000_000.0,
            mines_grid_size: 25,
        }
    }
}

/// Slots symbol set and raw paytable (scaled to `games.slots_rtp` at startup)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotsConfig {
    pub symbols: Vec<String>,
    pub triple_payouts: BTreeMap<String, f64>,
    pub pair_payout: f64,
}

impl Default for SlotsConfig {
    fn default() -> Self {
        let symbols = ["cherry", "lemon", "orange", "plum", "bell", "bar", "seven"];
        let payouts = [5.0, 8.0, 10.0, 15.0, 25.0, 50.0, 100.0];
        Self {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            triple_payouts: symbols
                .iter()
                .zip(payouts)
                .map(|(s, p)| (s.to_string(), p))
                .collect(),
            pair_payout: 2.0,
        }
    }
}

/// Configuration loader with environment variable support
#[derive(Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> FairplayResult<FairplayConfig> {
        let mut config = if let Some(ref path) = self.config_path {
            self.load_from_file(path)?
        } else {
            FairplayConfig::default()
        };

        self.apply_env_overrides(&mut config)?;
        validate(&config)?;

        Ok(config)
    }

    fn load_from_file(&self, path: &str) -> FairplayResult<FairplayConfig> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| {
                ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e))
            })?;

        toml::from_str(&content).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to parse TOML: {}", e)).into()
        })
    }

    fn apply_env_overrides(&self, config: &mut FairplayConfig) -> FairplayResult<()> {
        if let Ok(host) = env::var("FAIRPLAY_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = env::var("FAIRPLAY_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigurationError::InvalidValue {
                field: "FAIRPLAY_PORT".to_string(),
                value: port,
                reason: "Invalid port number".to_string(),
            })?;
        }
        if let Ok(policy) = env::var("FAIRPLAY_REVEAL_POLICY") {
            config.rounds.reveal_policy =
                policy.parse().map_err(|reason| ConfigurationError::InvalidValue {
                    field: "FAIRPLAY_REVEAL_POLICY".to_string(),
                    value: policy,
                    reason,
                })?;
        }
        if let Ok(grace) = env::var("FAIRPLAY_REVEAL_GRACE_SECS") {
            config.rounds.reveal_grace_secs =
                grace.parse().map_err(|_| ConfigurationError::InvalidValue {
                    field: "FAIRPLAY_REVEAL_GRACE_SECS".to_string(),
                    value: grace,
                    reason: "Invalid number of seconds".to_string(),
                })?;
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, config: &FairplayConfig, path: &str) -> FairplayResult<()> {
        let toml_string = toml::to_string_pretty(config)
            .map_err(|e| {
                ConfigurationError::SaveFailed(format!("Failed to serialize config: {}", e))
            })?;

        std::fs::write(path, toml_string).map_err(|e| {
            ConfigurationError::SaveFailed(format!("Failed to write to {}: {}", path, e)).into()
        })
    }
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Validate configuration values
pub fn validate(config: &FairplayConfig) -> FairplayResult<()> {
    if config.server.port == 0 {
        return Err(invalid("server.port", 0, "Port cannot be zero").into());
    }

    let games = &config.games;
    for (field, rtp) in [
        ("games.coinflip_rtp", games.coinflip_rtp),
        ("games.dice_rtp", games.dice_rtp),
        ("games.limbo_rtp", games.limbo_rtp),
        ("games.crash_rtp", games.crash_rtp),
        ("games.slots_rtp", games.slots_rtp),
    ] {
        if !(rtp > 0.0 && rtp <= 1.0) {
            return Err(invalid(field, rtp, "RTP must be in (0, 1]").into());
        }
    }

    if !(games.limbo_max_multiplier >= 2.0 && games.limbo_max_multiplier.is_finite()) {
        return Err(invalid(
            "games.limbo_max_multiplier",
            games.limbo_max_multiplier,
            "Must be a finite multiplier of at least 2",
        )
        .into());
    }

    if !(2..=64).contains(&games.mines_grid_size) {
        return Err(invalid(
            "games.mines_grid_size",
            games.mines_grid_size,
            "Grid size must be in [2, 64]",
        )
        .into());
    }

    if config.slots.symbols.is_empty() {
        return Err(ConfigurationError::MissingRequired("slots.symbols".to_string()).into());
    }
    // Builds the paytable once, which checks symbol references and raw EV.
    crate::games::slots::compute_scale_factor(&config.slots, games.slots_rtp)?;

    if config.rounds.sweep_interval_secs == 0 {
        return Err(
            invalid("rounds.sweep_interval_secs", 0, "Sweep interval cannot be zero").into(),
        );
    }

    Ok(())
}

/// Generate a sample configuration file
pub fn generate_sample_config(path: &str) -> FairplayResult<()> {
    ConfigLoader::new().save(&FairplayConfig::default(), path)
}
