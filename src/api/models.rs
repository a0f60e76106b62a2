//! API Request and Response Models
//!
//! Request bodies carry the nonce as raw JSON so that a fractional, negative
//! or non-numeric nonce surfaces as `INVALID_NONCE` instead of a generic
//! deserialization failure.

use crate::games::types::{CoinChoice, DiceMode, GameType};
use crate::games::verify::GameParams;
use crate::rounds::GameInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Fields shared by every draw-consuming request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawRequest {
    #[serde(default)]
    pub client_seed: String,
    #[serde(default)]
    pub nonce: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinFlipRequest {
    #[serde(flatten)]
    pub draw: DrawRequest,
    pub bet_amount: f64,
    pub choice: CoinChoice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRequest {
    #[serde(flatten)]
    pub draw: DrawRequest,
    pub bet_amount: f64,
    pub mode: DiceMode,
    pub target: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimboRequest {
    #[serde(flatten)]
    pub draw: DrawRequest,
    pub bet_amount: f64,
    pub target: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsRequest {
    #[serde(flatten)]
    pub draw: DrawRequest,
    pub bet_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinesRequest {
    #[serde(flatten)]
    pub draw: DrawRequest,
    pub mine_count: i64,
}

/// Offline recomputation of a settled bet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub server_seed: String,
    #[serde(default)]
    pub server_seed_hash: Option<String>,
    #[serde(flatten)]
    pub draw: DrawRequest,
    #[serde(default)]
    pub params: Option<GameParams>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueResponse {
    pub games: Vec<GameInfo>,
}

impl CatalogueResponse {
    pub fn find(&self, game: GameType) -> Option<&GameInfo> {
        self.games.iter().find(|info| info.game == game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nonce_kept_raw() {
        let request: DiceRequest = serde_json::from_value(json!({
            "clientSeed": "player1",
            "nonce": 1.5,
            "betAmount": 1.0,
            "mode": "under",
            "target": 7
        }))
        .unwrap();
        assert_eq!(request.draw.client_seed, "player1");
        assert_eq!(request.draw.nonce, json!(1.5));
        assert_eq!(request.mode, DiceMode::Under);
    }

    #[test]
    fn test_missing_seed_defaults_to_empty() {
        let request: DrawRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.client_seed.is_empty());
        assert!(request.nonce.is_null());
    }

    #[test]
    fn test_verify_request_with_params() {
        let request: VerifyRequest = serde_json::from_value(json!({
            "serverSeed": "abc",
            "clientSeed": "player1",
            "nonce": 0,
            "params": {"game": "mines", "mineCount": 3}
        }))
        .unwrap();
        assert_eq!(request.params, Some(GameParams::Mines { mine_count: 3 }));
        assert!(request.server_seed_hash.is_none());
    }
}
