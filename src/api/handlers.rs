//! Request Handlers
//!
//! Thin adapters from HTTP to `RoundLifecycleService`. Every engine error
//! maps onto a stable error code through `ApiError`.

use super::{errors::ApiError, middleware::RequestId, models::*};
use crate::errors::FairplayResult;
use crate::games::types::*;
use crate::games::validate;
use crate::games::verify::VerificationReport;
use crate::metrics::EngineMetrics;
use crate::rounds::{DrawResult, RevealedSeed, RoundCommitment, RoundInfo, RoundLifecycleService};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub service: Arc<RoundLifecycleService>,
    pub metrics: Arc<EngineMetrics>,
    pub version: String,
}

impl AppState {
    pub fn new(service: Arc<RoundLifecycleService>) -> Self {
        Self {
            metrics: service.metrics(),
            service,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Unwrap a JSON body, turning extractor rejections into `BAD_REQUEST`
fn body<T>(request_id: &RequestId, payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| ApiError::from_rejection(request_id.0.clone(), rejection))
}

fn respond<T>(request_id: &RequestId, result: FairplayResult<T>) -> ApiResult<T> {
    result
        .map(Json)
        .map_err(|e| ApiError::engine(request_id.0.clone(), e))
}

fn parse_nonce(request_id: &RequestId, draw: &DrawRequest) -> Result<u64, ApiError> {
    validate::nonce(&draw.nonce).map_err(|e| ApiError::engine(request_id.0.clone(), e))
}

/// Health check handler
/// GET /health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Running".to_string(),
        version: state.version.clone(),
    })
}

/// Prometheus text export
/// GET /metrics
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics.to_prometheus_format(),
    )
        .into_response()
}

/// Game catalogue with RTP and slots scale factor
/// GET /api/games
pub async fn catalogue_handler(State(state): State<Arc<AppState>>) -> Json<CatalogueResponse> {
    Json(CatalogueResponse {
        games: state.service.catalogue(),
    })
}

/// Open a round and publish its seed commitment
/// POST /api/rounds
pub async fn open_round_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<RoundCommitment>), ApiError> {
    let opened = respond(&request_id, state.service.open_round().await)?;
    Ok((StatusCode::CREATED, opened))
}

/// GET /api/rounds/:round_id
pub async fn round_info_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(round_id): Path<String>,
) -> ApiResult<RoundInfo> {
    respond(&request_id, state.service.round_info(&round_id).await)
}

/// POST /api/rounds/:round_id/reveal
pub async fn reveal_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(round_id): Path<String>,
) -> ApiResult<RevealedSeed> {
    respond(&request_id, state.service.reveal(&round_id).await)
}

/// POST /api/rounds/:round_id/draw
pub async fn draw_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(round_id): Path<String>,
    payload: Result<Json<DrawRequest>, JsonRejection>,
) -> ApiResult<DrawResult> {
    let request = body(&request_id, payload)?;
    let nonce = parse_nonce(&request_id, &request)?;
    respond(
        &request_id,
        state.service.draw(&round_id, &request.client_seed, nonce).await,
    )
}

/// POST /api/rounds/:round_id/coinflip
pub async fn coinflip_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(round_id): Path<String>,
    payload: Result<Json<CoinFlipRequest>, JsonRejection>,
) -> ApiResult<Settled<CoinFlipOutcome>> {
    let request = body(&request_id, payload)?;
    let nonce = parse_nonce(&request_id, &request.draw)?;
    respond(
        &request_id,
        state
            .service
            .play_coinflip(
                &round_id,
                &request.draw.client_seed,
                nonce,
                request.bet_amount,
                request.choice,
            )
            .await,
    )
}

/// POST /api/rounds/:round_id/dice
pub async fn dice_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(round_id): Path<String>,
    payload: Result<Json<DiceRequest>, JsonRejection>,
) -> ApiResult<Settled<DiceOutcome>> {
    let request = body(&request_id, payload)?;
    let nonce = parse_nonce(&request_id, &request.draw)?;
    respond(
        &request_id,
        state
            .service
            .play_dice(
                &round_id,
                &request.draw.client_seed,
                nonce,
                request.bet_amount,
                request.mode,
                request.target,
            )
            .await,
    )
}

/// POST /api/rounds/:round_id/limbo
pub async fn limbo_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(round_id): Path<String>,
    payload: Result<Json<LimboRequest>, JsonRejection>,
) -> ApiResult<Settled<LimboOutcome>> {
    let request = body(&request_id, payload)?;
    let nonce = parse_nonce(&request_id, &request.draw)?;
    respond(
        &request_id,
        state
            .service
            .play_limbo(
                &round_id,
                &request.draw.client_seed,
                nonce,
                request.bet_amount,
                request.target,
            )
            .await,
    )
}

/// POST /api/rounds/:round_id/crash
pub async fn crash_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(round_id): Path<String>,
    payload: Result<Json<DrawRequest>, JsonRejection>,
) -> ApiResult<Settled<CrashOutcome>> {
    let request = body(&request_id, payload)?;
    let nonce = parse_nonce(&request_id, &request)?;
    respond(
        &request_id,
        state.service.start_crash(&round_id, &request.client_seed, nonce).await,
    )
}

/// POST /api/rounds/:round_id/slots
pub async fn slots_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(round_id): Path<String>,
    payload: Result<Json<SlotsRequest>, JsonRejection>,
) -> ApiResult<Settled<SlotsOutcome>> {
    let request = body(&request_id, payload)?;
    let nonce = parse_nonce(&request_id, &request.draw)?;
    respond(
        &request_id,
        state
            .service
            .play_slots(&round_id, &request.draw.client_seed, nonce, request.bet_amount)
            .await,
    )
}

/// POST /api/rounds/:round_id/mines
pub async fn mines_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(round_id): Path<String>,
    payload: Result<Json<MinesRequest>, JsonRejection>,
) -> ApiResult<Settled<MinesOutcome>> {
    let request = body(&request_id, payload)?;
    let nonce = parse_nonce(&request_id, &request.draw)?;
    respond(
        &request_id,
        state
            .service
            .start_mines(&round_id, &request.draw.client_seed, nonce, request.mine_count)
            .await,
    )
}

/// POST /api/rounds/:round_id/blackjack
pub async fn blackjack_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    Path(round_id): Path<String>,
    payload: Result<Json<DrawRequest>, JsonRejection>,
) -> ApiResult<Settled<BlackjackDeal>> {
    let request = body(&request_id, payload)?;
    let nonce = parse_nonce(&request_id, &request)?;
    respond(
        &request_id,
        state.service.deal_blackjack(&round_id, &request.client_seed, nonce).await,
    )
}

/// Recompute a bet from disclosed seeds
/// POST /api/verify
pub async fn verify_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> ApiResult<VerificationReport> {
    let request = body(&request_id, payload)?;
    let nonce = parse_nonce(&request_id, &request.draw)?;
    respond(
        &request_id,
        state.service.verify(
            &request.server_seed,
            request.server_seed_hash.as_deref(),
            &request.draw.client_seed,
            nonce,
            request.params.as_ref(),
        ),
    )
}
