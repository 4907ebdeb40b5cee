//! HTTP API handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use custody_core::Address;
use rps_core::{crypto, Committed, MatchId, MatchView, Move};
use tracing::info;

use crate::error::{ApiError, ApiJson};
use crate::models::*;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

fn parse_match_id(raw: &str) -> Result<MatchId, ApiError> {
    raw.parse().map_err(ApiError::bad_hex("match id"))
}

fn parse_address(raw: &str) -> Result<Address, ApiError> {
    raw.parse().map_err(ApiError::bad_hex("address"))
}

fn respond(state: &AppState, match_id: MatchId, committed: Committed) -> Json<TransitionResponse> {
    state.record(match_id, &committed);
    Json(TransitionResponse {
        seq: committed.seq,
        event: committed.transition.event,
        payouts: committed.transition.payouts,
    })
}

// ============ Queries ============

pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    let config = state.escrow().config();
    Json(ConfigResponse {
        min_stake: config.min_stake(),
        max_stake: config.max_stake(),
        min_deadline_window: config.min_deadline_window(),
    })
}

/// Absent matches are reported as the zeroed view
pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MatchView> {
    let match_id = parse_match_id(&id)?;
    Ok(Json(state.escrow().view(&match_id).await))
}

pub async fn derive_move_commitment(
    ApiJson(req): ApiJson<MoveCommitmentRequest>,
) -> ApiResult<CommitmentResponse> {
    let mv = Move::from_code(req.mv)?;
    Ok(Json(CommitmentResponse {
        commitment: crypto::derive_move_commitment(&req.secret, mv, &req.identity),
    }))
}

pub async fn derive_match_id(ApiJson(req): ApiJson<MatchIdRequest>) -> ApiResult<MatchIdResponse> {
    Ok(Json(MatchIdResponse {
        match_id: crypto::derive_match_id(&req.secret, &req.identity),
    }))
}

// ============ Transitions ============

pub async fn start_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StartRequest>,
) -> ApiResult<TransitionResponse> {
    let match_id = parse_match_id(&id)?;
    let committed = state
        .escrow()
        .start(req.caller, match_id, req.commitment, req.deadline_window, req.value)
        .await?;
    Ok(respond(&state, match_id, committed))
}

pub async fn join_match(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<JoinRequest>,
) -> ApiResult<TransitionResponse> {
    let match_id = parse_match_id(&id)?;
    let mv = Move::from_code(req.mv)?;
    let committed = state.escrow().join(req.caller, match_id, mv, req.value).await?;
    Ok(respond(&state, match_id, committed))
}

pub async fn reveal_move(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<RevealRequest>,
) -> ApiResult<TransitionResponse> {
    let match_id = parse_match_id(&id)?;
    let mv = Move::from_code(req.mv)?;
    let committed = state
        .escrow()
        .reveal(req.caller, match_id, &req.secret, mv)
        .await?;
    Ok(respond(&state, match_id, committed))
}

pub async fn claim_forfeit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ForfeitRequest>,
) -> ApiResult<TransitionResponse> {
    let match_id = parse_match_id(&id)?;
    let committed = state.escrow().claim_forfeit(req.caller, match_id).await?;
    Ok(respond(&state, match_id, committed))
}

// ============ Events ============

pub async fn list_events(State(state): State<AppState>) -> Json<EventsResponse> {
    Json(EventsResponse {
        events: state.events(),
    })
}

// ============ Accounts ============

pub async fn get_account(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<AccountResponse> {
    let address = parse_address(&address)?;
    Ok(Json(AccountResponse {
        balance: state.custody().balance_of(&address),
        address,
    }))
}

/// Faucet for local play
pub async fn fund_account(
    State(state): State<AppState>,
    Path(address): Path<String>,
    ApiJson(req): ApiJson<FundRequest>,
) -> ApiResult<AccountResponse> {
    let address = parse_address(&address)?;
    let balance = state.custody().credit(&address, req.amount)?;
    info!(%address, amount = req.amount, balance, "Account funded");
    Ok(Json(AccountResponse { address, balance }))
}

// ============ System ============

pub async fn get_clock(State(state): State<AppState>) -> Json<ClockResponse> {
    Json(ClockResponse {
        now: state.escrow().now().await,
    })
}

pub async fn tick(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TickRequest>,
) -> ApiResult<ClockResponse> {
    let now = state
        .advance(req.ticks)
        .ok_or_else(|| ApiError::Conflict("clock follows wall time and cannot be advanced".into()))?;
    info!(ticks = req.ticks, now, "Clock advanced");
    Ok(Json(ClockResponse { now }))
}

pub async fn health() -> &'static str {
    "ok"
}
