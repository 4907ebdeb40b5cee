//! RPS Escrow Service
//!
//! HTTP surface over the match escrow: queries, transitions, the event log
//! and account balances for the front-end.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use handlers::*;
pub use config::{ClockMode, ServiceConfig};
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Queries
        .route("/api/config", get(get_config))
        .route("/api/matches/:id", get(get_match))
        .route("/api/commitments/move", post(derive_move_commitment))
        .route("/api/commitments/match-id", post(derive_match_id))
        // Transitions
        .route("/api/matches/:id/start", post(start_match))
        .route("/api/matches/:id/join", post(join_match))
        .route("/api/matches/:id/reveal", post(reveal_move))
        .route("/api/matches/:id/forfeit", post(claim_forfeit))
        // Events
        .route("/api/events", get(list_events))
        // Accounts
        .route("/api/accounts/:address", get(get_account))
        .route("/api/accounts/:address/fund", post(fund_account))
        // System
        .route("/api/system/clock", get(get_clock))
        .route("/api/system/tick", post(tick))
        // Health
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
