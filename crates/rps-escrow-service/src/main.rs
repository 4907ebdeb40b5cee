//! RPS Escrow Service
//!
//! Serves the match escrow over HTTP with an in-memory custody ledger.

use std::net::SocketAddr;

use rps_escrow_service::{create_router, AppState, ServiceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        min_stake = config.escrow.min_stake(),
        max_stake = config.escrow.max_stake(),
        min_deadline_window = config.escrow.min_deadline_window(),
        clock = ?config.clock,
        "Escrow configured"
    );

    let state = AppState::with_clock_mode(config.escrow, config.clock);
    if let Some(interval) = config.block_interval {
        if state.spawn_block_producer(interval).is_some() {
            tracing::info!("Producing one block every {:?}", interval);
        } else {
            tracing::warn!("RPS_BLOCK_INTERVAL_MS ignored on wall clock");
        }
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Escrow service starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(state)).await
}
