//! RPS Arena Service
//!
//! Hosts a single arena instance over HTTP with a simulated currency ledger
//! and a simulated clock.

mod config;
mod handlers;
mod models;
mod state;

use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::ServiceConfig;
use state::AppState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::from_env();
    let arena_config = config.arena_config();
    tracing::info!("Arena instance: {}", arena_config.instance_id);
    tracing::info!("Arena owner: {}", config.owner);

    let state = AppState::new(arena_config, config.owner);
    let app = handlers::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Arena service starting on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
