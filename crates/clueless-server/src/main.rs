//! Clue-Less game server.

use clueless_server::config::ServerConfig;
use clueless_server::server::{self, ServerState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    info!(
        players = config.players,
        bots = config.bots,
        "Starting Clue-Less server..."
    );

    let state = Arc::new(ServerState::new(config));

    server::run_server(state).await
}
