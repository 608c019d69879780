//! Gridpop Verification Server
//!
//! Issues play sessions and verifies submitted scores by replaying the
//! client's step log against seeded boards.

use tracing::info;
use tracing_subscriber::EnvFilter;

use gridpop::config::ServerConfig;
use gridpop::network::run_server;
use gridpop::{GAME_TIME_SECS, GRID_COLS, GRID_ROWS, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();

    info!("Gridpop Server v{}", VERSION);
    info!("Board: {}x{} cells", GRID_COLS, GRID_ROWS);
    info!("Game Duration: {} seconds", GAME_TIME_SECS);
    info!(
        "Rate Limit: {} sessions/minute per address",
        config.rate_limit_per_minute
    );

    run_server(config).await
}
