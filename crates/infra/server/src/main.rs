//! NekoStats Server binary.

use nekostats_server::{load_config, ServerConfig, StatsServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from the optional path argument
    let config = match std::env::args().nth(1) {
        Some(path) => load_config(&path)?,
        None => ServerConfig::default(),
    };

    // Initialize tracing at the configured level
    let level: tracing::Level = config.log_level.parse().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    // Create and run server
    let server = StatsServer::new(config);
    server.run().await?;

    Ok(())
}
