//! shield-rs: SMS spam classification server
//!
//! Usage: `shield-rs [CONFIG]`. Without an argument `shield.toml` is used
//! when present, otherwise the development defaults.

use shield_rs::logging::init_tracing;
use shield_rs::{ShieldConfig, ShieldServer};
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ShieldConfig::discover(config_path.as_deref())?;

    init_tracing(&config.logging)?;
    info!("Starting shield-rs v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("No config file specified, using shield.toml or development defaults"),
    }

    let server = ShieldServer::new(config)?;
    server.run().await?;

    Ok(())
}
