//! Car Status Hub - Main Entry Point

use status_hub::{init_logging, Hub, HubConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== Car Status Hub v{} ===", env!("CARGO_PKG_VERSION"));

    let config = HubConfig::load()?;
    let hub = Hub::spawn(config)?;
    hub.join().await;

    Ok(())
}
