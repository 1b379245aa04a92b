use anyhow::{anyhow, Result};
use tracing::{debug, info};

use cloudcost_plugin_aws::{logging, PluginConfig, PluginServer, PricingCatalog};

#[tokio::main]
async fn main() -> Result<()> {
    let config = PluginConfig::from_env()?;
    logging::setup_logging(&config.log_level)?;

    if config.test_mode {
        debug!("test mode enabled, emitting extra debug logs");
    }

    // Eager initialization: a corrupted critical pricing blob must fail the
    // process before the port is announced.
    let catalog = PricingCatalog::get().map_err(|e| anyhow!(e.to_string()))?;
    info!(
        region = catalog.region(),
        ec2_instances = catalog.ec2_instance_count(),
        "pricing catalog ready"
    );

    let server = PluginServer::bind(config).await?;
    server.run().await
}
