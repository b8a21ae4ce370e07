use p1ib_bridge::{BridgeConfig, DeviceUpdate, MeterPoller, P1ibConnector};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = BridgeConfig::from_env();
    info!(?config, "Starting P1ib bridge");

    let connector = P1ibConnector::new(config.address.clone(), config.request_timeout)?;
    match connector.get_device_info().await {
        Ok(device_info) => info!(
            mac = %device_info.mac_address,
            version = %device_info.version,
            hw_revision = %device_info.hw_revision,
            "Connected to P1ib"
        ),
        Err(e) => warn!("Could not read P1ib device info: {e}"),
    }

    let (update_tx, mut update_rx) = mpsc::channel(32);
    let poller = MeterPoller::new(connector, config.poll_interval, update_tx).spawn();

    while let Some(update) = update_rx.recv().await {
        match update {
            DeviceUpdate::Reading { capabilities, .. } => {
                for capability in capabilities {
                    info!(capability = capability.id, value = capability.value);
                }
            }
            DeviceUpdate::Unavailable(reason) => warn!(%reason, "P1ib unavailable"),
        }
    }

    poller.await?;
    Ok(())
}
