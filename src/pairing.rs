use crate::discovery::{DiscoveryResult, PairedDevice};
use crate::error::Result;
use crate::p1ib_client::{DeviceInfo, P1ibConnector};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum PairingList {
    Discovered(Vec<PairedDevice>),
    /// Nothing was discovered; the user has to enter an address.
    ManualEntry,
}

/// Pairing state of the P1ib driver.
pub struct PairingSession {
    request_timeout: Duration,
    discovered: Option<PairedDevice>,
}

impl PairingSession {
    pub fn new(request_timeout: Duration) -> Self {
        Self {
            request_timeout,
            discovered: None,
        }
    }

    /// Feeds one raw discovery event. Returns false if it was ignored.
    pub fn handle_discovery_value(&mut self, value: &Value) -> bool {
        match DiscoveryResult::from_value(value) {
            Some(result) => {
                let device = result.to_paired_device();
                info!(name = %device.name, address = %device.p1ib_address, "stored discovery result");
                self.discovered = Some(device);
                true
            }
            None => {
                debug!(%value, "incompatible discovery result skipped");
                false
            }
        }
    }

    /// Probes `/deviceInfo` on a manually entered address.
    pub async fn test_connection(&self, address: &str) -> Result<DeviceInfo> {
        let connector = P1ibConnector::new(address, self.request_timeout)?;
        match connector.get_device_info().await {
            Ok(device_info) => {
                info!(address, version = %device_info.version, "test connection succeeded");
                Ok(device_info)
            }
            Err(e) => {
                warn!(address, "test connection failed: {e}");
                Err(e)
            }
        }
    }

    pub fn list_devices(&self) -> PairingList {
        match &self.discovered {
            Some(device) => PairingList::Discovered(vec![device.clone()]),
            None => {
                info!("no devices found, switching to manual entry");
                PairingList::ManualEntry
            }
        }
    }
}
