use crate::discovery::DiscoveredAddress;
use crate::p1ib_client::{P1ibConnector, DEFAULT_ADDRESS};
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, info};

/// Settings stored by the host for each paired device.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    #[serde(default)]
    pub p1ib_address: Option<String>,
}

impl DeviceSettings {
    pub fn address_or_default(&self) -> String {
        self.p1ib_address
            .clone()
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string())
    }
}

/// A paired P1ib and the connector it is polled through.
pub struct P1ibDevice {
    id: String,
    settings: DeviceSettings,
    connector: P1ibConnector,
}

impl P1ibDevice {
    pub fn new(id: impl Into<String>, settings: DeviceSettings, connector: P1ibConnector) -> Self {
        connector.set_address(settings.address_or_default());
        Self {
            id: id.into(),
            settings,
            connector,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn settings(&self) -> &DeviceSettings {
        &self.settings
    }

    pub fn connector(&self) -> &P1ibConnector {
        &self.connector
    }

    pub fn on_settings(&mut self, new_settings: DeviceSettings) {
        info!(device = %self.id, "P1ib settings were changed");
        self.connector.set_address(new_settings.address_or_default());
        self.settings = new_settings;
    }

    pub fn matches_discovery(&self, result: &DiscoveredAddress) -> bool {
        let is_match = result.id.as_deref() == Some(self.id.as_str());
        debug!(device = %self.id, is_match, "discovery result match");
        is_match
    }

    /// Handles a discovery "available" or "address changed" event.
    ///
    /// Returns true when the stored settings changed and need persisting.
    pub fn on_discovery_address(&mut self, result: &DiscoveredAddress) -> bool {
        let p1ib_address = result.p1ib_address();
        let changed = self.settings.p1ib_address.as_deref() != Some(p1ib_address.as_str());
        if changed {
            info!(device = %self.id, address = %p1ib_address, "P1ib address discovered");
            self.settings.p1ib_address = Some(p1ib_address.clone());
        }
        self.connector.set_address(p1ib_address);
        changed
    }
}
