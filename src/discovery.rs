use serde_derive::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// TXT record announced by the P1ib over mDNS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryTxt {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    #[serde(default)]
    pub id: Option<String>,
    pub address: String,
    pub port: u16,
    pub txt: DiscoveryTxt,
}

/// What a paired device needs from a discovery event to follow its P1ib.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredAddress {
    #[serde(default)]
    pub id: Option<String>,
    pub address: String,
    pub port: u16,
}

impl DiscoveredAddress {
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn p1ib_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

/// A device entry ready to be offered during pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedDevice {
    pub name: String,
    pub id: String,
    pub p1ib_address: String,
}

impl DiscoveryResult {
    /// Accepts a raw discovery event only if it carries an address, a port and
    /// a TXT record with `id` and `name`.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn p1ib_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    pub fn discovered_address(&self) -> DiscoveredAddress {
        DiscoveredAddress {
            id: self.id.clone(),
            address: self.address.clone(),
            port: self.port,
        }
    }

    pub fn to_paired_device(&self) -> PairedDevice {
        PairedDevice {
            name: self.txt.name.clone(),
            id: self.txt.id.clone(),
            p1ib_address: self.p1ib_address(),
        }
    }
}
