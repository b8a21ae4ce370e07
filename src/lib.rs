//! P1ib Bridge Library
//!
//! This library polls a P1ib smart meter bridge over HTTP, normalises both of its
//! `/meterData` layouts into a single [`MeterReading`] and maps it onto host
//! capability channels.

pub mod capabilities;
pub mod config;
pub mod device;
pub mod discovery;
pub mod error;
pub mod meter_payload;
pub mod meter_poller;
pub mod meter_reading;
pub mod obis;
pub mod p1ib_client;
pub mod pairing;

// Re-export commonly used types for easier access
pub use config::BridgeConfig;
pub use error::{ConnectionError, P1ibError};
pub use meter_payload::MeterPayload;
pub use meter_poller::{DeviceUpdate, MeterPoller};
pub use meter_reading::{build_reading, MeterReading};
pub use p1ib_client::{DeviceInfo, P1ibConnector};
