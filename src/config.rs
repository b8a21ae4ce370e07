use crate::p1ib_client::DEFAULT_ADDRESS;
use std::env;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Runtime settings of the bridge binary, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeConfig {
    /// `P1IB_ADDRESS`, host or host:port.
    pub address: String,
    /// `P1IB_POLL_INTERVAL_SECS`
    pub poll_interval: Duration,
    /// `P1IB_REQUEST_TIMEOUT_SECS`
    pub request_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl BridgeConfig {
    pub fn from_env() -> Self {
        let address = env::var("P1IB_ADDRESS")
            .ok()
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let poll_interval = parse_secs_safe(
            env::var("P1IB_POLL_INTERVAL_SECS").ok(),
            DEFAULT_POLL_INTERVAL,
        );
        let request_timeout = parse_secs_safe(
            env::var("P1IB_REQUEST_TIMEOUT_SECS").ok(),
            DEFAULT_REQUEST_TIMEOUT,
        );

        Self {
            address,
            poll_interval,
            request_timeout,
        }
    }
}

/// Parses a positive number of seconds, falling back to `default` otherwise
fn parse_secs_safe(val: Option<String>, default: Duration) -> Duration {
    val.and_then(|val| val.trim().parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
        .unwrap_or(default)
}
