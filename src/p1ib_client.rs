use crate::error::{ConnectionError, P1ibError, Result};
use crate::meter_payload::MeterPayload;
use crate::meter_reading::{build_reading, MeterReading};
use serde::de::DeserializeOwned;
use serde_derive::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;

pub const DEFAULT_ADDRESS: &str = "p1ib.local";

/// HTTP connector for one P1ib bridge.
///
/// Clones share the same address cell, so a settings or discovery update made
/// through any clone is seen by the next request of every other clone.
/// Requests read a snapshot of the address when they start.
#[derive(Clone)]
pub struct P1ibConnector {
    address: Arc<watch::Sender<String>>,
    client: reqwest::Client,
}

impl P1ibConnector {
    pub fn new(address: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(P1ibError::HttpClient)?;
        let (address, _) = watch::channel(address.into());
        Ok(Self {
            address: Arc::new(address),
            client,
        })
    }

    pub fn address(&self) -> String {
        self.address.borrow().clone()
    }

    pub fn set_address(&self, address: impl Into<String>) {
        let address = address.into();
        debug!(%address, "P1ib address updated");
        self.address.send_replace(address);
    }

    /// Subscribes to address changes.
    pub fn watch_address(&self) -> watch::Receiver<String> {
        self.address.subscribe()
    }

    pub async fn get_device_info(&self) -> Result<DeviceInfo> {
        self.get_json("deviceInfo").await
    }

    /// Fetches `/meterData` undecoded, for diagnostics.
    pub async fn read_raw_meter_data(&self) -> Result<serde_json::Value> {
        self.get_json("meterData").await
    }

    pub async fn read_meter_data(&self) -> Result<MeterReading> {
        let document = self.read_raw_meter_data().await?;
        let payload = MeterPayload::classify(&document);
        if payload == MeterPayload::Unknown {
            debug!("meter data matches no known layout");
        }
        build_reading(&payload)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("http://{}/{}", self.address(), path);
        let result = self.fetch::<T>(&url).await;
        result.map_err(|source| ConnectionError { url, source }.into())
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> reqwest::Result<T> {
        self.client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await
    }
}

/// Response of `/deviceInfo`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub mac_address: String,
    pub version: String,
    pub hw_revision: String,
    pub feat_external_antenna: bool,
    pub feat_pass_through: bool,
    pub feat_ethernet: bool,
}

#[cfg(test)]
mod test_p1ib_connector {
    use super::*;

    const NEW_FORMAT_BODY: &str = r#"
        {
            "d": {
                "1-0:1.7.0": [0, 0, 0, 0, 0, 0, 0, 0, 0, 1.234],
                "1-0:2.7.0": [0, 0, 0, 0, 0, 0, 0, 0, 0, 0.0],
                "1-0:32.7.0": [0, 0, 0, 0, 0, 0, 0, 0, 0, 229.8]
            },
            "last_ok_interval": 10,
            "info": { "ip": "192.168.1.40", "rssi": -61, "meter": "ISK5" }
        }
    "#;

    fn host_of(server: &mockito::Server) -> String {
        server.host_with_port()
    }

    fn connector(server: &mockito::Server) -> P1ibConnector {
        P1ibConnector::new(host_of(server), Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_get_device_info() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/deviceInfo")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"
                {
                    "mac_address": "AA:BB:CC:DD:EE:FF",
                    "version": "1.4.2",
                    "hw_revision": "C",
                    "feat_external_antenna": true,
                    "feat_pass_through": false,
                    "feat_ethernet": false
                }
            "#,
            )
            .create_async()
            .await;

        let info = connector(&server).get_device_info().await.unwrap();

        assert_eq!(info.mac_address, "AA:BB:CC:DD:EE:FF");
        assert_eq!(info.version, "1.4.2");
        assert_eq!(info.hw_revision, "C");
        assert!(info.feat_external_antenna);
        assert!(!info.feat_pass_through);
        assert!(!info.feat_ethernet);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_read_meter_data() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/meterData")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(NEW_FORMAT_BODY)
            .create_async()
            .await;

        let reading = connector(&server).read_meter_data().await.unwrap();

        assert_eq!(reading.momentary_power_import, 1.234 * 1000.0);
        assert_eq!(reading.momentary_power_export, 0.0);
        assert_eq!(reading.voltage_l1, 229.8);
        assert_eq!(reading.rssi, -61.0);

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_server_error_is_connection_error() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/meterData")
            .with_status(500)
            .create_async()
            .await;

        let result = connector(&server).read_meter_data().await;
        assert!(matches!(result, Err(P1ibError::Connection(_))));
    }

    #[tokio::test]
    async fn test_invalid_json_is_connection_error() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/deviceInfo")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let result = connector(&server).get_device_info().await;
        let Err(P1ibError::Connection(error)) = result else {
            panic!("expected a connection error");
        };
        assert!(error.url.ends_with("/deviceInfo"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_connection_error() {
        let connector = P1ibConnector::new("127.0.0.1:1", Duration::from_millis(500)).unwrap();
        let result = connector.get_device_info().await;
        assert!(matches!(result, Err(P1ibError::Connection(_))));
    }

    #[tokio::test]
    async fn test_request_timeout_is_applied() {
        // Accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let _silent = tokio::spawn(async move {
            let mut open = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                open.push(stream);
            }
        });

        let connector = P1ibConnector::new(address, Duration::from_millis(200)).unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), connector.read_meter_data())
            .await
            .expect("request timeout was not applied");
        let Err(P1ibError::Connection(error)) = result else {
            panic!("expected a connection error");
        };
        assert!(error.source.is_timeout());
    }

    #[tokio::test]
    async fn test_unknown_layout_without_rssi() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", "/meterData")
            .with_status(200)
            .with_body(r#"{"foo": "bar"}"#)
            .create_async()
            .await;

        let result = connector(&server).read_meter_data().await;
        assert!(matches!(result, Err(P1ibError::MissingSignalStrength)));
    }

    #[tokio::test]
    async fn test_set_address_repoints_clones() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/meterData")
            .with_status(200)
            .with_body(NEW_FORMAT_BODY)
            .create_async()
            .await;

        let connector = P1ibConnector::new("127.0.0.1:1", Duration::from_millis(500)).unwrap();
        let shared = connector.clone();
        let mut changes = connector.watch_address();

        shared.set_address(host_of(&server));

        assert!(changes.has_changed().unwrap());
        assert_eq!(*changes.borrow_and_update(), host_of(&server));
        assert_eq!(connector.address(), host_of(&server));
        assert!(connector.read_meter_data().await.is_ok());

        mock.assert_async().await;
    }
}
