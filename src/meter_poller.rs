use crate::capabilities::{capability_values, CapabilityValue};
use crate::error::{P1ibError, Result};
use crate::meter_reading::MeterReading;
use crate::p1ib_client::P1ibConnector;
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceUpdate {
    Reading {
        reading: MeterReading,
        capabilities: Vec<CapabilityValue>,
    },
    /// The poll failed; the device should be shown as unavailable.
    Unavailable(String),
}

/// Periodically polls a P1ib and forwards each outcome over a channel.
pub struct MeterPoller {
    connector: P1ibConnector,
    poll_interval: Duration,
    update_sender: Sender<DeviceUpdate>,
}

impl MeterPoller {
    pub fn new(
        connector: P1ibConnector,
        poll_interval: Duration,
        update_sender: Sender<DeviceUpdate>,
    ) -> Self {
        Self {
            connector,
            poll_interval,
            update_sender,
        }
    }

    /// Spawns the poller in its own task
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Main loop. Polls run strictly one after another; a slow poll delays
    /// the next tick instead of overlapping with it.
    pub async fn run(&self) {
        info!(
            address = %self.connector.address(),
            interval = ?self.poll_interval,
            "starting P1ib meter poller"
        );

        let mut read_interval = interval(self.poll_interval);
        read_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            read_interval.tick().await;

            let Some(update) = self.poll_once().await else {
                continue;
            };
            if self.update_sender.send(update).await.is_err() {
                info!("update receiver dropped, stopping P1ib meter poller");
                break;
            }
        }
    }

    /// Runs one poll cycle. Returns `None` when no address is configured.
    pub async fn poll_once(&self) -> Option<DeviceUpdate> {
        match self.read().await {
            Ok(reading) => {
                debug!(?reading, "meter reading");
                Some(DeviceUpdate::Reading {
                    reading,
                    capabilities: capability_values(&reading),
                })
            }
            Err(P1ibError::NoAddress) => {
                debug!("no address has been set, skipping update");
                None
            }
            Err(e) => {
                error!("P1ib poll failed: {e}");
                Some(DeviceUpdate::Unavailable(e.to_string()))
            }
        }
    }

    async fn read(&self) -> Result<MeterReading> {
        if self.connector.address().is_empty() {
            return Err(P1ibError::NoAddress);
        }
        self.connector.read_meter_data().await
    }
}
