//! btleplug-backed transport - drives the host Bluetooth adapter.
//!
//! Scanning is window-based: advertisements accumulate while the scan is
//! active, then the adapter's peripheral cache is read back.  Disconnect
//! detection rides on the adapter event stream rather than the notification
//! stream, since BlueZ keeps the latter open after a peer drops.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{Central, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::stream::{Stream, StreamExt};
use log::debug;
use uuid::Uuid;

use crate::ble::transport::{LinkEvents, PatchLink, PatchTransport};
use crate::ble::{DiscoveredPatch, LinkEvent, PatchId};
use crate::config;
use crate::error::TransportError;

/// The real transport: first Bluetooth adapter on the host.
pub struct BleTransport {
    adapter: Adapter,
    char_uuid: Uuid,
}

impl BleTransport {
    /// Open the first Bluetooth adapter on the host.
    pub async fn new() -> Result<Self, TransportError> {
        let manager = Manager::new()
            .await
            .map_err(|e| TransportError::Backend(e.to_string()))?;
        let adapters = manager
            .adapters()
            .await
            .map_err(|e| TransportError::Backend(e.to_string()))?;
        let adapter = adapters.into_iter().next().ok_or(TransportError::NoAdapter)?;

        let char_uuid = Uuid::parse_str(config::TELEMETRY_CHAR_UUID)
            .map_err(|e| TransportError::Backend(e.to_string()))?;

        Ok(Self { adapter, char_uuid })
    }

    /// Re-locate a previously discovered peripheral by its address.
    async fn find_peripheral(&self, id: &PatchId) -> Result<Peripheral, TransportError> {
        let peripherals = self
            .adapter
            .peripherals()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        for peripheral in peripherals {
            if peripheral.address().to_string() == id.as_str() {
                return Ok(peripheral);
            }
        }
        Err(TransportError::Connect(format!("{id} is no longer in range")))
    }
}

#[async_trait]
impl PatchTransport for BleTransport {
    type Link = BleLink;

    async fn scan(&self, window: Duration) -> Result<Vec<DiscoveredPatch>, TransportError> {
        self.adapter
            .start_scan(ScanFilter::default())
            .await
            .map_err(|e| TransportError::Scan(e.to_string()))?;
        tokio::time::sleep(window).await;
        if let Err(e) = self.adapter.stop_scan().await {
            debug!("stop_scan failed: {e}");
        }

        let peripherals = self
            .adapter
            .peripherals()
            .await
            .map_err(|e| TransportError::Scan(e.to_string()))?;

        let mut found = Vec::new();
        for peripheral in peripherals {
            let Ok(Some(props)) = peripheral.properties().await else {
                continue;
            };
            // Nameless advertisements cannot match the prefix filter.
            let Some(name) = props.local_name else { continue };
            found.push(DiscoveredPatch {
                id: PatchId::new(props.address.to_string()),
                name,
            });
        }
        Ok(found)
    }

    async fn connect(&self, patch: &DiscoveredPatch) -> Result<BleLink, TransportError> {
        let peripheral = self.find_peripheral(&patch.id).await?;

        let connected = peripheral
            .is_connected()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        if !connected {
            peripheral
                .connect()
                .await
                .map_err(|e| TransportError::Connect(e.to_string()))?;
        }

        // Grab the adapter event stream now so no disconnect can slip
        // between connect and subscribe.
        let central_events = self
            .adapter
            .events()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        Ok(BleLink {
            peripheral,
            central_events: Some(central_events),
            char_uuid: self.char_uuid,
        })
    }
}

/// One live GATT connection to a patch.
pub struct BleLink {
    peripheral: Peripheral,
    central_events: Option<Pin<Box<dyn Stream<Item = CentralEvent> + Send>>>,
    char_uuid: Uuid,
}

impl BleLink {
    fn telemetry_characteristic(&self) -> Option<Characteristic> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == self.char_uuid)
    }
}

#[async_trait]
impl PatchLink for BleLink {
    async fn subscribe(&mut self) -> Result<LinkEvents, TransportError> {
        self.peripheral
            .discover_services()
            .await
            .map_err(|e| TransportError::Subscribe(e.to_string()))?;

        let characteristic = self
            .telemetry_characteristic()
            .ok_or_else(|| TransportError::CharacteristicNotFound(self.char_uuid.to_string()))?;

        let notifications = self
            .peripheral
            .notifications()
            .await
            .map_err(|e| TransportError::Subscribe(e.to_string()))?;
        self.peripheral
            .subscribe(&characteristic)
            .await
            .map_err(|e| TransportError::Subscribe(e.to_string()))?;

        let central_events = self
            .central_events
            .take()
            .ok_or_else(|| TransportError::Subscribe("link already subscribed".into()))?;

        let char_uuid = self.char_uuid;
        let frames = notifications.filter_map(move |n| {
            futures::future::ready((n.uuid == char_uuid).then(|| LinkEvent::Frame(n.value)))
        });

        let peripheral_id = self.peripheral.id();
        let disconnects = central_events.filter_map(move |event| {
            futures::future::ready(match event {
                CentralEvent::DeviceDisconnected(id) if id == peripheral_id => {
                    Some(LinkEvent::Disconnected)
                }
                _ => None,
            })
        });

        Ok(futures::stream::select(frames, disconnects).boxed())
    }

    async fn disconnect(&mut self) {
        if let Err(e) = self.peripheral.disconnect().await {
            debug!("disconnect from {} failed: {e}", self.peripheral.address());
        }
    }
}
