//! Transport capability consumed by the hub.
//!
//! Scanning, connecting, and notification delivery are the only things the
//! core needs from a Bluetooth stack, so they are the whole trait surface.
//! Everything above this boundary is pure logic that runs identically over
//! the real adapter and an in-memory test double.

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;

use crate::ble::{DiscoveredPatch, LinkEvent};
use crate::error::TransportError;

/// Stream of events for one subscribed link.
///
/// Yields frames in arrival order, then a [`LinkEvent::Disconnected`] (or
/// end-of-stream) once the peer is gone.
pub type LinkEvents = Pin<Box<dyn Stream<Item = LinkEvent> + Send>>;

/// A Bluetooth stack able to enumerate and connect to patches.
#[async_trait]
pub trait PatchTransport: Send + Sync + 'static {
    type Link: PatchLink;

    /// Enumerate currently observable patches.  Suspends for roughly
    /// `window` while advertisements accumulate.
    async fn scan(&self, window: Duration) -> Result<Vec<DiscoveredPatch>, TransportError>;

    /// Establish a connection to a discovered patch.
    async fn connect(&self, patch: &DiscoveredPatch) -> Result<Self::Link, TransportError>;
}

/// One established connection.
#[async_trait]
pub trait PatchLink: Send + 'static {
    /// Register for telemetry notifications on the patch's one channel.
    ///
    /// At most one subscription per link; the returned stream is the only
    /// way link events are delivered.
    async fn subscribe(&mut self) -> Result<LinkEvents, TransportError>;

    /// Tear the connection down.  Best-effort: failures are logged by the
    /// implementation, never surfaced.
    async fn disconnect(&mut self);
}
