//! Per-patch connection session.
//!
//! One session runs per admitted patch, independently of all others, for the
//! patch's entire managed lifetime: connect → subscribe → stream → release.
//! Streaming is passive - the session suspends on the link's event stream
//! and does no polling or keep-alive work of its own.

use std::sync::Arc;

use futures::StreamExt;
use log::{debug, info, warn};

use crate::ble::transport::{PatchLink, PatchTransport};
use crate::ble::{DiscoveredPatch, LinkEvent};
use crate::frame::{TelemetryFrame, TelemetryRecord};
use crate::registry::PatchRegistry;
use crate::sink::TelemetrySink;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The transport-level connection could not be established.
    ConnectFailed,
    /// Connected, but the telemetry subscription failed.
    SubscribeFailed,
    /// The peer disconnected.  Expected whenever a patch powers down or
    /// walks out of range; not an error.
    RemoteDisconnect,
}

/// Drive one patch through its entire managed lifetime.
///
/// Callers must have admitted `patch` to the registry first - the session
/// does not repeat that check.  Whatever the outcome, the identity is
/// released exactly once on the way out, which is what returns the patch to
/// the discoverable pool for a future scan cycle.
pub async fn run<T: PatchTransport>(
    transport: Arc<T>,
    registry: Arc<PatchRegistry>,
    sink: Arc<dyn TelemetrySink>,
    patch: DiscoveredPatch,
) -> SessionEnd {
    let end = drive(transport, sink, &patch).await;
    registry.release(&patch.id);

    match end {
        SessionEnd::RemoteDisconnect => info!("{} ({}) disconnected", patch.name, patch.id),
        cause => warn!("{} ({}) session ended: {cause:?}", patch.name, patch.id),
    }
    end
}

async fn drive<T: PatchTransport>(
    transport: Arc<T>,
    sink: Arc<dyn TelemetrySink>,
    patch: &DiscoveredPatch,
) -> SessionEnd {
    let mut link = match transport.connect(patch).await {
        Ok(link) => link,
        Err(e) => {
            warn!("failed to connect to {} ({}): {e}", patch.name, patch.id);
            return SessionEnd::ConnectFailed;
        }
    };

    let mut events = match link.subscribe().await {
        Ok(events) => events,
        Err(e) => {
            warn!("failed to subscribe to {} ({}): {e}", patch.name, patch.id);
            // Tear down the half-open connection; release happens regardless.
            link.disconnect().await;
            return SessionEnd::SubscribeFailed;
        }
    };

    info!("connected to {} at {}", patch.name, patch.id);

    while let Some(event) = events.next().await {
        match event {
            LinkEvent::Frame(data) => match TelemetryFrame::decode(&data) {
                Ok(frame) => {
                    debug!("[{}] {frame:?}", frame.patch_id);
                    sink.emit(TelemetryRecord::received_now(frame));
                }
                // A malformed notification never costs the connection.
                Err(e) => warn!("dropping frame from {}: {e}", patch.id),
            },
            LinkEvent::Disconnected => break,
        }
    }

    link.disconnect().await;
    SessionEnd::RemoteDisconnect
}
