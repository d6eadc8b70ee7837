//! Periodic discovery of new patches.
//!
//! Each cycle enumerates whatever the adapter currently sees, filters by
//! name prefix, and hands every not-yet-managed match to a fresh session.
//! Already-managed patches showing up again is the steady state for
//! connected devices, so they are skipped silently.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};

use crate::ble::session;
use crate::ble::transport::PatchTransport;
use crate::error::TransportError;
use crate::registry::PatchRegistry;
use crate::sink::TelemetrySink;

/// Case-insensitive prefix match against the configured patch-name set.
pub fn name_matches(prefixes: &[String], name: &str) -> bool {
    prefixes.iter().any(|prefix| {
        name.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Run one scan cycle: enumerate, filter, admit, spawn.
///
/// Sessions are spawned fire-and-forget - each one owns its patch from here
/// and releases it on exit; the scanner never waits on them, so the cycle
/// period is independent of how many patches are streaming.
///
/// Returns how many new patches were admitted this cycle.
pub async fn scan_cycle<T: PatchTransport>(
    transport: &Arc<T>,
    registry: &Arc<PatchRegistry>,
    sink: &Arc<dyn TelemetrySink>,
    prefixes: &[String],
    window: Duration,
) -> Result<usize, TransportError> {
    let devices = transport.scan(window).await?;
    debug!(
        "scan saw {} devices ({} patches managed)",
        devices.len(),
        registry.len()
    );

    let mut admitted = 0;
    for device in devices {
        if !name_matches(prefixes, &device.name) {
            continue;
        }
        if !registry.try_admit(&device.id, &device.name) {
            continue;
        }

        info!("new patch: {} ({})", device.name, device.id);
        admitted += 1;
        tokio::spawn(session::run(
            Arc::clone(transport),
            Arc::clone(registry),
            Arc::clone(sink),
            device,
        ));
    }

    Ok(admitted)
}
