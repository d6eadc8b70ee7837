//! The hub wires registry, scanner, and sink together and runs forever.

use std::sync::Arc;

use log::{error, info};

use crate::ble::scanner;
use crate::ble::transport::PatchTransport;
use crate::config::HubConfig;
use crate::registry::PatchRegistry;
use crate::sink::TelemetrySink;

/// Top-level orchestrator.
///
/// Holds no business logic of its own: the registry de-duplicates, the
/// scanner discovers and spawns, sessions stream.  The hub just composes
/// them and keeps the scan loop alive for the life of the process.
pub struct Hub<T: PatchTransport> {
    transport: Arc<T>,
    registry: Arc<PatchRegistry>,
    sink: Arc<dyn TelemetrySink>,
    config: HubConfig,
}

impl<T: PatchTransport> Hub<T> {
    pub fn new(transport: T, sink: Arc<dyn TelemetrySink>, config: HubConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            registry: Arc::new(PatchRegistry::new()),
            sink,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<PatchRegistry> {
        &self.registry
    }

    /// Run the discovery loop forever.
    ///
    /// A failed scan only costs that one cycle; sessions keep streaming
    /// through it and the scan is retried after the usual interval.
    pub async fn run(&self) -> ! {
        if !self.config.settle_delay.is_zero() {
            info!(
                "waiting {:?} for patches to finish booting",
                self.config.settle_delay
            );
            tokio::time::sleep(self.config.settle_delay).await;
        }

        loop {
            let outcome = scanner::scan_cycle(
                &self.transport,
                &self.registry,
                &self.sink,
                &self.config.prefixes,
                self.config.scan_window,
            )
            .await;

            match outcome {
                Ok(0) => {}
                Ok(n) => info!("admitted {n} new patches ({} managed)", self.registry.len()),
                Err(e) => error!("scan cycle failed: {e}"),
            }

            tokio::time::sleep(self.config.rescan_interval).await;
        }
    }
}
