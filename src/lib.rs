//! patchlink - BLE telemetry hub for AirPatch sensor patches.
//!
//! The hub drives a host Bluetooth adapter in **Central** role:
//!
//! 1. **Scanner** - periodically discovers nearby patches by their advertised
//!    display-name prefix (`AirPatch…`, `APCH…`).
//! 2. **Registry** - tracks which patches are currently managed so that a
//!    patch is never driven by two sessions at once.
//! 3. **Session** - per-patch connect → subscribe → stream lifecycle; decoded
//!    frames are handed to the telemetry sink, and the patch returns to the
//!    discoverable pool once its link drops.
//! 4. **Frame decoder** - fixed-layout 19-byte notification payloads → typed
//!    sensor records.
//!
//! The Bluetooth stack itself sits behind [`ble::transport::PatchTransport`];
//! the `bluetooth` feature provides the btleplug-backed implementation plus
//! the daemon binary, while the default feature set builds a pure-logic crate
//! that tests drive with an in-memory transport.

pub mod ble;
pub mod config;
pub mod error;
pub mod frame;
pub mod hub;
pub mod registry;
pub mod sink;

pub use ble::{DiscoveredPatch, PatchId};
pub use frame::{TelemetryFrame, TelemetryRecord};
pub use hub::Hub;
pub use registry::PatchRegistry;
pub use sink::{CsvSink, TelemetrySink};
