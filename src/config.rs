//! Application-wide constants and runtime configuration.
//!
//! All timing parameters and protocol constants live here so they can be
//! tuned in one place.  The binary overrides the runtime values from CLI
//! flags; the library defaults come from the constants below.

use std::time::Duration;

// BLE

/// Device-name prefixes that identify a patch, matched case-insensitively.
pub const DEFAULT_NAME_PREFIXES: &[&str] = &["airpatch", "apch"];

/// Telemetry notification characteristic (16-bit UUID 0x1234 expanded to the
/// Bluetooth base UUID).
pub const TELEMETRY_CHAR_UUID: &str = "00001234-0000-1000-8000-00805f9b34fb";

/// Duration of one scan window (seconds).
pub const DEFAULT_SCAN_WINDOW_SECS: u64 = 5;

/// Pause between scan cycles (seconds).  Late or power-cycled patches are
/// picked up on the next cycle.
pub const DEFAULT_RESCAN_INTERVAL_SECS: u64 = 30;

/// One-off startup delay before the first scan (seconds), so freshly
/// powered patches have time to start advertising.
pub const DEFAULT_SETTLE_DELAY_SECS: u64 = 5;

// Telemetry log

/// Directory for CSV telemetry logs.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Records buffered in the CSV sink before each flush to disk.
pub const DEFAULT_FLUSH_EVERY: usize = 10;

/// Runtime tunables for the hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Accepted device-name prefixes, matched case-insensitively.
    pub prefixes: Vec<String>,
    /// How long each scan window stays open.
    pub scan_window: Duration,
    /// Pause between scan cycles.
    pub rescan_interval: Duration,
    /// One-off delay before the first scan.
    pub settle_delay: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_NAME_PREFIXES.iter().map(|p| p.to_string()).collect(),
            scan_window: Duration::from_secs(DEFAULT_SCAN_WINDOW_SECS),
            rescan_interval: Duration::from_secs(DEFAULT_RESCAN_INTERVAL_SECS),
            settle_delay: Duration::from_secs(DEFAULT_SETTLE_DELAY_SECS),
        }
    }
}
