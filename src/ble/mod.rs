//! Bluetooth Low Energy subsystem.
//!
//! Drives the host adapter in **Central** role:
//!
//! 1. **Scanner** - discovers nearby patches by advertised name prefix and
//!    admits new ones to the registry.
//! 2. **Session** - owns one connected patch: subscribes to its telemetry
//!    channel, decodes frames, and releases the identity when the link drops.
//! 3. **Transport** - the capability boundary the scanner and sessions drive;
//!    [`central`] implements it on btleplug, tests implement it in memory.

pub mod scanner;
pub mod session;
pub mod transport;

#[cfg(feature = "bluetooth")]
pub mod central;

use std::fmt;

/// Stable identity for one physical patch.
///
/// Rendered from the transport address (`AA:BB:CC:DD:EE:FF` for the real
/// adapter); stable for the process lifetime, so it can be used to recognise
/// a patch across scan cycles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatchId(String);

impl PatchId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PatchId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

/// A patch observed during one scan cycle.
///
/// Ephemeral: re-derived on every cycle from whatever the adapter currently
/// sees.
#[derive(Debug, Clone)]
pub struct DiscoveredPatch {
    pub id: PatchId,
    /// Advertised display name.
    pub name: String,
}

/// Asynchronous event delivered on an active link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// One raw notification payload from the telemetry channel.
    Frame(Vec<u8>),
    /// The transport reported the peer is gone.
    Disconnected,
}
