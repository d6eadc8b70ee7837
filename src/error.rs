//! Unified error types for patchlink.
//!
//! Every failure in the hub is scoped: a decode error costs one frame, a
//! transport error costs one session or one scan cycle.  Nothing here is
//! fatal to the process.

use thiserror::Error;

/// A notification payload that does not match the telemetry wire format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The payload is not exactly one frame long.
    #[error("invalid frame length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Errors reported by the transport capability.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No Bluetooth adapter could be opened on the host.
    #[error("no Bluetooth adapter found")]
    NoAdapter,

    /// The backend failed to initialise.
    #[error("bluetooth backend error: {0}")]
    Backend(String),

    /// Device enumeration failed; the cycle is retried next period.
    #[error("scan failed: {0}")]
    Scan(String),

    /// Connection attempt to one patch failed.
    #[error("connect failed: {0}")]
    Connect(String),

    /// Notification subscription on an established link failed.
    #[error("subscribe failed: {0}")]
    Subscribe(String),

    /// The connected peripheral does not expose the telemetry channel.
    #[error("telemetry characteristic {0} not found")]
    CharacteristicNotFound(String),
}
