//! Telemetry wire-frame decoding.
//!
//! Each patch notification carries exactly one 19-byte frame:
//!
//! | Offset | Size | Encoding | Field            |
//! |--------|------|----------|------------------|
//! | 0      | 2    | u16 BE   | optical          |
//! | 2      | 2    | u16 BE   | temperature      |
//! | 4      | 2    | u16 BE   | VOC 3            |
//! | 6      | 2    | u16 BE   | VOC 2            |
//! | 8      | 2    | u16 BE   | VOC 1            |
//! | 10     | 2    | u16 BE   | CO2              |
//! | 12     | 2    | u16 BE   | capacitance      |
//! | 14     | 4    | u32 LE   | device timestamp |
//! | 18     | 1    | u8       | patch id         |
//!
//! Values are raw ADC readings (ohms for the resistive channels); no range
//! validation is applied here.

use chrono::{DateTime, Local};

use crate::error::DecodeError;

/// Exact size of one telemetry notification payload.
pub const FRAME_LEN: usize = 19;

/// One decoded sensor frame, as sent by the patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryFrame {
    pub optical: u16,
    pub temperature: u16,
    pub voc3: u16,
    pub voc2: u16,
    pub voc1: u16,
    pub co2: u16,
    pub capacitance: u16,
    /// 32-bit device clock at capture time.  The patch clock is not
    /// synchronised to the host; see [`TelemetryRecord::received_at`].
    pub capture_timestamp: u32,
    pub patch_id: u8,
}

impl TelemetryFrame {
    /// Decode one raw notification payload.
    ///
    /// Pure and lock-free; safe to call concurrently from any number of
    /// sessions.  Any length other than [`FRAME_LEN`] is a protocol
    /// violation, not a recoverable variant.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() != FRAME_LEN {
            return Err(DecodeError::InvalidLength {
                expected: FRAME_LEN,
                actual: data.len(),
            });
        }

        let be = |i: usize| u16::from_be_bytes([data[i], data[i + 1]]);

        Ok(Self {
            optical: be(0),
            temperature: be(2),
            voc3: be(4),
            voc2: be(6),
            voc1: be(8),
            co2: be(10),
            capacitance: be(12),
            capture_timestamp: u32::from_le_bytes([data[14], data[15], data[16], data[17]]),
            patch_id: data[18],
        })
    }
}

/// A decoded frame plus the host wall-clock time it arrived.
#[derive(Debug, Clone)]
pub struct TelemetryRecord {
    /// When the owning session received the frame.
    pub received_at: DateTime<Local>,
    pub frame: TelemetryFrame,
}

impl TelemetryRecord {
    /// Stamp a freshly decoded frame with the current wall-clock time.
    pub fn received_now(frame: TelemetryFrame) -> Self {
        Self {
            received_at: Local::now(),
            frame,
        }
    }
}
