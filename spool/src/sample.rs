//! The timestamped sample stored in every ring buffer slot.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Nanoseconds per millisecond.
const NANOS_PER_MILLI: u64 = 1_000_000;

/// A single `(value, timestamp)` observation.
///
/// Timestamps are nanoseconds since the Unix epoch. Samples are plain `Copy`
/// values; a slot in a buffer is replaced, never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    /// The measured value.
    pub value: f64,
    /// Timestamp in nanoseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Sample {
    /// Creates a sample with an explicit timestamp.
    pub fn new(value: f64, timestamp: u64) -> Self {
        Self { value, timestamp }
    }

    /// Creates a sample stamped with the current wall-clock time.
    pub fn now(value: f64) -> Self {
        Self::new(value, now_ns())
    }

    /// Creates a sample from a millisecond timestamp.
    ///
    /// Timestamps past the nanosecond range saturate to `u64::MAX`; use
    /// [`Sample::try_from_millis`] to detect that.
    pub fn from_millis(value: f64, timestamp_ms: u64) -> Self {
        Self::new(value, timestamp_ms.saturating_mul(NANOS_PER_MILLI))
    }

    /// Creates a sample from a millisecond timestamp, or `None` if it does
    /// not fit in u64 nanoseconds.
    pub fn try_from_millis(value: f64, timestamp_ms: u64) -> Option<Self> {
        timestamp_ms
            .checked_mul(NANOS_PER_MILLI)
            .map(|timestamp| Self::new(value, timestamp))
    }

    /// Returns the timestamp truncated to milliseconds.
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp / NANOS_PER_MILLI
    }
}

/// Returns the current wall-clock time in nanoseconds since the Unix epoch.
///
/// A clock set before the epoch reads as 0.
#[allow(clippy::cast_possible_truncation)] // u64 nanoseconds covers until the year 2554
pub fn now_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_nanos() as u64)
}
