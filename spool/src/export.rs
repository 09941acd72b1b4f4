//! Export types handed to the query/rendering layer.
//!
//! A [`Datapoint`] is the `(value, timestamp_ms)` pair a dashboard consumes.
//! It serializes as a two-element JSON array, so a [`SeriesExport`] renders
//! as:
//!
//! ```json
//! {"target": "cpu", "datapoints": [[12.5, 1700000000000], [13.0, 1700000001000]]}
//! ```
//!
//! JSON has no NaN or infinity, so a non-finite value is written as `null`
//! and `null` reads back as NaN.
//!
//! Transport (HTTP routing, request parsing) is left to the caller.

use serde::{Deserialize, Serialize};

use crate::ring::RingBuffer;
use crate::sample::Sample;

/// A single exported observation with a millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(Option<f64>, u64)", into = "(Option<f64>, u64)")]
pub struct Datapoint {
    /// The measured value.
    pub value: f64,
    /// Timestamp in milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

impl From<Sample> for Datapoint {
    fn from(sample: Sample) -> Self {
        Self {
            value: sample.value,
            timestamp_ms: sample.timestamp_ms(),
        }
    }
}

impl From<(Option<f64>, u64)> for Datapoint {
    fn from((value, timestamp_ms): (Option<f64>, u64)) -> Self {
        Self {
            value: value.unwrap_or(f64::NAN),
            timestamp_ms,
        }
    }
}

impl From<Datapoint> for (Option<f64>, u64) {
    fn from(point: Datapoint) -> Self {
        let value = point.value.is_finite().then_some(point.value);
        (value, point.timestamp_ms)
    }
}

/// The ordered contents of one named series, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesExport {
    /// The series name.
    pub target: String,
    /// Datapoints ordered oldest to newest.
    pub datapoints: Vec<Datapoint>,
}

impl SeriesExport {
    /// Snapshots `buffer` and labels the result with `target`.
    pub fn from_buffer(target: impl Into<String>, buffer: &RingBuffer) -> Self {
        Self {
            target: target.into(),
            datapoints: buffer.datapoints(),
        }
    }
}
