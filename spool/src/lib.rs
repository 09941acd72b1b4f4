//! # spool
//!
//! Fixed-capacity, thread-safe in-memory time-series buffers keyed by name.
//!
//! spool keeps the most recent samples of many independently named series in
//! memory and hands them back in temporal order to a query or rendering
//! layer. Each series is bounded by a capacity chosen when it is created;
//! once full, every new sample overwrites the oldest one.
//!
//! ## Key Properties
//!
//! - Storage per series is allocated once and never grows
//! - Per-series locking: writers on different series never contend
//! - Snapshots copy under the lock and order outside it
//! - Unwritten slots are never exposed
//!
//! ## Quick Start
//!
//! ```rust
//! use spool::{SeriesRegistry, Sample};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SeriesRegistry::new();
//! let cpu = registry.create("cpu.usage", 3)?;
//!
//! for v in [1.0, 2.0, 3.0, 4.0] {
//!     cpu.add(v);
//! }
//!
//! let values: Vec<f64> = cpu.snapshot().iter().map(|s: &Sample| s.value).collect();
//! assert_eq!(values, vec![2.0, 3.0, 4.0]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ring`] — The per-series ring buffer
//! - [`registry`] — Name to buffer mapping and lifecycle
//! - [`sample`] — The stored `(value, timestamp)` type and wall clock
//! - [`export`] — `(value, timestamp_ms)` pairs for dashboards
//! - [`config`] — JSON configuration for pre-registered series
//! - [`error`] — Error types

pub mod config;
pub mod error;
pub mod export;
pub mod registry;
pub mod ring;
pub mod sample;

// Re-export primary API types at crate root for convenience.
pub use config::{RegistryConfig, SeriesConfig};
pub use error::{BufferError, ConfigError, Result, SeriesError, SpoolError};
pub use export::{Datapoint, SeriesExport};
pub use registry::SeriesRegistry;
pub use ring::RingBuffer;
pub use sample::Sample;
