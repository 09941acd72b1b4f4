//! Error types for the spool time-series buffers.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for all spool operations.
///
/// None of these are fatal and none are retried internally. Mapping them to a
/// user-facing status (for example "not found") is up to the caller.
#[derive(Error, Debug)]
pub enum SpoolError {
    /// Error constructing a ring buffer.
    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// Error during series registration, lookup, or removal.
    #[error("series error: {0}")]
    Series(#[from] SeriesError),

    /// Error loading or validating configuration.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur when constructing a ring buffer.
///
/// Once a buffer exists, no operation on it can fail.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// The requested capacity cannot hold any samples.
    #[error("invalid capacity {capacity}: must be at least 1")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
}

/// Errors that can occur in the series registry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SeriesError {
    /// No live series is registered under this name.
    #[error("series '{name}' not found")]
    SeriesNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// A live series is already registered under this name.
    #[error("series '{name}' already exists")]
    SeriesAlreadyExists {
        /// The conflicting name.
        name: String,
    },

    /// The series name is unusable as a registry key.
    #[error("invalid series name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },
}

/// Errors that can occur while loading registry configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        /// The config file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration could not be parsed as JSON.
    #[error("failed to parse config '{}': {source}", path.display())]
    Parse {
        /// The config file path, empty when parsing from a string.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The same series name appears more than once.
    #[error("series '{name}' is configured more than once")]
    DuplicateSeries {
        /// The duplicated name.
        name: String,
    },
}

impl SpoolError {
    /// Returns `true` if this is a [`SeriesError::SeriesNotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Series(SeriesError::SeriesNotFound { .. }))
    }

    /// Returns `true` if this is a [`SeriesError::SeriesAlreadyExists`].
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::Series(SeriesError::SeriesAlreadyExists { .. }))
    }

    /// Returns `true` if this is a [`BufferError::InvalidCapacity`].
    pub fn is_invalid_capacity(&self) -> bool {
        matches!(self, Self::Buffer(BufferError::InvalidCapacity { .. }))
    }
}

/// Type alias for `Result<T, SpoolError>`.
pub type Result<T> = std::result::Result<T, SpoolError>;
