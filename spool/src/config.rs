//! Configuration for pre-registering series.
//!
//! A [`RegistryConfig`] lists the series to create up front together with
//! their capacities. It is plain JSON:
//!
//! ```json
//! {
//!   "series": [
//!     { "name": "cpu.usage", "capacity": 600 },
//!     { "name": "mem.rss", "capacity": 3600 }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BufferError, ConfigError, Result, SeriesError};

/// Configuration for a single series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Registry key for the series. Must be non-empty.
    pub name: String,
    /// Number of samples retained before the oldest is overwritten.
    pub capacity: usize,
}

impl SeriesConfig {
    /// Creates a new series configuration.
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }

    /// Validates the name and capacity.
    ///
    /// # Errors
    ///
    /// - [`SeriesError::InvalidName`] if the name is empty
    /// - [`BufferError::InvalidCapacity`] if the capacity is zero
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        if self.capacity == 0 {
            return Err(BufferError::InvalidCapacity {
                capacity: self.capacity,
            }
            .into());
        }
        Ok(())
    }
}

/// The full set of series to register at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Series to create, in order.
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
}

impl RegistryConfig {
    /// Parses and validates a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, or any error from
    /// [`RegistryConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::parse(json, PathBuf::new())
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise as
    /// [`RegistryConfig::from_json_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            source: e,
        })?;
        Self::parse(&data, path)
    }

    fn parse(json: &str, path: PathBuf) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse { path, source: e })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every entry and rejects duplicate names.
    ///
    /// # Errors
    ///
    /// Returns the first invalid entry's error, or
    /// [`ConfigError::DuplicateSeries`].
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.series.len());
        for series in &self.series {
            series.validate()?;
            if !seen.insert(series.name.as_str()) {
                return Err(ConfigError::DuplicateSeries {
                    name: series.name.clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Rejects names that cannot serve as registry keys.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SeriesError::InvalidName {
            name: name.to_string(),
            reason: "name cannot be empty".to_string(),
        }
        .into());
    }
    Ok(())
}
