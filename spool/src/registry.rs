//! Named series registry.
//!
//! The [`SeriesRegistry`] maps series names to shared [`RingBuffer`]s. It only
//! manages lifecycle (create, lookup, delete); callers keep the returned
//! `Arc<RingBuffer>` and write to it directly, so the data path never touches
//! the registry lock.
//!
//! # Example
//!
//! ```rust
//! use spool::registry::SeriesRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SeriesRegistry::new();
//! let cpu = registry.create("cpu.usage", 600)?;
//!
//! // Hot path: no registry involvement
//! cpu.add(42.0);
//!
//! // A second create under the same name fails
//! assert!(registry.create("cpu.usage", 600).unwrap_err().is_already_exists());
//!
//! registry.delete("cpu.usage")?;
//! assert!(registry.get("cpu.usage").unwrap_err().is_not_found());
//! # Ok(())
//! # }
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::{RegistryConfig, validate_name};
use crate::error::{Result, SeriesError};
use crate::ring::RingBuffer;
use crate::sample::Sample;

/// Registry of live series keyed by name.
///
/// # Thread Safety
///
/// The map sits behind its own [`RwLock`], independent of every buffer's
/// lock. Lookups take the read lock and mutations the write lock; neither is
/// held while a buffer is read or written.
#[derive(Debug, Default)]
pub struct SeriesRegistry {
    series: RwLock<HashMap<String, Arc<RingBuffer>>>,
}

impl SeriesRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every series in `config`.
    ///
    /// # Errors
    ///
    /// Returns any validation error from [`RegistryConfig::validate`].
    pub fn from_config(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;
        let registry = Self::new();
        for series in &config.series {
            registry.create(&series.name, series.capacity)?;
        }
        Ok(registry)
    }

    // The map is only ever changed by a single insert or remove, so a
    // poisoned lock still guards a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<RingBuffer>>> {
        self.series.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<RingBuffer>>> {
        self.series.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocates a buffer of `capacity` samples and registers it as `name`.
    ///
    /// # Errors
    ///
    /// - [`SeriesError::InvalidName`] if `name` is empty
    /// - [`crate::error::BufferError::InvalidCapacity`] if `capacity` is zero
    /// - [`SeriesError::SeriesAlreadyExists`] if `name` is already registered
    pub fn create(&self, name: &str, capacity: usize) -> Result<Arc<RingBuffer>> {
        validate_name(name)?;
        let buffer = Arc::new(RingBuffer::new(capacity)?);
        self.put(name, Arc::clone(&buffer))?;
        Ok(buffer)
    }

    /// Registers an externally constructed buffer as `name`.
    ///
    /// # Errors
    ///
    /// - [`SeriesError::InvalidName`] if `name` is empty
    /// - [`SeriesError::SeriesAlreadyExists`] if `name` is already registered
    pub fn put(&self, name: &str, buffer: Arc<RingBuffer>) -> Result<()> {
        validate_name(name)?;
        let capacity = buffer.capacity();

        {
            let mut series = self.write();
            if series.contains_key(name) {
                return Err(SeriesError::SeriesAlreadyExists {
                    name: name.to_string(),
                }
                .into());
            }
            series.insert(name.to_string(), buffer);
        }

        tracing::debug!(series = name, capacity, "registered series");
        Ok(())
    }

    /// Looks up the buffer registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::SeriesNotFound`] if `name` is not registered.
    pub fn get(&self, name: &str) -> Result<Arc<RingBuffer>> {
        self.read().get(name).cloned().ok_or_else(|| {
            SeriesError::SeriesNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Removes `name` from the registry and returns its buffer.
    ///
    /// The key is gone afterwards, so a later [`create`] may reuse the name.
    /// Callers still holding the old `Arc` keep a working, detached buffer.
    ///
    /// [`create`]: SeriesRegistry::create
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::SeriesNotFound`] if `name` is not registered.
    pub fn delete(&self, name: &str) -> Result<Arc<RingBuffer>> {
        let removed = self.write().remove(name);
        match removed {
            Some(buffer) => {
                tracing::debug!(series = name, "deleted series");
                Ok(buffer)
            }
            None => Err(SeriesError::SeriesNotFound {
                name: name.to_string(),
            }
            .into()),
        }
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Returns all registered names, sorted.
    pub fn list_names(&self) -> BTreeSet<String> {
        self.read().keys().cloned().collect()
    }

    /// Returns the number of registered series.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if no series are registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshots every registered series.
    ///
    /// The set of buffers is captured under the registry lock, which is then
    /// released before any buffer is locked. A series created or deleted
    /// concurrently may or may not appear.
    pub fn snapshot_all(&self) -> BTreeMap<String, Vec<Sample>> {
        let buffers: Vec<(String, Arc<RingBuffer>)> = self
            .read()
            .iter()
            .map(|(name, buffer)| (name.clone(), Arc::clone(buffer)))
            .collect();

        buffers
            .into_iter()
            .map(|(name, buffer)| {
                let samples = buffer.snapshot();
                (name, samples)
            })
            .collect()
    }
}
