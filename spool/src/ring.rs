//! Fixed-capacity, thread-safe ring buffer of timestamped samples.
//!
//! Each [`RingBuffer`] holds the samples of one series. Storage is allocated
//! once at construction and never grows; once every slot has been written,
//! each new sample overwrites the logically oldest one.
//!
//! # Design
//!
//! - `slots` is a boxed slice of exactly `capacity` samples
//! - `head` is the index of the next slot to be overwritten
//! - `len` counts samples written, saturating at `capacity`
//!
//! While `len < capacity` the buffer has never wrapped, so the oldest sample
//! sits at index 0 and `head == len`. Once full, the oldest sample sits at
//! `head`. Slots at or beyond `len` are never exposed.
//!
//! # Thread Safety
//!
//! All state lives behind one [`Mutex`] owned by the buffer. Writers hold it
//! for a single slot assignment (or for a whole batch). [`RingBuffer::snapshot`]
//! holds it only long enough to copy the slots and cursor, then orders the
//! copy outside the lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{BufferError, Result};
use crate::export::Datapoint;
use crate::sample::{Sample, now_ns};

/// Mutable state guarded by the buffer lock.
#[derive(Debug)]
struct RingState {
    slots: Box<[Sample]>,
    head: usize,
    len: usize,
}

impl RingState {
    #[inline]
    fn push(&mut self, sample: Sample) {
        let capacity = self.slots.len();
        self.slots[self.head] = sample;
        self.head = (self.head + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
    }

    /// Index of the logically oldest sample.
    #[inline]
    fn oldest_index(&self) -> usize {
        if self.len < self.slots.len() { 0 } else { self.head }
    }
}

/// A fixed-capacity circular store of samples for one series.
///
/// Share it between threads with [`std::sync::Arc`]; every method takes
/// `&self`.
///
/// # Examples
///
/// ```rust
/// use spool::ring::RingBuffer;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let ring = RingBuffer::new(3)?;
/// for v in [1.0, 2.0, 3.0, 4.0] {
///     ring.add_at(v, 1_000 * v as u64);
/// }
///
/// let values: Vec<f64> = ring.snapshot().iter().map(|s| s.value).collect();
/// assert_eq!(values, vec![2.0, 3.0, 4.0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RingBuffer {
    capacity: usize,
    state: Mutex<RingState>,
}

impl RingBuffer {
    /// Creates an empty ring buffer holding at most `capacity` samples.
    ///
    /// # Errors
    ///
    /// Returns [`BufferError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(BufferError::InvalidCapacity { capacity }.into());
        }

        Ok(Self {
            capacity,
            state: Mutex::new(RingState {
                slots: vec![Sample::default(); capacity].into_boxed_slice(),
                head: 0,
                len: 0,
            }),
        })
    }

    /// Acquires the buffer lock.
    ///
    /// A writer cannot panic between the slot assignment and the cursor
    /// update, so a poisoned lock still guards consistent state.
    #[inline]
    fn lock(&self) -> MutexGuard<'_, RingState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a value stamped with the current wall-clock time.
    pub fn add(&self, value: f64) {
        self.add_sample(Sample::new(value, now_ns()));
    }

    /// Appends a value with an explicit timestamp in nanoseconds.
    pub fn add_at(&self, value: f64, timestamp_ns: u64) {
        self.add_sample(Sample::new(value, timestamp_ns));
    }

    /// Appends one sample, overwriting the oldest if the buffer is full.
    pub fn add_sample(&self, sample: Sample) {
        self.lock().push(sample);
    }

    /// Appends samples in order.
    ///
    /// The lock is held for the whole batch: a concurrent [`snapshot`] sees
    /// either none or all of it, and writes from other threads cannot
    /// interleave with it. A batch longer than the capacity leaves only its
    /// last `capacity` samples.
    ///
    /// [`snapshot`]: RingBuffer::snapshot
    pub fn add_batch(&self, samples: &[Sample]) {
        if samples.is_empty() {
            return;
        }

        let mut state = self.lock();
        for &sample in samples {
            state.push(sample);
        }
    }

    /// Returns the buffered samples ordered oldest to newest.
    ///
    /// The result has `min(total written, capacity)` entries.
    pub fn snapshot(&self) -> Vec<Sample> {
        let (slots, head, len) = {
            let state = self.lock();
            (state.slots.clone(), state.head, state.len)
        };

        tracing::trace!(len, capacity = self.capacity, "snapshot");

        if len < self.capacity {
            // Never wrapped: the filled region is a prefix in write order.
            return slots[..len].to_vec();
        }

        let mut ordered = Vec::with_capacity(len);
        ordered.extend_from_slice(&slots[head..]);
        ordered.extend_from_slice(&slots[..head]);
        ordered
    }

    /// Returns the snapshot as `(value, timestamp_ms)` export pairs.
    pub fn datapoints(&self) -> Vec<Datapoint> {
        self.snapshot().into_iter().map(Datapoint::from).collect()
    }

    /// Returns the fixed capacity chosen at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of retrievable samples.
    pub fn len(&self) -> usize {
        self.lock().len
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once every slot holds a sample.
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// Returns the most recently written sample.
    pub fn newest(&self) -> Option<Sample> {
        let state = self.lock();
        if state.len == 0 {
            return None;
        }
        let index = (state.head + self.capacity - 1) % self.capacity;
        Some(state.slots[index])
    }

    /// Returns the logically oldest retrievable sample.
    pub fn oldest(&self) -> Option<Sample> {
        let state = self.lock();
        if state.len == 0 {
            return None;
        }
        Some(state.slots[state.oldest_index()])
    }
}
