//! Integration tests for ring buffer behavior under concurrent access.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use spool::{RingBuffer, Sample};

const WRITERS: u64 = 8;
const PER_WRITER: u64 = 2_000;

/// Encodes a writer id and sequence number into one exact f64.
#[allow(clippy::cast_precision_loss)]
fn encode(writer: u64, seq: u64) -> f64 {
    (writer * 1_000_000 + seq) as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn decode(value: f64) -> (u64, u64) {
    let raw = value as u64;
    (raw / 1_000_000, raw % 1_000_000)
}

#[test]
fn test_fourth_add_evicts_first_at_capacity_three() {
    let ring = RingBuffer::new(3).unwrap();
    let stamps = [1_000_000u64, 2_000_000, 3_000_000, 4_000_000];
    for (v, ts) in [1.0, 2.0, 3.0, 4.0].into_iter().zip(stamps) {
        ring.add_at(v, ts);
    }

    assert_eq!(ring.snapshot(), vec![
        Sample::new(2.0, 2_000_000),
        Sample::new(3.0, 3_000_000),
        Sample::new(4.0, 4_000_000),
    ]);
}

#[test]
fn test_two_adds_into_capacity_five() {
    let ring = RingBuffer::new(5).unwrap();
    ring.add(10.0);
    ring.add(20.0);

    let values: Vec<f64> = ring.snapshot().iter().map(|s| s.value).collect();
    assert_eq!(values, vec![10.0, 20.0]);
}

#[test]
fn test_snapshot_length_is_min_of_writes_and_capacity() {
    for capacity in 1..=6usize {
        for n in 0..=(2 * capacity + 1) {
            let ring = RingBuffer::new(capacity).unwrap();
            for i in 0..n {
                ring.add_at(1.0, i as u64);
            }
            assert_eq!(ring.snapshot().len(), n.min(capacity));
            assert_eq!(ring.len(), n.min(capacity));
        }
    }
}

#[test]
fn test_concurrent_writers_no_corruption() {
    let capacity = 1_000usize;
    let ring = Arc::new(RingBuffer::new(capacity).unwrap());

    thread::scope(|s| {
        for writer in 0..WRITERS {
            let ring = Arc::clone(&ring);
            s.spawn(move || {
                for seq in 0..PER_WRITER {
                    ring.add_at(encode(writer, seq), seq);
                }
            });
        }
    });

    let snapshot = ring.snapshot();
    assert_eq!(snapshot.len(), capacity);

    // No duplicates, no fabricated values
    let mut seen = HashSet::new();
    for sample in &snapshot {
        let (writer, seq) = decode(sample.value);
        assert!(writer < WRITERS, "fabricated writer id in {}", sample.value);
        assert!(seq < PER_WRITER, "fabricated sequence in {}", sample.value);
        assert_eq!(sample.timestamp, seq, "torn sample {sample:?}");
        assert!(seen.insert((writer, seq)), "duplicate sample {sample:?}");
    }

    // Each writer's samples keep that writer's program order
    let mut last_seq = vec![None; WRITERS as usize];
    for sample in &snapshot {
        let (writer, seq) = decode(sample.value);
        let slot = &mut last_seq[usize::try_from(writer).unwrap()];
        if let Some(prev) = *slot {
            assert!(seq > prev, "writer {writer} out of order: {prev} then {seq}");
        }
        *slot = Some(seq);
    }

    // The newest sample of the whole run is some writer's final write
    let (_, newest_seq) = decode(ring.newest().unwrap().value);
    assert_eq!(newest_seq, PER_WRITER - 1);
}

#[test]
fn test_concurrent_writers_below_capacity_keep_everything() {
    let capacity = (WRITERS * PER_WRITER) as usize + 10;
    let ring = Arc::new(RingBuffer::new(capacity).unwrap());

    thread::scope(|s| {
        for writer in 0..WRITERS {
            let ring = Arc::clone(&ring);
            s.spawn(move || {
                for seq in 0..PER_WRITER {
                    ring.add_at(encode(writer, seq), seq);
                }
            });
        }
    });

    let snapshot = ring.snapshot();
    assert_eq!(snapshot.len(), (WRITERS * PER_WRITER) as usize);
    let unique: HashSet<_> = snapshot.iter().map(|s| decode(s.value)).collect();
    assert_eq!(unique.len(), snapshot.len());
}

#[test]
fn test_snapshot_during_writes_is_contiguous() {
    let capacity = 64usize;
    let total = 20_000u64;
    let ring = Arc::new(RingBuffer::new(capacity).unwrap());

    thread::scope(|s| {
        let writer = Arc::clone(&ring);
        s.spawn(move || {
            for i in 0..total {
                writer.add_at(encode(0, i), i);
            }
        });

        let reader = Arc::clone(&ring);
        s.spawn(move || {
            for _ in 0..500 {
                let snapshot = reader.snapshot();
                if snapshot.is_empty() {
                    continue;
                }

                // A single writer means every view is a run of consecutive inserts
                let first = snapshot[0].timestamp;
                for (offset, sample) in snapshot.iter().enumerate() {
                    assert_eq!(sample.timestamp, first + offset as u64);
                    assert_eq!(decode(sample.value).1, sample.timestamp);
                }

                // A partial view must start at the very first insert
                if snapshot.len() < capacity {
                    assert_eq!(first, 0);
                }
            }
        });
    });

    let snapshot = ring.snapshot();
    assert_eq!(snapshot.first().map(|s| s.timestamp), Some(total - capacity as u64));
    assert_eq!(snapshot.last().map(|s| s.timestamp), Some(total - 1));
}

#[test]
fn test_batches_are_never_observed_half_applied() {
    let capacity = 32usize;
    let ring = Arc::new(RingBuffer::new(capacity).unwrap());

    thread::scope(|s| {
        let writer = Arc::clone(&ring);
        s.spawn(move || {
            for batch_id in 0..2_000u64 {
                let batch = vec![Sample::new(encode(batch_id, 0), batch_id); capacity];
                writer.add_batch(&batch);
            }
        });

        let reader = Arc::clone(&ring);
        s.spawn(move || {
            for _ in 0..500 {
                let snapshot = reader.snapshot();
                let ids: HashSet<u64> = snapshot.iter().map(|s| s.timestamp).collect();
                assert!(ids.len() <= 1, "observed a mix of batches: {ids:?}");
            }
        });
    });

    assert_eq!(ring.len(), capacity);
}
