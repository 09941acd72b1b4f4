//! Microbenchmarks for the ring buffer write and snapshot paths.
//!
//! Run with: `cargo bench -p spool`

#![allow(missing_docs, clippy::cast_precision_loss)]

use std::sync::Arc;
use std::thread;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use spool::{RingBuffer, Sample, SeriesRegistry};

fn bench_add(c: &mut Criterion) {
    let ring = RingBuffer::new(3_600).unwrap();
    let mut ts = 1_700_000_000_000_000_000u64;

    c.bench_function("add/explicit_timestamp", |b| {
        b.iter(|| {
            ts += 1_000_000_000;
            ring.add_at(black_box(42.5), black_box(ts));
        });
    });

    c.bench_function("add/wall_clock", |b| {
        b.iter(|| ring.add(black_box(42.5)));
    });
}

fn bench_add_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_batch/batch_size");

    for size in [1usize, 10, 100, 1_000] {
        let ring = RingBuffer::new(3_600).unwrap();
        let batch: Vec<_> = (0..size)
            .map(|i| Sample::new(i as f64, 1_700_000_000_000_000_000 + i as u64))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| ring.add_batch(black_box(&batch)));
        });
    }

    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot/capacity");

    for capacity in [60usize, 600, 3_600, 86_400] {
        let ring = RingBuffer::new(capacity).unwrap();
        // Wrap once so the snapshot takes the two-segment path
        for i in 0..(capacity + capacity / 2) {
            ring.add_at(i as f64, i as u64);
        }

        group.bench_with_input(BenchmarkId::from_parameter(capacity), &capacity, |b, _| {
            b.iter(|| black_box(ring.snapshot()));
        });
    }

    group.finish();
}

fn bench_contended_add(c: &mut Criterion) {
    let registry = SeriesRegistry::new();
    let ring = registry.create("contended", 3_600).unwrap();

    c.bench_function("add/4_threads_1000_each", |b| {
        b.iter(|| {
            thread::scope(|s| {
                for t in 0..4u64 {
                    let ring = Arc::clone(&ring);
                    s.spawn(move || {
                        for i in 0..1_000u64 {
                            ring.add_at(black_box(t as f64), black_box(i));
                        }
                    });
                }
            });
        });
    });
}

criterion_group!(
    benches,
    bench_add,
    bench_add_batch,
    bench_snapshot,
    bench_contended_add,
);
criterion_main!(benches);
