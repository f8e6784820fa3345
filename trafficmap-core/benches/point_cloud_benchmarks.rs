//! Criterion benchmarks for point-cloud generation.
//!
//! Measures allocation and full generation across batch sizes of 1k, 5k and
//! 20k cities. The largest batch exceeds the default global cap, so it also
//! exercises down-sampling.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package trafficmap-core
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use trafficmap_core::{PointCloudConfig, PointCloudDensityEngine};


use bench_support::{BENCHMARK_SEED, generate_cities};

/// Batch sizes to benchmark.
const BATCH_SIZES: &[usize] = &[1_000, 5_000, 20_000];

fn engine() -> PointCloudDensityEngine {
    PointCloudDensityEngine::new(PointCloudConfig {
        random_seed: BENCHMARK_SEED,
        ..PointCloudConfig::default()
    })
    .unwrap_or_default()
}

fn bench_allocation(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");
    let engine = engine();

    for &size in BATCH_SIZES {
        let records = generate_cities(size, BENCHMARK_SEED);
        let throughput_size = u64::try_from(size).unwrap_or(u64::MAX);
        group.throughput(Throughput::Elements(throughput_size));
        group.bench_with_input(BenchmarkId::new("cities", size), &records, |b, records| {
            b.iter(|| engine.allocate(records));
        });
    }

    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(10));
    let engine = engine();

    for &size in BATCH_SIZES {
        let records = generate_cities(size, BENCHMARK_SEED);
        let throughput_size = u64::try_from(size).unwrap_or(u64::MAX);
        group.throughput(Throughput::Elements(throughput_size));
        group.bench_with_input(BenchmarkId::new("cities", size), &records, |b, records| {
            b.iter(|| engine.generate(records));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_allocation, bench_generation);
criterion_main!(benches);
