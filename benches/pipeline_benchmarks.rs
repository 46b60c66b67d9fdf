//! Transformation hot-path benchmarks
//!
//! Run with: cargo bench --bench pipeline_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use taskrecon::config::RegressionConfig;
use taskrecon::dataset::{data_prep, LabeledTrace};
use taskrecon::interval::vectorize;
use taskrecon::regression::build_regression_dataset;
use taskrecon::segment::regression_trace;
use taskrecon::trace::Trace;
use taskrecon::window::WindowSpec;

const SMALL_SIZE: usize = 10_000;
const MEDIUM_SIZE: usize = 1_000_000;

/// Synthetic trace: four tasks with irregular run lengths
fn synthetic_trace(len: usize) -> Vec<u32> {
    (0..len).map(|i| ((i / 7 + i / 13) % 4) as u32).collect()
}

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");

    for size in [SMALL_SIZE, MEDIUM_SIZE] {
        let trace = synthetic_trace(size);
        group.bench_with_input(BenchmarkId::new("vectorize", size), &trace, |b, t| {
            b.iter(|| vectorize(black_box(t)));
        });
        group.bench_with_input(BenchmarkId::new("regression_trace", size), &trace, |b, t| {
            b.iter(|| regression_trace(black_box(t)));
        });
    }

    group.finish();
}

fn bench_interval_prep(c: &mut Criterion) {
    let traces: Vec<LabeledTrace> = (0..8)
        .map(|k| LabeledTrace {
            label: k % 4,
            trace: Trace::new(synthetic_trace(SMALL_SIZE + k as usize)),
        })
        .collect();

    c.bench_function("data_prep_8x10k", |b| {
        b.iter(|| data_prep(black_box(&traces), WindowSpec::new(256, 4)));
    });
}

fn bench_regression_dataset(c: &mut Criterion) {
    let trace = Trace::new(synthetic_trace(MEDIUM_SIZE / 10));
    let cfg = RegressionConfig {
        offset: 100,
        timesteps: 50,
        ..RegressionConfig::default()
    };

    c.bench_function("build_regression_dataset_4_tasks", |b| {
        b.iter(|| build_regression_dataset(black_box(&trace), 3, &cfg, 100));
    });
}

criterion_group!(
    benches,
    bench_segmentation,
    bench_interval_prep,
    bench_regression_dataset
);
criterion_main!(benches);
