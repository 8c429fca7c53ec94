//! Benchmarks for flowmoments algorithms
//!
//! Run with: cargo bench --features full

// Require all features for benchmarks
#[cfg(not(all(feature = "moments", feature = "logsumexp")))]
compile_error!("Benchmarks require all features. Run: cargo bench --features full");

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use flowmoments::logsumexp::{log_sum_exp, RunningLogSumExp};
use flowmoments::moments::{MomentAccumulator, MomentHistory};

/// Seeded pseudo-returns in [-0.05, 0.05)
fn synthetic_rows(periods: usize, dim: usize) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..periods)
        .map(|_| (0..dim).map(|_| rng.gen_range(-0.05..0.05)).collect())
        .collect()
}

// ============================================================================
// Moment Accumulator Benchmarks
// ============================================================================

fn bench_accumulator(c: &mut Criterion) {
    let mut group = c.benchmark_group("moment_accumulator");
    group.throughput(Throughput::Elements(1));

    for dim in [1, 5, 50, 200] {
        let rows = synthetic_rows(1024, dim);

        group.bench_function(format!("update_d{}", dim), |b| {
            let mut acc = MomentAccumulator::new(dim);
            let mut i = 0usize;
            b.iter(|| {
                acc.update(black_box(&rows[i % rows.len()])).unwrap();
                i = i.wrapping_add(1);
            });
        });

        group.bench_function(format!("snapshot_d{}", dim), |b| {
            let mut acc = MomentAccumulator::new(dim);
            for row in &rows {
                acc.update(row).unwrap();
            }
            b.iter(|| black_box(acc.snapshot().unwrap()));
        });
    }

    group.finish();
}

// ============================================================================
// Moment History Benchmarks
// ============================================================================

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("moment_history");

    // Two years of daily returns for five assets
    let rows = synthetic_rows(730, 5);
    group.throughput(Throughput::Elements(rows.len() as u64));

    group.bench_function("from_rows_730x5", |b| {
        b.iter(|| black_box(MomentHistory::from_rows(5, black_box(&rows)).unwrap()));
    });

    group.finish();
}

// ============================================================================
// Log-Sum-Exp Benchmarks
// ============================================================================

fn bench_logsumexp(c: &mut Criterion) {
    let mut group = c.benchmark_group("logsumexp");

    let data: Vec<f64> = synthetic_rows(100_000, 1)
        .into_iter()
        .map(|row| row[0] * 20_000.0)
        .collect();

    group.throughput(Throughput::Elements(1));
    group.bench_function("add", |b| {
        let mut lse = RunningLogSumExp::new();
        let mut i = 0usize;
        b.iter(|| {
            lse.add(black_box(data[i % data.len()]));
            i = i.wrapping_add(1);
        });
    });

    group.throughput(Throughput::Elements(data.len() as u64));
    group.bench_function("streaming_100k", |b| {
        b.iter(|| {
            let mut lse = RunningLogSumExp::new();
            for &x in &data {
                lse.add(x);
            }
            black_box(lse.value())
        });
    });

    group.bench_function("two_pass_100k", |b| {
        b.iter(|| black_box(log_sum_exp(black_box(&data))));
    });

    group.finish();
}

// ============================================================================
// Main
// ============================================================================

criterion_group!(benches, bench_accumulator, bench_history, bench_logsumexp);

criterion_main!(benches);
