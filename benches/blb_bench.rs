use std::hint::black_box;

use blb::*;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

const SUBSAMPLE: usize = 200;
const RESAMPLE: u32 = 1_000;

fn xrng(seed: u64) -> Xoshiro256PlusPlus {
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// 1. WEIGHTED CORRELATION (single pass, scaling with b)
fn bench_weighted_correlation(c: &mut Criterion) {
    let mut group = c.benchmark_group("correlation/weighted");

    for &size in &[20, 200, 2_000] {
        let rows = correlated_normal(size, 0.6, &mut xrng(1));
        let weights = Multinomial::new(xrng(2), RESAMPLE).draw(size).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("single_pass", size), &size, |b, _| {
            let data = Weighted::new(&rows.data, &weights).unwrap();
            b.iter(|| black_box(WeightedCorrelation.compute(black_box(&data))))
        });
    }
    group.finish();
}

/// 2. MULTINOMIAL WEIGHT DRAW
fn bench_multinomial(c: &mut Criterion) {
    let mut resampler = Multinomial::new(xrng(3), RESAMPLE);
    let mut weights = vec![0; SUBSAMPLE];
    c.bench_function("multinomial/b200_n1000", |b| {
        b.iter(|| {
            resampler.draw_into(black_box(&mut weights)).unwrap();
            black_box(&weights);
        })
    });
}

/// 3. ONE SUBSAMPLE END TO END (r = 200)
fn bench_replicator(c: &mut Criterion) {
    let sub = correlated_normal(SUBSAMPLE, 0.6, &mut xrng(4));
    let replicator = BootstrapReplicator::new(Estimator::Correlation, RESAMPLE, 200, QuantileSet::default());
    c.bench_function("replicator/r200", |b| {
        b.iter(|| black_box(replicator.run(0, &sub, xrng(5)).unwrap()))
    });
}

/// 4. FULL RUN, SEQUENTIAL VS POOL
fn bench_orchestrator(c: &mut Criterion) {
    let population = Population::from(correlated_normal(1_000, 0.6, &mut xrng(6)));
    let mut group = c.benchmark_group("orchestrator/s20");
    group.sample_size(10);
    for workers in [1, 4] {
        let config = BlbConfig::new(20, SUBSAMPLE, 1_000, 200).with_seed(7).with_workers(workers);
        let orchestrator = Orchestrator::new(population.clone(), config).unwrap();
        group.bench_with_input(BenchmarkId::new("workers", workers), &workers, |b, _| {
            b.iter(|| black_box(orchestrator.run().unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_weighted_correlation,
    bench_multinomial,
    bench_replicator,
    bench_orchestrator
);
criterion_main!(benches);
