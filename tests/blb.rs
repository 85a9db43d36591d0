use std::io::Write;

use blb::*;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

fn population(rows: usize, rho: f64, seed: u64) -> Sample<Pair> {
    correlated_normal(rows, rho, &mut Xoshiro256PlusPlus::seed_from_u64(seed))
}

// Expected coverage is a little under the nominal 95% because the averaged
// subsample estimates add their own spread; enough trials keep 90% well clear.
#[test]
fn interval_covers_true_correlation() {
    const TRIALS: u64 = 250;
    let mut covered = 0;

    for trial in 0..TRIALS {
        let pop = Population::from(population(1_000, 0.6, 1_000 + trial));
        let config = BlbConfig::new(20, 200, 1_000, 200).with_seed(trial);
        let estimate = Orchestrator::new(pop, config).unwrap().run().unwrap();

        let ci = estimate.interval().unwrap();
        assert!(ci.lower <= ci.upper);
        assert!(ci.width() < 0.2, "interval too wide: {ci:.4}");
        if ci.contains(&0.6) {
            covered += 1;
        }
    }

    let coverage = f64::from(covered) / TRIALS as f64;
    assert!(coverage >= 0.9, "coverage {coverage} over {TRIALS} trials");
}

#[test]
fn fixed_seed_is_bit_identical() {
    let config = BlbConfig::new(8, 100, 1_000, 100).with_seed(2024);
    let run = || {
        Orchestrator::new(Population::from(population(1_000, 0.3, 9)), config.clone())
            .unwrap()
            .run()
            .unwrap()
    };
    let a = run();
    let b = run();
    let bits = |e: &FinalEstimate| e.bounds.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a), bits(&b));
    assert_eq!(a.summaries, b.summaries);

    let other = Orchestrator::new(Population::from(population(1_000, 0.3, 9)), config.with_seed(2025))
        .unwrap()
        .run()
        .unwrap();
    assert_ne!(bits(&a), bits(&other));
}

#[test]
fn zero_variance_partition_aborts_run() {
    let mut partitions: Vec<Dataset> = (0..4).map(|i| population(150, 0.5, i).to_dataset()).collect();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
    partitions[2] = (0..150).map(|_| Record::new(4.0, rng.gen_range(-1.0..1.0))).collect();

    let config = BlbConfig::new(4, 100, 600, 50).with_seed(1).with_workers(2);
    let err = Orchestrator::new(Partitioned::new(InMemory::new(partitions)), config)
        .unwrap()
        .run()
        .unwrap_err();

    match err {
        BlbError::Aggregation { subsample, source } => {
            assert_eq!(subsample, 2);
            assert!(matches!(*source, BlbError::InsufficientData { subsample: 2, replicates: 50 }));
        }
        other => panic!("expected aggregation error, got {other:?}"),
    }
}

#[test]
fn large_offset_does_not_degenerate() {
    let base = population(400, 0.6, 21);
    let shifted: Sample<Pair> = base.data.iter().map(|p| Pair::new(p.x + 1e8, p.y)).collect();
    let config = BlbConfig::new(4, 100, 400, 50).with_seed(3).with_workers(1);

    let plain = Orchestrator::new(Population::from(base), config.clone()).unwrap().run().unwrap();
    let offset = Orchestrator::new(Population::from(shifted), config).unwrap().run().unwrap();

    assert_eq!(offset.degenerate_replicates(), 0);
    for (a, b) in plain.bounds.iter().zip(&offset.bounds) {
        assert!((a - b).abs() < 1e-6, "{a} vs {b}");
    }
}

#[test]
fn csv_partitions_with_missing_cells() {
    let dir = tempfile::tempdir().unwrap();
    let pop = population(900, 0.7, 77);
    for (part, chunk) in pop.data.chunks(300).enumerate() {
        let mut f = std::fs::File::create(dir.path().join(format!("part-{part}.csv"))).unwrap();
        writeln!(f, "x,y").unwrap();
        for (i, p) in chunk.iter().enumerate() {
            // Every 50th row loses its y value
            if i % 50 == 0 {
                writeln!(f, "{},", p.x).unwrap();
            } else {
                writeln!(f, "{},{}", p.x, p.y).unwrap();
            }
        }
    }

    let source = Partitioned::new(CsvPartitions::from_dir(dir.path()).unwrap());
    let config = BlbConfig::new(3, 250, 900, 150).with_seed(11);
    let estimate = Orchestrator::new(source, config).unwrap().run().unwrap();

    assert_eq!(estimate.subsamples(), 3);
    assert!(estimate.summaries.iter().all(|s| s.rows == 250));
    let ci = estimate.interval().unwrap();
    assert!((ci.midpoint() - 0.7).abs() < 0.1, "{ci:.4}");
    assert!(estimate.to_string().contains("97.5%"));
}

#[test]
fn weighted_mean_interval() {
    let rows = population(2_000, 0.0, 5);
    let ys: Vec<f64> = rows.data.iter().map(|p| p.y).collect();
    let sample_mean: f64 = Mean.compute(&ys);

    let mut config = BlbConfig::for_population(2_000)
        .with_estimator(Estimator::Mean(Column::Y))
        .with_quantiles(QuantileSet::percentile(0.95).unwrap())
        .with_seed(3);
    config.subsamples = 50;
    let estimate = Orchestrator::new(Population::from(rows), config).unwrap().run().unwrap();

    let ci = estimate.interval().unwrap();
    assert!(ci.contains(&sample_mean), "{ci:.4} vs {sample_mean}");
    assert!(ci.width() < 0.2);
    assert_eq!(estimate.degenerate_replicates(), 0);
}
