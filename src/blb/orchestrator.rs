use rand::RngCore;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::config::BlbConfig;
use crate::error::{BlbError, Result};
use crate::source::SubsampleSource;

use super::{FinalEstimate, SubsampleAggregator, SubsampleSummary, task_rng};

/// Drives a full BLB run: one task per subsample, then the average.
///
/// A task draws (or loads) its subsample and bootstraps it with its own random
/// stream, so tasks share nothing and may run on any worker. With the `rayon`
/// feature and `worker_count > 1` they run on a dedicated pool of that size.
/// The average is only taken once every task has finished.
#[derive(Debug, Clone)]
pub struct Orchestrator<S> {
    source: S,
    config: BlbConfig,
    aggregator: SubsampleAggregator,
}

impl<S: SubsampleSource + Sync> Orchestrator<S> {
    /// Validate `config` against `source`.
    ///
    /// # Errors
    /// [`BlbError::InvalidParameter`] for an invalid config, or when the source
    /// holds fewer partitions than requested subsamples.
    pub fn new(source: S, config: BlbConfig) -> Result<Self> {
        let aggregator = SubsampleAggregator::from_config(&config)?;
        if let Some(capacity) = source.capacity() {
            if capacity < config.subsamples {
                return Err(BlbError::InvalidParameter(format!(
                    "{} subsamples requested but source has {capacity} partitions",
                    config.subsamples
                )));
            }
        }
        Ok(Self {
            source,
            config,
            aggregator,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &BlbConfig {
        &self.config
    }

    /// Run every subsample task and aggregate.
    ///
    /// # Errors
    /// Whatever [`SubsampleAggregator::combine`] reports for failed subsamples.
    pub fn run(&self) -> Result<FinalEstimate> {
        let seed = self
            .config
            .seed
            .unwrap_or_else(|| rand::thread_rng().next_u64());
        log::info!(
            "BLB run: s={} b={} n={} r={} workers={} seed={seed}",
            self.config.subsamples,
            self.config.subsample_size,
            self.config.resample_size,
            self.config.replicates,
            self.config.worker_count,
        );

        let results = self.dispatch(seed)?;
        let estimate = self.aggregator.combine(results, seed)?;

        log::info!(
            "BLB estimate over {} subsamples ({} excluded, {} degenerate replicates): {:?}",
            estimate.subsamples(),
            estimate.excluded.len(),
            estimate.degenerate_replicates(),
            estimate.bounds,
        );
        Ok(estimate)
    }

    /// Process subsample `index` end to end.
    fn task(&self, seed: u64, index: usize) -> Result<SubsampleSummary> {
        let mut rng = task_rng(seed, index);
        let subsample = self
            .source
            .subsample(index, self.config.subsample_size, &mut rng)?;
        self.aggregator.replicator().run(index, &subsample, rng)
    }

    fn sequential(&self, seed: u64) -> Vec<Result<SubsampleSummary>> {
        (0..self.config.subsamples)
            .map(|i| self.task(seed, i))
            .collect()
    }

    #[cfg(feature = "rayon")]
    fn dispatch(&self, seed: u64) -> Result<Vec<Result<SubsampleSummary>>> {
        if self.config.worker_count <= 1 {
            return Ok(self.sequential(seed));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_count)
            .thread_name(|i| format!("blb-worker-{i}"))
            .build()
            .map_err(|e| BlbError::InvalidParameter(format!("worker pool: {e}")))?;

        // Ordered collect: results[i] is subsample i whichever worker ran it
        Ok(pool.install(|| {
            (0..self.config.subsamples)
                .into_par_iter()
                .map(|i| self.task(seed, i))
                .collect()
        }))
    }

    #[cfg(not(feature = "rayon"))]
    fn dispatch(&self, seed: u64) -> Result<Vec<Result<SubsampleSummary>>> {
        if self.config.worker_count > 1 {
            log::debug!("built without rayon, running {} subsamples sequentially", self.config.subsamples);
        }
        Ok(self.sequential(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailurePolicy;
    use crate::sample::{Dataset, Record, correlated_normal};
    use crate::sample::SampleError;
    use crate::source::{CsvPartitions, InMemory, Partitioned, Population};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    fn population(rows: usize, seed: u64) -> Population {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        Population::from(correlated_normal(rows, 0.6, &mut rng))
    }

    #[test]
    fn worker_count_does_not_change_result() {
        let config = BlbConfig::new(6, 50, 500, 40).with_seed(12);
        let one = Orchestrator::new(population(500, 1), config.clone().with_workers(1))
            .unwrap()
            .run()
            .unwrap();
        let four = Orchestrator::new(population(500, 1), config.with_workers(4))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(one, four);
        assert_eq!(one.seed, 12);
        assert_eq!(one.subsamples(), 6);
    }

    #[test]
    fn unseeded_runs_record_their_seed() {
        let config = BlbConfig::new(2, 30, 300, 20).with_workers(1);
        let first = Orchestrator::new(population(300, 2), config.clone()).unwrap().run().unwrap();
        let replay = Orchestrator::new(population(300, 2), config.with_seed(first.seed))
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(first.bounds, replay.bounds);
    }

    #[test]
    fn too_few_partitions_is_invalid() {
        let source = Partitioned::new(InMemory::new(vec![Dataset::default(); 2]));
        let err = Orchestrator::new(source, BlbConfig::new(3, 10, 100, 10)).unwrap_err();
        assert!(matches!(err, BlbError::InvalidParameter(_)));
    }

    #[test]
    fn excluded_partition_is_reported() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        let mut good = || correlated_normal(60, 0.3, &mut Xoshiro256PlusPlus::seed_from_u64(rng.next_u64())).to_dataset();
        let missing: Dataset = vec![Record { x: None, y: Some(1.0) }; 10].into_iter().collect();
        let partitions = vec![good(), missing, good()];

        let config = BlbConfig::new(3, 40, 120, 30)
            .with_seed(5)
            .with_workers(2)
            .with_failure_policy(FailurePolicy::Exclude);
        let est = Orchestrator::new(Partitioned::new(InMemory::new(partitions)), config)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(est.excluded, vec![1]);
        assert_eq!(est.subsamples(), 2);
    }

    fn write_partition(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::File::create(&path).unwrap().write_all(body.as_bytes()).unwrap();
        path
    }

    fn csv_body(seed: u64) -> String {
        let rows = correlated_normal(80, 0.5, &mut Xoshiro256PlusPlus::seed_from_u64(seed));
        let mut body = String::from("x,y\n");
        for p in &rows.data {
            body.push_str(&format!("{},{}\n", p.x, p.y));
        }
        body
    }

    /// Partition 1 is missing on disk, partition 2 has a non-numeric cell.
    fn broken_partitions(dir: &Path) -> CsvPartitions {
        CsvPartitions::new(vec![
            write_partition(dir, "p0.csv", &csv_body(1)),
            dir.join("absent.csv"),
            write_partition(dir, "p2.csv", "x,y\n1.0,2.0\nnot-a-number,3.0\n"),
            write_partition(dir, "p3.csv", &csv_body(2)),
        ])
    }

    #[test]
    fn load_failure_aborts_with_subsample_index() {
        let dir = tempfile::tempdir().unwrap();
        let config = BlbConfig::new(4, 50, 200, 30).with_seed(6).with_workers(2);
        let err = Orchestrator::new(Partitioned::new(broken_partitions(dir.path())), config)
            .unwrap()
            .run()
            .unwrap_err();

        assert_eq!(err.subsample(), Some(1));
        match err {
            BlbError::Aggregation { subsample, source } => {
                assert_eq!(subsample, 1);
                assert!(matches!(*source, BlbError::Load(SampleError::Csv(_) | SampleError::Io(_))), "{source:?}");
            }
            other => panic!("expected aggregation error, got {other:?}"),
        }
    }

    #[test]
    fn load_failures_are_excluded_on_request() {
        let dir = tempfile::tempdir().unwrap();
        let config = BlbConfig::new(4, 50, 200, 30)
            .with_seed(6)
            .with_workers(2)
            .with_failure_policy(FailurePolicy::Exclude);
        let est = Orchestrator::new(Partitioned::new(broken_partitions(dir.path())), config)
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(est.excluded, vec![1, 2]);
        assert_eq!(est.subsamples(), 2);
        assert_eq!(est.summaries.iter().map(|s| s.index).collect::<Vec<_>>(), vec![0, 3]);
    }
}
