//! Configuration for a Bag of Little Bootstraps run.

use serde::{Deserialize, Serialize};

use crate::error::{BlbError, Result};
use crate::statistics::{Estimator, QuantileSet};

/// What happens to the final estimate when one subsample fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Any subsample failure aborts the whole estimate.
    ///
    /// Dropping a subsample would bias the average toward the subsamples that
    /// happened to succeed.
    #[default]
    Abort,
    /// Failed subsamples are logged, listed in the estimate and left out of
    /// the average. Fails only when every subsample fails.
    Exclude,
}

/// Parameters of a BLB run.
///
/// Deserializes from any serde format; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlbConfig {
    // =========================================================================
    // Resampling scheme
    // =========================================================================

    /// Number of subsamples `s`. Default: 20.
    pub subsamples: usize,

    /// Rows per subsample `b`, drawn without replacement. Default: 200.
    pub subsample_size: usize,

    /// Virtual resample size `n`, normally the population size, so that each
    /// bootstrap replicate has the variance scale of the full-data estimator.
    /// Default: 1,000.
    pub resample_size: usize,

    /// Bootstrap replicates `r` per subsample. Default: 200.
    pub replicates: usize,

    /// Quantiles reported per subsample and averaged. Default: {0.025, 0.975}.
    pub quantiles: QuantileSet,

    /// The statistic being bootstrapped. Default: correlation.
    pub estimator: Estimator,

    // =========================================================================
    // Execution
    // =========================================================================

    /// Worker pool size `W`. Default: rayon's global thread count, 1 without
    /// the `rayon` feature.
    pub worker_count: usize,

    /// Seed for reproducible runs; `None` draws one from the thread RNG.
    pub seed: Option<u64>,

    /// Subsample failure handling. Default: [`FailurePolicy::Abort`].
    pub failure_policy: FailurePolicy,
}

impl Default for BlbConfig {
    fn default() -> Self {
        Self {
            subsamples: 20,
            subsample_size: 200,
            resample_size: 1_000,
            replicates: 200,
            quantiles: QuantileSet::default(),
            estimator: Estimator::default(),
            worker_count: default_workers(),
            seed: None,
            failure_policy: FailurePolicy::default(),
        }
    }
}

#[cfg(feature = "rayon")]
fn default_workers() -> usize {
    rayon::current_num_threads()
}

#[cfg(not(feature = "rayon"))]
fn default_workers() -> usize {
    1
}

impl BlbConfig {
    /// `s` subsamples of `b` rows, resampled up to `n`, `r` times each.
    pub fn new(subsamples: usize, subsample_size: usize, resample_size: usize, replicates: usize) -> Self {
        Self {
            subsamples,
            subsample_size,
            resample_size,
            replicates,
            ..Self::default()
        }
    }

    /// Defaults for a population of `rows`: `n = rows` and `b = ⌈rows^0.6⌉`.
    pub fn for_population(rows: usize) -> Self {
        let b = (rows as f64).powf(0.6).ceil() as usize;
        Self {
            subsample_size: b.clamp(1, rows.max(1)),
            resample_size: rows,
            ..Self::default()
        }
    }

    /// Replace the quantile set.
    #[must_use]
    pub fn with_quantiles(mut self, quantiles: QuantileSet) -> Self {
        self.quantiles = quantiles;
        self
    }

    /// Replace the estimator.
    #[must_use]
    pub fn with_estimator(mut self, estimator: Estimator) -> Self {
        self.estimator = estimator;
        self
    }

    /// Set the worker pool size.
    #[must_use]
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    /// Fix the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// `n` as the multinomial draw count.
    ///
    /// # Errors
    /// [`BlbError::InvalidParameter`] if `n` does not fit in a `u32`.
    pub fn draws(&self) -> Result<u32> {
        u32::try_from(self.resample_size).map_err(|_| {
            BlbError::InvalidParameter(format!(
                "resample size {} exceeds {}",
                self.resample_size,
                u32::MAX
            ))
        })
    }

    /// Check that every parameter is usable.
    ///
    /// # Errors
    /// [`BlbError::InvalidParameter`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("subsamples", self.subsamples),
            ("subsample_size", self.subsample_size),
            ("resample_size", self.resample_size),
            ("replicates", self.replicates),
            ("worker_count", self.worker_count),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(BlbError::InvalidParameter(format!("{name} must be positive")));
        }
        if self.quantiles.is_empty() {
            return Err(BlbError::InvalidParameter("quantile set is empty".into()));
        }
        self.draws()?;
        Ok(())
    }
}
