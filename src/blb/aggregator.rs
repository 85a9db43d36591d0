use crate::config::{BlbConfig, FailurePolicy};
use crate::error::{BlbError, Result};
use crate::sample::{Pair, Sample};
use crate::statistics::{Interval, QuantileSet};

use super::{BootstrapReplicator, SubsampleSummary, task_rng};

/// Largest difference at which two quantile probabilities count as the same.
pub const PROB_TOLERANCE: f64 = 1e-12;

/// Averaged BLB estimate: one bound per requested quantile.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalEstimate {
    /// Quantile probabilities, ascending.
    pub quantiles: QuantileSet,
    /// Mean over subsamples of each quantile bound, aligned with `quantiles`.
    pub bounds: Vec<f64>,
    /// Per-subsample summaries that entered the average, in subsample order.
    pub summaries: Vec<SubsampleSummary>,
    /// Subsamples left out under [`FailurePolicy::Exclude`].
    pub excluded: Vec<usize>,
    /// Seed the run used.
    pub seed: u64,
}

impl FinalEstimate {
    /// Averaged bound for probability `p`, if it was requested.
    ///
    /// Probabilities match within [`PROB_TOLERANCE`], so `get(0.025)` finds the
    /// lower bound of `QuantileSet::percentile(0.95)`.
    pub fn get(&self, p: f64) -> Option<f64> {
        self.quantiles
            .probs()
            .iter()
            .position(|&q| (q - p).abs() <= PROB_TOLERANCE)
            .and_then(|i| self.bounds.get(i).copied())
    }

    /// `(probability, averaged bound)` pairs, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.quantiles.probs().iter().copied().zip(self.bounds.iter().copied())
    }

    /// Interval between the lowest and highest quantile, with their coverage
    /// as confidence. `None` for a single-quantile set.
    pub fn interval(&self) -> Option<Interval<f64>> {
        match (self.quantiles.probs(), self.bounds.as_slice()) {
            ([p_lo, .., p_hi], [lower, .., upper]) => {
                Some(Interval::new(*lower, *upper).confidence(p_hi - p_lo))
            }
            _ => None,
        }
    }

    /// Number of subsamples averaged.
    pub fn subsamples(&self) -> usize {
        self.summaries.len()
    }

    /// Replicates skipped across all subsamples.
    pub fn degenerate_replicates(&self) -> usize {
        self.summaries.iter().map(|s| s.degenerate).sum()
    }
}

/// Runs the replicator over every subsample and averages the summaries.
#[derive(Debug, Clone)]
pub struct SubsampleAggregator {
    replicator: BootstrapReplicator,
    policy: FailurePolicy,
}

impl SubsampleAggregator {
    /// Aggregator with an explicit replicator and failure policy.
    pub fn new(replicator: BootstrapReplicator, policy: FailurePolicy) -> Self {
        Self { replicator, policy }
    }

    /// Aggregator for `config`.
    ///
    /// # Errors
    /// [`BlbError::InvalidParameter`] if `config` does not validate.
    pub fn from_config(config: &BlbConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(BootstrapReplicator::from_config(config)?, config.failure_policy))
    }

    /// The per-subsample replicator.
    pub fn replicator(&self) -> &BootstrapReplicator {
        &self.replicator
    }

    /// Bootstrap each given subsample in order and average the results.
    ///
    /// Subsample `i` uses the random stream [`task_rng`]`(seed, i)`.
    ///
    /// # Errors
    /// See [`SubsampleAggregator::combine`].
    pub fn estimate(&self, subsamples: &[Sample<Pair>], seed: u64) -> Result<FinalEstimate> {
        let results = subsamples
            .iter()
            .enumerate()
            .map(|(i, sub)| self.replicator.run(i, sub, task_rng(seed, i)))
            .collect();
        self.combine(results, seed)
    }

    /// Average per-subsample results, `results[i]` belonging to subsample `i`.
    ///
    /// Must be called with every result present; sums run in subsample order.
    ///
    /// # Errors
    /// [`BlbError::Aggregation`] naming the first failed subsample under
    /// [`FailurePolicy::Abort`], or when every subsample failed under
    /// [`FailurePolicy::Exclude`].
    pub fn combine(&self, results: Vec<Result<SubsampleSummary>>, seed: u64) -> Result<FinalEstimate> {
        if results.is_empty() {
            return Err(BlbError::InvalidParameter("no subsamples to aggregate".into()));
        }

        let mut summaries = Vec::with_capacity(results.len());
        let mut excluded = Vec::new();
        let mut first_failure = None;

        for (i, result) in results.into_iter().enumerate() {
            match result {
                Ok(summary) => summaries.push(summary),
                Err(e) => match self.policy {
                    FailurePolicy::Abort => return Err(e.in_subsample(i)),
                    FailurePolicy::Exclude => {
                        log::warn!("excluding subsample {i} from the average: {e}");
                        excluded.push(i);
                        first_failure.get_or_insert((i, e));
                    }
                },
            }
        }

        if summaries.is_empty() {
            return Err(match first_failure {
                Some((i, e)) => e.in_subsample(i),
                None => BlbError::InvalidParameter("no subsamples to aggregate".into()),
            });
        }

        let quantiles = self.replicator.quantiles().clone();
        let mut bounds = vec![0.0; quantiles.len()];
        for summary in &summaries {
            for (acc, b) in bounds.iter_mut().zip(&summary.bounds) {
                *acc += b;
            }
        }
        let count = summaries.len() as f64;
        for acc in &mut bounds {
            *acc /= count;
        }

        Ok(FinalEstimate {
            quantiles,
            bounds,
            summaries,
            excluded,
            seed,
        })
    }
}
