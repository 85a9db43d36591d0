use rand::Rng;

use crate::config::BlbConfig;
use crate::error::{BlbError, Result};
use crate::resample::{Multinomial, Re};
use crate::sample::{Pair, Sample};
use crate::statistics::{EmpiricalCDF, Estimator, Interval, QuantileSet, Statistic, Weighted};

/// Quantiles of the bootstrap distribution of one subsample.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsampleSummary {
    /// Which subsample this summarizes.
    pub index: usize,
    /// Rows in the subsample.
    pub rows: usize,
    /// One bound per probability of the configured [`QuantileSet`].
    pub bounds: Vec<f64>,
    /// Replicates requested.
    pub replicates: usize,
    /// Replicates that produced a value.
    pub usable: usize,
    /// Replicates skipped because the statistic was undefined.
    pub degenerate: usize,
}

impl SubsampleSummary {
    /// `true` if some replicates were skipped.
    pub fn is_degraded(&self) -> bool {
        self.degenerate > 0
    }

    /// `[first bound, last bound]`, the interval for a two-sided quantile set.
    pub fn interval(&self) -> Option<Interval<f64>> {
        match self.bounds.as_slice() {
            [lower, .., upper] => Some(Interval::new(*lower, *upper)),
            _ => None,
        }
    }
}

/// Runs `r` multinomial bootstrap replicates on one subsample.
#[derive(Debug, Clone)]
pub struct BootstrapReplicator {
    estimator: Estimator,
    draws: u32,
    replicates: usize,
    quantiles: QuantileSet,
}

impl BootstrapReplicator {
    /// Replicator with explicit parameters.
    pub fn new(estimator: Estimator, draws: u32, replicates: usize, quantiles: QuantileSet) -> Self {
        Self {
            estimator,
            draws,
            replicates,
            quantiles,
        }
    }

    /// Replicator for the estimator, `n`, `r` and quantiles of `config`.
    ///
    /// # Errors
    /// [`BlbError::InvalidParameter`] if `n` does not fit in a `u32`.
    pub fn from_config(config: &BlbConfig) -> Result<Self> {
        Ok(Self::new(
            config.estimator,
            config.draws()?,
            config.replicates,
            config.quantiles.clone(),
        ))
    }

    /// The quantile probabilities each summary reports.
    pub fn quantiles(&self) -> &QuantileSet {
        &self.quantiles
    }

    /// Bootstrap subsample `index` and summarize it.
    ///
    /// Replicates whose statistic is undefined are skipped and counted.
    ///
    /// # Errors
    /// [`BlbError::InsufficientData`] if no replicate produced a value.
    pub fn run<R: Rng + Clone>(&self, index: usize, subsample: &Sample<Pair>, rng: R) -> Result<SubsampleSummary> {
        let mut values = Vec::with_capacity(self.replicates);
        let mut degenerate = 0;

        for weights in Multinomial::new(rng, self.draws).re(subsample).take(self.replicates) {
            let data = Weighted::new(&subsample.data, &weights)?;
            match self.estimator.compute(&data) {
                Ok(v) if v.is_finite() => values.push(v),
                Ok(_) | Err(BlbError::DegenerateVariance) => degenerate += 1,
                Err(e) => return Err(e),
            }
        }

        if values.is_empty() {
            return Err(BlbError::InsufficientData {
                subsample: index,
                replicates: self.replicates,
            });
        }
        if degenerate > 0 {
            log::warn!(
                "subsample {index}: {degenerate} of {} replicates degenerate, summarizing {}",
                self.replicates,
                values.len()
            );
        }

        let usable = values.len();
        let bounds = self.quantiles.compute(&EmpiricalCDF::from_float_vec(values));
        log::debug!("subsample {index}: {} rows, bounds {bounds:?}", subsample.len());

        Ok(SubsampleSummary {
            index,
            rows: subsample.len(),
            bounds,
            replicates: self.replicates,
            usable,
            degenerate,
        })
    }
}
