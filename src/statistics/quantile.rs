use num_traits::Float;

use super::Statistic;
use crate::EmpiricalCDF;
use crate::error::{BlbError, Result};

/// Quantile estimator with linear interpolation between order statistics.
///
/// For sorted points `v[0..m)` this is Hyndman & Fan type 7 (the default of
/// R and NumPy):
/// ```text
/// h = (m - 1) * p
/// Q(p) = v[⌊h⌋] + (h - ⌊h⌋) * (v[⌊h⌋ + 1] - v[⌊h⌋])
/// ```
/// `Q(0)` is the minimum and `Q(1)` the maximum. An empty ECDF yields NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantile {
    p: f64,
}

impl Quantile {
    /// Creates a quantile estimator for probability `p ∈ [0, 1]`.
    #[inline]
    pub fn new(p: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&p), "Quantile p must be in [0,1]");
        Self { p }
    }

    /// Convenience constructor for median (p = 0.5).
    #[inline]
    pub fn median() -> Self {
        Self { p: 0.5 }
    }

    /// The probability this estimator targets.
    pub fn p(&self) -> f64 {
        self.p
    }
}

impl<T: Float> Statistic<EmpiricalCDF<T>, T> for Quantile {
    fn compute(&self, ecdf: &EmpiricalCDF<T>) -> T {
        let points = ecdf.points();
        let m = points.len();
        if m == 0 {
            return T::nan();
        }

        let h = (m - 1) as f64 * self.p;
        let lo = (h.floor() as usize).min(m - 1);
        let hi = (lo + 1).min(m - 1);
        let frac = T::from(h - lo as f64).unwrap_or_else(T::zero);

        match (points.get(lo), points.get(hi)) {
            (Some(&a), Some(&b)) => a + frac * (b - a),
            _ => T::nan(),
        }
    }
}

/// An ordered set of quantile probabilities, e.g. the two bounds of an interval.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct QuantileSet {
    probs: Vec<f64>,
}

impl QuantileSet {
    /// Validates and sorts `probs`; duplicates are removed.
    ///
    /// # Errors
    /// [`BlbError::InvalidParameter`] if the set is empty or any value lies
    /// outside `[0, 1]` or is NaN.
    pub fn new(mut probs: Vec<f64>) -> Result<Self> {
        if probs.is_empty() {
            return Err(BlbError::InvalidParameter("quantile set is empty".into()));
        }
        if let Some(bad) = probs.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(BlbError::InvalidParameter(format!(
                "quantile {bad} outside [0, 1]"
            )));
        }
        probs.sort_by(f64::total_cmp);
        probs.dedup();
        Ok(Self { probs })
    }

    /// Two-sided equal-tailed set `{(1-c)/2, 1-(1-c)/2}` for confidence `c`.
    pub fn percentile(confidence: f64) -> Result<Self> {
        let alpha = 1.0 - confidence;
        Self::new(vec![alpha / 2.0, 1.0 - alpha / 2.0])
    }

    /// Probabilities in ascending order.
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    /// Number of quantiles.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// Always `false`; construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }
}

impl Default for QuantileSet {
    /// The 95% two-sided set `{0.025, 0.975}`.
    fn default() -> Self {
        Self { probs: vec![0.025, 0.975] }
    }
}

impl TryFrom<Vec<f64>> for QuantileSet {
    type Error = BlbError;

    fn try_from(probs: Vec<f64>) -> Result<Self> {
        Self::new(probs)
    }
}

impl From<QuantileSet> for Vec<f64> {
    fn from(set: QuantileSet) -> Self {
        set.probs
    }
}

impl<T: Float> Statistic<EmpiricalCDF<T>, Vec<T>> for QuantileSet {
    fn compute(&self, ecdf: &EmpiricalCDF<T>) -> Vec<T> {
        self.probs
            .iter()
            .map(|&p| Quantile::new(p).compute(ecdf))
            .collect()
    }
}
