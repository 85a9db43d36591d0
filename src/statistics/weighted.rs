//! Weighted estimators over multinomial weight vectors.
//!
//! A weight `w[i]` stands for row `i` repeated `w[i]` times. Every estimator here
//! reads the rows once and never materializes the repeated rows, so applying it
//! to `(rows, w)` gives the same value as applying the unweighted estimator to
//! the expanded data.

use crate::error::{BlbError, Result};
use crate::sample::Pair;

use super::{Mean, Statistic};

/// Centered sums below this fraction of the pivoted second moment count as zero.
///
/// For a constant column every pivoted value is exactly zero; this only absorbs
/// rounding residue left by the centering step.
pub const DEGENERATE_RTOL: f64 = 64.0 * f64::EPSILON;

/// Rows paired with their integer weights.
#[derive(Debug, Clone, Copy)]
pub struct Weighted<'a> {
    rows: &'a [Pair],
    weights: &'a [u32],
}

impl<'a> Weighted<'a> {
    /// Pair `rows` with `weights`; both must have the same length.
    pub fn new(rows: &'a [Pair], weights: &'a [u32]) -> Result<Self> {
        if rows.len() != weights.len() {
            return Err(BlbError::InvalidParameter(format!(
                "{} rows but {} weights",
                rows.len(),
                weights.len()
            )));
        }
        Ok(Self { rows, weights })
    }

    /// The weighted rows.
    pub fn rows(&self) -> &'a [Pair] {
        self.rows
    }

    /// The weight of each row.
    pub fn weights(&self) -> &'a [u32] {
        self.weights
    }

    /// Sum of the weights (the equivalent expanded row count).
    pub fn total_weight(&self) -> u64 {
        self.weights.iter().map(|&w| u64::from(w)).sum()
    }

    /// First row that carries weight.
    pub fn pivot(&self) -> Option<Pair> {
        self.iter().find(|(_, w)| *w > 0.0).map(|(p, _)| *p)
    }

    fn iter(&self) -> impl Iterator<Item = (&'a Pair, f64)> + 'a {
        self.rows
            .iter()
            .zip(self.weights.iter().map(|&w| f64::from(w)))
    }
}

/// Weighted first and second moment sums of a pair of columns, taken around a
/// pivot row.
///
/// Filled in a single pass; all derived quantities come from these six sums.
/// Correlation is shift invariant, and summing `(x - x0, y - y0)` instead of
/// `(x, y)` keeps the centering step from cancelling when a column's mean is
/// large next to its spread.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrossMoments {
    /// Row subtracted from every pushed row.
    pub pivot: Pair,
    /// `sum(w)`
    pub n: f64,
    /// `sum(w*dx)`
    pub sx: f64,
    /// `sum(w*dy)`
    pub sy: f64,
    /// `sum(w*dx*dx)`
    pub sxx: f64,
    /// `sum(w*dy*dy)`
    pub syy: f64,
    /// `sum(w*dx*dy)`
    pub sxy: f64,
}

impl CrossMoments {
    /// Empty sums around `pivot`.
    pub fn around(pivot: Pair) -> Self {
        Self { pivot, ..Self::default() }
    }

    /// Accumulate all weighted rows, pivoting on the first weighted row.
    pub fn accumulate(data: &Weighted<'_>) -> Self {
        let mut m = Self::around(data.pivot().unwrap_or_default());
        for (p, w) in data.iter() {
            m.push(*p, w);
        }
        m
    }

    /// Add one row with weight `w`.
    #[inline]
    pub fn push(&mut self, p: Pair, w: f64) {
        let dx = p.x - self.pivot.x;
        let dy = p.y - self.pivot.y;
        let wx = w * dx;
        let wy = w * dy;
        self.n += w;
        self.sx += wx;
        self.sy += wy;
        self.sxx += wx * dx;
        self.syy += wy * dy;
        self.sxy += wx * dy;
    }

    /// Centered sums `(sxx, syy, sxy)`, i.e. `n` times the weighted (co)variances.
    pub fn centered(&self) -> (f64, f64, f64) {
        let cxx = self.sxx - self.sx * self.sx / self.n;
        let cyy = self.syy - self.sy * self.sy / self.n;
        let cxy = self.sxy - self.sx * self.sy / self.n;
        (cxx, cyy, cxy)
    }

    /// Weighted Pearson correlation.
    ///
    /// # Errors
    /// [`BlbError::DegenerateVariance`] when the total weight is zero or either
    /// column has zero variance.
    pub fn correlation(&self) -> Result<f64> {
        if self.n <= 0.0 {
            return Err(BlbError::DegenerateVariance);
        }
        let (cxx, cyy, cxy) = self.centered();
        if cxx <= DEGENERATE_RTOL * self.sxx || cyy <= DEGENERATE_RTOL * self.syy {
            return Err(BlbError::DegenerateVariance);
        }
        Ok((cxy / (cxx * cyy).sqrt()).clamp(-1.0, 1.0))
    }
}

/// Which column of a [`Pair`] a univariate estimator reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    /// The `x` field.
    #[default]
    X,
    /// The `y` field.
    Y,
}

impl Column {
    #[inline]
    fn get(self, p: &Pair) -> f64 {
        match self {
            Column::X => p.x,
            Column::Y => p.y,
        }
    }
}

/// Weighted mean `sum(w*v) / sum(w)` of one column, Kahan-compensated.
///
/// NaN when the weights sum to zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedMean {
    /// Column to average.
    pub column: Column,
}

impl WeightedMean {
    /// Weighted mean of `column`.
    pub fn new(column: Column) -> Self {
        Self { column }
    }
}

impl Statistic<Weighted<'_>, f64> for WeightedMean {
    fn compute(&self, data: &Weighted<'_>) -> f64 {
        let mut sum = 0.0;
        let mut c = 0.0;
        let mut total = 0.0;

        for (p, w) in data.iter() {
            let y = w * self.column.get(p) - c;
            let t = sum + y;
            c = (t - sum) - y;
            sum = t;
            total += w;
        }

        sum / total
    }
}

/// Weighted Pearson correlation through [`CrossMoments`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedCorrelation;

impl Statistic<Weighted<'_>, Result<f64>> for WeightedCorrelation {
    fn compute(&self, data: &Weighted<'_>) -> Result<f64> {
        CrossMoments::accumulate(data).correlation()
    }
}

/// Plain two-pass Pearson correlation of unweighted rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct Correlation;

impl<D> Statistic<D, Result<f64>> for Correlation
where
    D: AsRef<[Pair]> + ?Sized,
{
    fn compute(&self, data: &D) -> Result<f64> {
        let rows = data.as_ref();
        let Some(&pivot) = rows.first() else {
            return Err(BlbError::DegenerateVariance);
        };
        let xs: Vec<f64> = rows.iter().map(|p| p.x - pivot.x).collect();
        let ys: Vec<f64> = rows.iter().map(|p| p.y - pivot.y).collect();
        let mx: f64 = Mean.compute(&xs);
        let my: f64 = Mean.compute(&ys);

        let (mut vxx, mut vyy, mut vxy) = (0.0, 0.0, 0.0);
        let (mut qxx, mut qyy) = (0.0, 0.0);
        for (x, y) in xs.iter().zip(&ys) {
            let dx = x - mx;
            let dy = y - my;
            vxx += dx * dx;
            vyy += dy * dy;
            vxy += dx * dy;
            qxx += x * x;
            qyy += y * y;
        }

        if vxx <= DEGENERATE_RTOL * qxx || vyy <= DEGENERATE_RTOL * qyy {
            return Err(BlbError::DegenerateVariance);
        }
        Ok((vxy / (vxx * vyy).sqrt()).clamp(-1.0, 1.0))
    }
}

/// The estimator a BLB run bootstraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Estimator {
    /// Weighted Pearson correlation of `x` and `y`.
    #[default]
    Correlation,
    /// Weighted mean of one column.
    Mean(Column),
}

impl Statistic<Weighted<'_>, Result<f64>> for Estimator {
    #[inline]
    fn compute(&self, data: &Weighted<'_>) -> Result<f64> {
        match self {
            Estimator::Correlation => WeightedCorrelation.compute(data),
            Estimator::Mean(column) => Ok(WeightedMean::new(*column).compute(data)),
        }
    }
}
