/// A statistic computed from data of type `D`, producing `T`.
pub trait Statistic<D: ?Sized, T> {
    /// Evaluate the statistic on `data`.
    fn compute(&self, data: &D) -> T;
}

mod mean;
mod weighted;
mod cdf;
mod quantile;
mod ci;

pub use mean::Mean;
pub use weighted::{
    Column, Correlation, CrossMoments, DEGENERATE_RTOL, Estimator, Weighted, WeightedCorrelation,
    WeightedMean,
};
pub use cdf::EmpiricalCDF;
pub use quantile::{Quantile, QuantileSet};
pub use ci::Interval;

// ===== 2-tuple: evaluate both statistics on the same data =====
impl<D: ?Sized, T1, T2, S1, S2> Statistic<D, (T1, T2)> for (S1, S2)
where
    S1: Statistic<D, T1>,
    S2: Statistic<D, T2>,
{
    #[inline]
    fn compute(&self, data: &D) -> (T1, T2) {
        let out1 = self.0.compute(data);
        let out2 = self.1.compute(data);
        (out1, out2)
    }
}
