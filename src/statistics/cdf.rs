use num_traits::Float;

/// Empirical Cumulative Distribution Function (ECDF).
///
/// Represents the step function: Fₙ(x) = (1/n) * Σᵢ I(Xᵢ ≤ x)
///
/// NaN values are **silently filtered** during construction; the rest are kept
/// sorted in IEEE 754 total order.
#[derive(Debug, Clone, Default)]
pub struct EmpiricalCDF<T> {
    sorted: Vec<T>,
}

impl<T> EmpiricalCDF<T> {
    /// Number of points in the distribution.
    #[inline]
    pub fn n(&self) -> usize {
        self.sorted.len()
    }

    /// Order statistics, ascending.
    #[inline]
    pub fn points(&self) -> &[T] {
        &self.sorted
    }

    /// `true` when no points survived construction.
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

impl<T: Float> EmpiricalCDF<T> {
    /// Creates ECDF from float slice with NaN filtering.
    pub fn from_float_slice(data: &[T]) -> Self {
        Self::from_float_vec(data.to_vec())
    }

    /// Same as [`EmpiricalCDF::from_float_slice`], reusing the buffer.
    pub fn from_float_vec(mut data: Vec<T>) -> Self {
        data.retain(|x| !x.is_nan());
        // NaNs are gone, so partial_cmp is total here
        data.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        Self { sorted: data }
    }
}
