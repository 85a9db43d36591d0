use num_traits::{Float, FromPrimitive};

use super::Statistic;

/// Computes the arithmetic mean using **Kahan summation** to
/// minimize floating-point error accumulation.
///
/// Returns NaN for an empty slice.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mean;

impl<D, F> Statistic<D, F> for Mean
where
    D: AsRef<[F]> + ?Sized,
    F: Float + FromPrimitive,
{
    fn compute(&self, data: &D) -> F {
        let slice: &[F] = data.as_ref();

        let mut sum = F::zero();
        let mut c = F::zero();

        for &x in slice {
            let y = x - c;
            let t = sum + y;
            c = (t - sum) - y;
            sum = t;
        }

        // 0 / 0 on empty input
        F::from_usize(slice.len()).map_or_else(F::nan, |n| sum / n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn empty_slice_returns_nan() {
        let mean_f32: f32 = Mean.compute(&Vec::<f32>::new());
        assert!(mean_f32.is_nan(), "Empty slice must return NaN (got: {mean_f32})");

        let mean_f64: f64 = Mean.compute(&Vec::<f64>::new());
        assert!(mean_f64.is_nan(), "Empty slice must return NaN (got: {mean_f64})");
    }

    #[test]
    fn exact_integer_means() {
        assert_abs_diff_eq!(Mean.compute(&[1.0_f32, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(Mean.compute(&[1.0_f64, 2.0, 3.0, 4.0, 5.0]), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn handles_negative_values_and_zero() {
        assert_abs_diff_eq!(Mean.compute(&[-10.5_f64, -3.2, 0.0, 7.1, 6.6]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn maintains_precision_at_scale() {
        let n = 1_000_000;
        let small = 1e-10_f64;
        let data: Vec<f64> = vec![small; n];

        assert_relative_eq!(
            Mean.compute(&data),
            small,
            epsilon = 1e-13,
            max_relative = 1e-13
        );
    }
}
