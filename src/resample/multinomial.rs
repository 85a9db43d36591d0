use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use super::Re;
use crate::Sample;
use crate::error::{BlbError, Result};

/// Per-row replication counts: row `i` stands for `w[i]` copies of itself.
pub type Weights = Vec<u32>;

/// Multinomial resampler: `n` virtual draws spread over `b` equally likely rows.
///
/// The weight vector has the same distribution as drawing `n` rows with
/// replacement and counting how often each was picked, without ever building
/// those `n` rows. Its length is `b` and it always sums to exactly `n`.
#[derive(Clone, Debug)]
pub struct Multinomial<R: Rng> {
    /// Random source; every draw advances it.
    pub rng: R,
    /// Target resample size (the number of virtual draws).
    pub n: u32,
}

impl<R: Rng> Multinomial<R> {
    /// Resampler producing weight vectors that sum to `n`.
    pub fn new(rng: R, n: u32) -> Self {
        Self { rng, n }
    }

    /// Draw one weight vector of length `b`.
    ///
    /// # Errors
    /// [`BlbError::InvalidParameter`] when `b == 0` but `n > 0`.
    pub fn draw(&mut self, b: usize) -> Result<Weights> {
        let mut weights = vec![0; b];
        self.draw_into(&mut weights)?;
        Ok(weights)
    }

    /// Overwrite `weights` with a fresh draw over `weights.len()` rows.
    ///
    /// # Errors
    /// [`BlbError::InvalidParameter`] when `weights` is empty but `n > 0`.
    pub fn draw_into(&mut self, weights: &mut [u32]) -> Result<()> {
        if weights.is_empty() {
            return if self.n == 0 {
                Ok(())
            } else {
                Err(BlbError::InvalidParameter(format!(
                    "cannot spread {} draws over zero rows",
                    self.n
                )))
            };
        }
        weights.fill(0);
        let rows = Uniform::new(0, weights.len());
        for _ in 0..self.n {
            if let Some(w) = weights.get_mut(rows.sample(&mut self.rng)) {
                *w += 1;
            }
        }
        Ok(())
    }
}

impl<T, R: Rng + Clone> Re<Sample<T>> for Multinomial<R> {
    type Item = Weights;

    fn re(&self, sample: &Sample<T>) -> impl Iterator<Item = Self::Item> {
        WeightsIter::new(sample.len(), self.clone())
    }
}

/// Endless stream of independent weight vectors for a fixed row count.
///
/// Stops early only when no valid vector exists (zero rows, positive `n`).
pub struct WeightsIter<R: Rng> {
    rows: usize,
    resampler: Multinomial<R>,
}

impl<R: Rng> WeightsIter<R> {
    fn new(rows: usize, resampler: Multinomial<R>) -> Self {
        Self { rows, resampler }
    }
}

impl<R: Rng> Iterator for WeightsIter<R> {
    type Item = Weights;

    fn next(&mut self) -> Option<Self::Item> {
        self.resampler.draw(self.rows).ok()
    }
}
