pub use rand::Rng;

/// A resampling scheme: turns one input into a stream of resampled items.
pub trait Re<T> {
    /// What each resample produces.
    type Item;
    /// Endless stream of resamples of `t`; callers bound it with `take`.
    fn re(&self, t: &T) -> impl Iterator<Item = Self::Item>;
}

mod multinomial;
mod subsampling;

pub use multinomial::{Multinomial, Weights, WeightsIter};
pub use subsampling::draw_without_replacement;
