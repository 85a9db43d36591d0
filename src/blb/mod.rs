//! The Bag of Little Bootstraps pipeline.
//!
//! ```text
//! source ──► subsample i (b rows) ──► r × (multinomial weights → statistic)
//!        ──► per-subsample quantiles ──► mean over subsamples
//! ```

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

mod replicator;
mod aggregator;
mod orchestrator;

pub use replicator::{BootstrapReplicator, SubsampleSummary};
pub use aggregator::{FinalEstimate, PROB_TOLERANCE, SubsampleAggregator};
pub use orchestrator::Orchestrator;

/// Random stream owned by subsample task `index`.
///
/// Streams are 2^128 steps apart, so tasks never share random numbers and the
/// result does not depend on which worker runs which task.
pub fn task_rng(seed: u64, index: usize) -> Xoshiro256PlusPlus {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    for _ in 0..=index {
        rng.jump();
    }
    rng
}
