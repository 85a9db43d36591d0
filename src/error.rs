//! Error taxonomy for the BLB pipeline.
//!
//! Replicate-level failures ([`BlbError::DegenerateVariance`]) stay inside the
//! replicator. Subsample-level failures surface as [`BlbError::InsufficientData`]
//! and are wrapped in [`BlbError::Aggregation`] once they reach the aggregator.

use crate::sample::SampleError;

/// Errors raised while estimating a statistic with the Bag of Little Bootstraps.
#[derive(Debug, thiserror::Error)]
pub enum BlbError {
    /// One of the columns has zero weighted variance, so correlation is undefined.
    #[error("degenerate variance: correlation undefined for zero-variance input")]
    DegenerateVariance,

    /// A subsample produced no usable replicate.
    #[error("subsample {subsample}: no usable values out of {replicates} replicates")]
    InsufficientData {
        /// Index of the failing subsample.
        subsample: usize,
        /// Number of replicates that were requested.
        replicates: usize,
    },

    /// The partition behind a subsample has no complete rows.
    #[error("subsample {subsample}: partition has no complete rows ({rows} loaded)")]
    EmptyPartition {
        /// Index of the failing subsample.
        subsample: usize,
        /// Rows loaded, every one with a missing field.
        rows: usize,
    },

    /// A subsample failed and the final estimate was aborted.
    #[error("aggregation aborted by subsample {subsample}: {source}")]
    Aggregation {
        /// Index of the subsample that failed.
        subsample: usize,
        /// Underlying cause.
        #[source]
        source: Box<BlbError>,
    },

    /// Caller-supplied parameters or input shapes are invalid.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The data source could not produce a partition.
    #[error(transparent)]
    Load(#[from] SampleError),
}

impl BlbError {
    /// Wrap `self` as the cause of an aborted aggregation.
    pub(crate) fn in_subsample(self, subsample: usize) -> Self {
        match self {
            already @ BlbError::Aggregation { .. } => already,
            other => BlbError::Aggregation {
                subsample,
                source: Box::new(other),
            },
        }
    }

    /// Index of the subsample that caused this error, if known.
    pub fn subsample(&self) -> Option<usize> {
        match self {
            BlbError::InsufficientData { subsample, .. }
            | BlbError::EmptyPartition { subsample, .. }
            | BlbError::Aggregation { subsample, .. } => Some(*subsample),
            _ => None,
        }
    }
}

/// Shorthand result type used across the crate.
pub type Result<T, E = BlbError> = std::result::Result<T, E>;
