//! Bag of Little Bootstraps (BLB) confidence intervals.
//!
//! Each of `s` subsamples of `b` rows is bootstrapped `r` times at the full
//! resample size `n` through multinomial weight vectors, so no row is ever
//! duplicated. The per-subsample quantiles are averaged into the final
//! interval.
//!
//! ```no_run
//! use blb::{BlbConfig, Dataset, Orchestrator, Population};
//!
//! let data = Dataset::read("population.csv")?;
//! let config = BlbConfig::for_population(data.len()).with_seed(7);
//! let estimate = Orchestrator::new(Population::new(&data), config)?.run()?;
//! println!("{estimate}");
//! # Ok::<(), blb::BlbError>(())
//! ```

mod blb;
mod config;
mod display;
mod error;
mod resample;
mod sample;
mod source;
mod statistics;

pub use crate::blb::*;
pub use crate::config::{BlbConfig, FailurePolicy};
pub use crate::error::{BlbError, Result};
pub use crate::resample::*;
pub use crate::sample::{Dataset, Pair, Record, Sample, SampleError, correlated_normal};
pub use crate::source::{CsvPartitions, DataSource, InMemory, Partitioned, Population, SubsampleSource};
pub use crate::statistics::*;
pub use rand;
