//! Where subsamples come from.
//!
//! A [`DataSource`] hands out whole partitions as loaded; a [`SubsampleSource`]
//! turns an index into the `b` complete rows one task works on.

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::{BlbError, Result};
use crate::resample::draw_without_replacement;
use crate::sample::{Dataset, Pair, Sample, SampleError};

/// Partitioned raw data, loaded one partition at a time.
pub trait DataSource {
    /// Number of partitions available.
    fn partition_count(&self) -> usize;

    /// Load partition `id`. Rows may contain missing fields.
    ///
    /// # Errors
    /// [`SampleError::UnknownPartition`] for an out-of-range id, or any load
    /// failure of the underlying storage.
    fn load_partition(&self, id: usize) -> Result<Dataset, SampleError>;
}

/// Partitions held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemory {
    partitions: Vec<Dataset>,
}

impl InMemory {
    /// One partition per dataset.
    pub fn new(partitions: Vec<Dataset>) -> Self {
        Self { partitions }
    }

    /// Split `dataset` into `parts` contiguous chunks of near-equal size.
    pub fn split(dataset: &Dataset, parts: usize) -> Self {
        let parts = parts.max(1);
        let chunk = dataset.len().div_ceil(parts).max(1);
        let partitions = dataset
            .data
            .chunks(chunk)
            .map(|c| Sample::new(c.to_vec()))
            .collect();
        Self { partitions }
    }
}

impl DataSource for InMemory {
    fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    fn load_partition(&self, id: usize) -> Result<Dataset, SampleError> {
        self.partitions
            .get(id)
            .cloned()
            .ok_or(SampleError::UnknownPartition { id, count: self.partitions.len() })
    }
}

/// One CSV file per partition, each with an `x,y` header.
#[derive(Debug, Clone, Default)]
pub struct CsvPartitions {
    paths: Vec<PathBuf>,
}

impl CsvPartitions {
    /// Partitions in the given order.
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Every `*.csv` file in `dir`, ordered by file name.
    ///
    /// # Errors
    /// [`SampleError::Io`] if the directory cannot be listed.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, SampleError> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(Self { paths })
    }

    /// Files backing each partition.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl DataSource for CsvPartitions {
    fn partition_count(&self) -> usize {
        self.paths.len()
    }

    fn load_partition(&self, id: usize) -> Result<Dataset, SampleError> {
        let path = self
            .paths
            .get(id)
            .ok_or(SampleError::UnknownPartition { id, count: self.paths.len() })?;
        log::debug!("loading partition {id} from {}", path.display());
        Dataset::read(path)
    }
}

/// Produces the subsample a single task works on.
pub trait SubsampleSource {
    /// Upper bound on the number of distinct subsamples, if any.
    fn capacity(&self) -> Option<usize>;

    /// Subsample `index` with up to `size` complete rows.
    ///
    /// # Errors
    /// Load failures, or [`BlbError::EmptyPartition`] when no complete row is left.
    fn subsample<R: Rng + ?Sized>(&self, index: usize, size: usize, rng: &mut R) -> Result<Sample<Pair>>;
}

/// An in-memory population; every subsample is a fresh draw without replacement.
#[derive(Debug, Clone)]
pub struct Population {
    rows: Sample<Pair>,
}

impl Population {
    /// Population of the complete rows of `dataset`.
    pub fn new(dataset: &Dataset) -> Self {
        Self { rows: dataset.complete_pairs() }
    }

    /// The complete rows.
    pub fn rows(&self) -> &Sample<Pair> {
        &self.rows
    }
}

impl From<Sample<Pair>> for Population {
    fn from(rows: Sample<Pair>) -> Self {
        Self { rows }
    }
}

impl SubsampleSource for Population {
    fn capacity(&self) -> Option<usize> {
        None
    }

    fn subsample<R: Rng + ?Sized>(&self, _index: usize, size: usize, rng: &mut R) -> Result<Sample<Pair>> {
        if self.rows.len() < size {
            return Err(BlbError::InvalidParameter(format!(
                "population has {} complete rows, fewer than subsample size {size}",
                self.rows.len()
            )));
        }
        Ok(Sample::new(draw_without_replacement(&self.rows.data, size, rng)))
    }
}

/// Subsample `i` comes from partition `i` of a [`DataSource`].
///
/// Partitions larger than `b` are subsampled without replacement; smaller
/// ones are used whole.
#[derive(Debug, Clone)]
pub struct Partitioned<D> {
    source: D,
}

impl<D: DataSource> Partitioned<D> {
    /// Wrap a partitioned data source.
    pub fn new(source: D) -> Self {
        Self { source }
    }

    /// The wrapped source.
    pub fn inner(&self) -> &D {
        &self.source
    }
}

impl<D: DataSource> SubsampleSource for Partitioned<D> {
    fn capacity(&self) -> Option<usize> {
        Some(self.source.partition_count())
    }

    fn subsample<R: Rng + ?Sized>(&self, index: usize, size: usize, rng: &mut R) -> Result<Sample<Pair>> {
        let dataset = self.source.load_partition(index)?;
        let rows = dataset.complete_pairs();
        let dropped = dataset.len() - rows.len();
        if dropped > 0 {
            log::debug!("partition {index}: dropped {dropped} rows with missing fields");
        }
        if rows.is_empty() {
            return Err(BlbError::EmptyPartition { subsample: index, rows: dataset.len() });
        }
        if rows.len() <= size {
            if rows.len() < size {
                log::debug!("partition {index}: only {} complete rows, using all", rows.len());
            }
            return Ok(rows);
        }
        Ok(Sample::new(draw_without_replacement(&rows.data, size, rng)))
    }
}
