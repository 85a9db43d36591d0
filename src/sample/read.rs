use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;

use super::Sample;

/// Failures while loading a sample or a data partition.
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV or a cell that does not deserialize.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// The file had a header but no records.
    #[error("CSV file contains no data records")]
    EmptyFile,

    /// The data source has no partition with this id.
    #[error("unknown partition {id} (source has {count})")]
    UnknownPartition {
        /// Requested id.
        id: usize,
        /// Number of partitions available.
        count: usize,
    },
}

impl<T: DeserializeOwned> Sample<T> {
    /// Read sample data from a CSV file with headers matching struct fields
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, SampleError> {
        let rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_path(path)?;
        Self::collect_records(rdr)
    }

    /// Read sample data from any CSV byte stream with a header row.
    pub fn read_from<R: Read>(reader: R) -> Result<Self, SampleError> {
        let rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);
        Self::collect_records(rdr)
    }

    fn collect_records<R: Read>(mut rdr: csv::Reader<R>) -> Result<Self, SampleError> {
        let mut records = Vec::new();
        for result in rdr.deserialize() {
            records.push(result?);
        }

        if records.is_empty() {
            return Err(SampleError::EmptyFile);
        }

        Ok(Self { data: records })
    }
}
