mod read;
mod synthetic;

use serde::Deserialize;

pub use read::SampleError;
pub use synthetic::correlated_normal;

/// Ordered, immutable collection of observations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample<T> {
    /// Observations in load order.
    pub data: Vec<T>,
}

impl<T> Sample<T> {
    /// Create a new sample from raw data
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Get the number of observations in the sample
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the sample contains no observations
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> FromIterator<T> for Sample<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Sample::new(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Sample<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<T> AsRef<[T]> for Sample<T> {
    fn as_ref(&self) -> &[T] { &self.data }
}

/// One loaded row. Either field may be missing (empty CSV cell or NaN).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Record {
    /// First variable.
    pub x: Option<f64>,
    /// Second variable.
    pub y: Option<f64>,
}

impl Record {
    /// Row with both fields present.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y) }
    }

    /// The complete pair, or `None` if any field is missing or NaN.
    #[inline]
    pub fn complete(&self) -> Option<Pair> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if !x.is_nan() && !y.is_nan() => Some(Pair { x, y }),
            _ => None,
        }
    }
}

/// A row with no missing fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pair {
    /// First variable.
    pub x: f64,
    /// Second variable.
    pub y: f64,
}

impl Pair {
    /// Create a complete row.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Pair {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Rows as produced by a loader, possibly with missing fields.
pub type Dataset = Sample<Record>;

impl Sample<Record> {
    /// Drop rows with a missing field. Excluded rows never receive a weight slot.
    pub fn complete_pairs(&self) -> Sample<Pair> {
        self.data.iter().filter_map(Record::complete).collect()
    }
}

impl Sample<Pair> {
    /// Lift complete pairs back into a dataset, e.g. for an in-memory source.
    pub fn to_dataset(&self) -> Dataset {
        self.data.iter().map(|p| Record::new(p.x, p.y)).collect()
    }
}
