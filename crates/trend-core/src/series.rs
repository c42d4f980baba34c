//! Observation series container.
//!
//! The [`Series`] type holds an ordered sequence of equally spaced
//! observations (one value per day, month or year). Position `i` in the series
//! is the integer index the trend models fit against.

use core::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrendError};

/// An ordered series of observations.
///
/// # Example
///
/// ```rust
/// use trend_core::Series;
///
/// let mut series = Series::new();
/// series.push(120.0);
/// series.push(135.5);
/// series.push(128.0);
///
/// assert_eq!(series.len(), 3);
/// assert_eq!(series[1], 135.5);
/// assert_eq!(series.index_axis(), vec![0.0, 1.0, 2.0]);
/// assert_eq!(series.extended_axis(2), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Series {
    data: Vec<f64>,
}

impl Series {
    /// Create a new empty series.
    #[must_use]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Create a new series with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Create a series from an existing vector.
    #[must_use]
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Returns the number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the series contains no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Append an observation.
    pub fn push(&mut self, value: f64) {
        self.data.push(value);
    }

    /// Get the observation at the given index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    /// Get the last observation, if any.
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.data.last().copied()
    }

    /// Get the last `n` observations as a slice.
    ///
    /// If `n > len()`, returns the entire series.
    #[must_use]
    pub fn tail(&self, n: usize) -> &[f64] {
        let start = self.len().saturating_sub(n);
        &self.data[start..]
    }

    /// Returns an iterator over the observations.
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.data.iter()
    }

    /// Returns the underlying data as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Consumes the series and returns the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// The integer index axis `0..n-1` as floats.
    #[must_use]
    pub fn index_axis(&self) -> Vec<f64> {
        index_axis(self.len())
    }

    /// The index axis extended by `horizon` future periods: `0..n+horizon-1`.
    #[must_use]
    pub fn extended_axis(&self, horizon: usize) -> Vec<f64> {
        index_axis(self.len() + horizon)
    }

    /// Check that every observation is finite.
    ///
    /// # Errors
    ///
    /// Returns [`TrendError::NonFiniteObservation`] for the first NaN or
    /// infinite value.
    pub fn validate(&self) -> Result<()> {
        ensure_finite(&self.data)
    }
}

/// Build the index axis `0..len` as floats.
#[must_use]
pub fn index_axis(len: usize) -> Vec<f64> {
    (0..len).map(|i| i as f64).collect()
}

/// Check that every value in `values` is finite.
///
/// # Errors
///
/// Returns [`TrendError::NonFiniteObservation`] for the first NaN or infinite
/// value.
pub fn ensure_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(TrendError::NonFiniteObservation {
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

impl Index<usize> for Series {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl From<Vec<f64>> for Series {
    fn from(data: Vec<f64>) -> Self {
        Self::from_vec(data)
    }
}

impl From<&[f64]> for Series {
    fn from(data: &[f64]) -> Self {
        Self::from_vec(data.to_vec())
    }
}

impl FromIterator<f64> for Series {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl AsRef<[f64]> for Series {
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}
