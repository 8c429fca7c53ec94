//! Per-period statistics over a complete data set

use nalgebra::DMatrix;

use super::{MomentAccumulator, Snapshot};
use crate::traits::MomentError;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Snapshot of every period of a stream
///
/// Feeds the rows of a data set, in order, into a single
/// [`MomentAccumulator`] and keeps the snapshot taken after each one. Period
/// `i` therefore describes rows `0..=i`.
///
/// # Example
///
/// ```
/// use flowmoments::moments::MomentHistory;
///
/// let rows = [[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]];
/// let history = MomentHistory::from_rows(2, rows.iter()).unwrap();
///
/// assert_eq!(history.len(), 3);
/// assert_eq!(history.get(1).unwrap().mean[0], 1.5);
/// assert_eq!(history.last().unwrap().covariance[(0, 1)], 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct MomentHistory {
    dim: usize,
    periods: Vec<Snapshot>,
}

impl MomentHistory {
    /// Run the accumulator over `rows`, keeping every period's snapshot
    ///
    /// Stops at the first row whose width differs from `dim` and returns
    /// [`MomentError::DimensionMismatch`].
    ///
    /// # Panics
    ///
    /// Panics if `dim` is zero
    pub fn from_rows<I, R>(dim: usize, rows: I) -> Result<Self, MomentError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[f64]>,
    {
        let mut acc = MomentAccumulator::new(dim);
        let rows = rows.into_iter();
        let mut periods = Vec::with_capacity(rows.size_hint().0);

        for row in rows {
            acc.update(row.as_ref())?;
            periods.push(acc.snapshot()?);
        }

        log_debug!("moment history computed over {} periods", periods.len());

        Ok(Self { dim, periods })
    }

    /// Run the accumulator over a matrix holding one period per row
    ///
    /// # Panics
    ///
    /// Panics if `data` has no columns
    pub fn from_matrix(data: &DMatrix<f64>) -> Result<Self, MomentError> {
        let rows = data
            .row_iter()
            .map(|view| view.iter().copied().collect::<Vec<f64>>());
        Self::from_rows(data.ncols(), rows)
    }

    /// Number of tracked variables
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of periods
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Check if the data set had no rows
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Snapshot after `period + 1` observations
    pub fn get(&self, period: usize) -> Option<&Snapshot> {
        self.periods.get(period)
    }

    /// Snapshot after the whole data set
    pub fn last(&self) -> Option<&Snapshot> {
        self.periods.last()
    }

    /// Iterate over periods in order
    pub fn iter(&self) -> core::slice::Iter<'_, Snapshot> {
        self.periods.iter()
    }

    /// Take ownership of the per-period snapshots
    pub fn into_snapshots(self) -> Vec<Snapshot> {
        self.periods
    }
}

impl<'a> IntoIterator for &'a MomentHistory {
    type Item = &'a Snapshot;
    type IntoIter = core::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.iter()
    }
}
