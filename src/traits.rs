//! Core traits for streaming accumulators
//!
//! Every algorithm in the crate implements [`Accumulator`]: values are fed one
//! at a time, in order, and a summary can be read back at any point in the
//! stream without re-reading earlier values.

use core::fmt::Debug;

/// Error raised by a streaming accumulator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MomentError {
    /// Observation width differs from the width fixed at construction
    #[error("dimension mismatch: expected {expected} values, found {found}")]
    DimensionMismatch {
        expected: usize,
        found: usize,
    },
    /// Summary requested before any observation was recorded
    #[error("no observations recorded")]
    Empty,
}

/// Core trait for all streaming accumulators
///
/// Updates must be applied in the order the observations occur; each one
/// depends on the complete state left by the previous one.
pub trait Accumulator: Clone + Debug {
    /// The type of item this accumulator consumes
    type Item: ?Sized;

    /// The statistics derived from the current state
    type Summary;

    /// Fold one observation into the running state
    fn update(&mut self, item: &Self::Item) -> Result<(), MomentError>;

    /// Derive the summary for everything seen so far
    ///
    /// Returns [`MomentError::Empty`] before the first update.
    fn summary(&self) -> Result<Self::Summary, MomentError>;

    /// Reset to the empty state, keeping configuration
    fn clear(&mut self);

    /// Memory usage in bytes, including heap buffers
    fn size_bytes(&self) -> usize;

    /// Number of items processed
    fn count(&self) -> u64;

    /// Check if no item has been processed
    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}
