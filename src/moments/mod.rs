//! Multivariate moments over streaming observations
//!
//! This module computes, in a single pass, the running mean vector,
//! covariance and correlation matrices, and per-variable variance, standard
//! deviation, skewness and excess kurtosis of a stream of fixed-width
//! observation vectors (for example, per-period returns of a fixed set of
//! assets).
//!
//! # Algorithms
//!
//! - [`MomentAccumulator`]: one-pass update of the 1st to 4th central moments
//!   and the pairwise co-moment matrix
//! - [`Snapshot`]: statistics derived from the accumulator on demand
//! - [`MomentHistory`]: the snapshot of every period of a data set
//!
//! # Example
//!
//! ```
//! use flowmoments::moments::MomentAccumulator;
//!
//! let mut acc = MomentAccumulator::new(3);
//!
//! for returns in [
//!     [0.010, -0.020, 0.005],
//!     [0.030, 0.010, -0.015],
//!     [-0.020, 0.040, 0.000],
//! ] {
//!     acc.update(&returns).unwrap();
//!     let snapshot = acc.snapshot().unwrap();
//!     println!("period {}: mean {:?}", snapshot.count, snapshot.mean.as_slice());
//! }
//! ```

mod accumulator;
mod history;
mod snapshot;

pub use accumulator::MomentAccumulator;
pub use history::MomentHistory;
pub use snapshot::Snapshot;
