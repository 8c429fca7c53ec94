//! # Flowmoments
//!
//! Single-pass multivariate moments for streaming data.
//!
//! Flowmoments computes the running mean, covariance, correlation, variance,
//! standard deviation, skewness and kurtosis of a stream of fixed-width
//! observation vectors, reading every observation exactly once. Updates work on
//! deviations from the current mean, which keeps results accurate even when
//! values span many orders of magnitude.
//!
//! ## Features
//!
//! - **Multivariate Moments**: mean vector, covariance and correlation matrices,
//!   skewness and excess kurtosis with [`MomentAccumulator`]
//! - **Full History**: per-period snapshots of a whole data set with
//!   [`MomentHistory`](moments::MomentHistory)
//! - **Stable Log-Sum-Exp**: streaming `ln(Σ exp(x))` without overflow with
//!   [`RunningLogSumExp`]
//! - **no_std**: works with `alloc` only
//!
//! ## Quick Start
//!
//! ```rust
//! use flowmoments::prelude::*;
//!
//! // Daily returns for two assets
//! let mut acc = MomentAccumulator::new(2);
//! for day in [[0.01, 0.02], [-0.02, -0.01], [0.03, 0.01], [0.00, 0.02]] {
//!     acc.update(&day).unwrap();
//! }
//!
//! let snapshot = acc.snapshot().unwrap();
//! println!("correlation: {}", snapshot.correlation[(0, 1)]);
//! println!("skewness: {:?}", snapshot.skewness.as_slice());
//! ```
//!
//! ## Error Handling
//!
//! Observations whose width differs from the accumulator's and reads before
//! the first observation are reported as [`MomentError`]. Non-finite input is
//! not checked: a NaN poisons every statistic of its variable from then on.
//!
//! ## Feature Flags
//!
//! Algorithm families (pick what you need):
//! - `moments` (default): multivariate moment accumulator and snapshots
//! - `logsumexp` (default): streaming and two-pass stable log-sum-exp
//! - `full`: Enable all algorithm families
//!
//! Platform features:
//! - `std` (default): Standard library support
//! - `serde`: Enable serialization
//! - `log`: Diagnostic events through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(not(feature = "std"))]
extern crate alloc;

mod fmt;
mod math;

// Core traits always available
pub mod traits;

#[cfg(feature = "moments")]
#[cfg_attr(docsrs, doc(cfg(feature = "moments")))]
pub mod moments;

#[cfg(feature = "logsumexp")]
#[cfg_attr(docsrs, doc(cfg(feature = "logsumexp")))]
pub mod logsumexp;

pub mod prelude {
    pub use crate::traits::*;

    #[cfg(feature = "moments")]
    pub use crate::moments::{MomentAccumulator, MomentHistory, Snapshot};

    #[cfg(feature = "logsumexp")]
    pub use crate::logsumexp::{log_sum_exp, RunningLogSumExp};
}

pub use traits::MomentError;

#[cfg(feature = "moments")]
pub use moments::MomentAccumulator;

#[cfg(feature = "logsumexp")]
pub use logsumexp::RunningLogSumExp;
