//! Numerically stable log-sum-exp
//!
//! Computing `ln(Σ exp(x))` directly overflows to infinity as soon as one
//! `exp(x)` does. Both forms here shift every exponent by the maximum so the
//! largest term is exactly `1`.
//!
//! # Example
//!
//! ```
//! use flowmoments::logsumexp::{log_sum_exp, RunningLogSumExp};
//!
//! let data = [1000.0, 1000.0];
//!
//! let mut lse = RunningLogSumExp::new();
//! for x in data {
//!     lse.add(x);
//! }
//!
//! let expected = 1000.0 + core::f64::consts::LN_2;
//! assert!((lse.value().unwrap() - expected).abs() < 1e-9);
//! assert!((log_sum_exp(&data).unwrap() - expected).abs() < 1e-9);
//! ```

mod running;

pub use running::{log_sum_exp, RunningLogSumExp};
