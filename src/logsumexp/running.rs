//! Streaming and two-pass stable log-sum-exp

use crate::math;
use crate::traits::{Accumulator, MomentError};

/// Running `ln(Σ exp(x))` over a stream
///
/// Keeps the largest value seen and the sum of `exp(x - max)`. When a new
/// maximum arrives the sum is rescaled to it, so no term ever exceeds `1`.
///
/// # Example
///
/// ```
/// use flowmoments::logsumexp::RunningLogSumExp;
///
/// let mut lse = RunningLogSumExp::new();
/// for x in [-1000.0, 0.0, 2500.0] {
///     lse.add(x);
/// }
///
/// // exp(2500) overflows, the running form does not
/// assert!((lse.value().unwrap() - 2500.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct RunningLogSumExp {
    /// Number of values seen
    count: u64,
    /// Largest value seen
    max: f64,
    /// Sum of exp(x - max)
    sum_exp: f64,
}

impl Default for RunningLogSumExp {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningLogSumExp {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self {
            count: 0,
            max: f64::NEG_INFINITY,
            sum_exp: 0.0,
        }
    }

    /// Add a value to the sum
    ///
    /// `-inf` contributes nothing. NaN and `+inf` are not checked and make
    /// the result undefined.
    pub fn add(&mut self, x: f64) {
        self.count += 1;

        if x == f64::NEG_INFINITY {
            return;
        }

        if x <= self.max {
            self.sum_exp += math::exp(x - self.max);
        } else {
            // exp(-inf) is 0, so the first finite value starts the sum at 1
            self.sum_exp = self.sum_exp * math::exp(self.max - x) + 1.0;
            self.max = x;
        }
    }

    /// `ln(Σ exp(x))` over all values, `None` if empty
    pub fn value(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else if self.max == f64::NEG_INFINITY {
            Some(f64::NEG_INFINITY)
        } else {
            Some(math::ln(self.sum_exp) + self.max)
        }
    }

    /// Largest value seen, `None` if empty
    pub fn max(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.max)
        }
    }

    /// Get the number of values
    pub fn len(&self) -> u64 {
        self.count
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Accumulator for RunningLogSumExp {
    type Item = f64;
    type Summary = f64;

    fn update(&mut self, item: &Self::Item) -> Result<(), MomentError> {
        self.add(*item);
        Ok(())
    }

    fn summary(&self) -> Result<Self::Summary, MomentError> {
        self.value().ok_or(MomentError::Empty)
    }

    fn clear(&mut self) {
        *self = Self::new();
    }

    fn size_bytes(&self) -> usize {
        core::mem::size_of::<Self>()
    }

    fn count(&self) -> u64 {
        self.count
    }
}

/// Two-pass `ln(Σ exp(x))`, `None` for an empty slice
///
/// Finds the maximum first, then sums the shifted exponentials.
pub fn log_sum_exp(data: &[f64]) -> Option<f64> {
    let max = data.iter().copied().reduce(f64::max)?;
    if max == f64::NEG_INFINITY {
        return Some(f64::NEG_INFINITY);
    }

    let sum_exp: f64 = data.iter().map(|&x| math::exp(x - max)).sum();
    Some(math::ln(sum_exp) + max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn naive(data: &[f64]) -> f64 {
        data.iter().map(|x| x.exp()).sum::<f64>().ln()
    }

    #[test]
    fn test_basic() {
        let data = [0.5, -1.25, 2.0, 0.0, 1.75];
        let expected = naive(&data);

        let mut lse = RunningLogSumExp::new();
        for x in data {
            lse.add(x);
        }

        assert_eq!(lse.len(), 5);
        assert_eq!(lse.max(), Some(2.0));
        assert_relative_eq!(lse.value().unwrap(), expected, max_relative = 1e-14);
        assert_relative_eq!(log_sum_exp(&data).unwrap(), expected, max_relative = 1e-14);
    }

    #[test]
    fn test_single_value() {
        let mut lse = RunningLogSumExp::new();
        lse.add(-3.5);

        assert_eq!(lse.value(), Some(-3.5));
        assert_eq!(log_sum_exp(&[-3.5]), Some(-3.5));
    }

    #[test]
    fn test_empty() {
        let lse = RunningLogSumExp::new();

        assert!(lse.is_empty());
        assert_eq!(lse.value(), None);
        assert_eq!(lse.max(), None);
        assert_eq!(lse.summary(), Err(MomentError::Empty));
        assert_eq!(log_sum_exp(&[]), None);
    }

    #[test]
    fn test_increasing_and_decreasing_order_agree() {
        let up: Vec<f64> = (0..50).map(|i| i as f64 * 0.7 - 10.0).collect();
        let down: Vec<f64> = up.iter().rev().copied().collect();

        let mut a = RunningLogSumExp::new();
        let mut b = RunningLogSumExp::new();
        for (&x, &y) in up.iter().zip(&down) {
            a.add(x);
            b.add(y);
        }

        assert_relative_eq!(a.value().unwrap(), b.value().unwrap(), max_relative = 1e-13);
        assert_relative_eq!(a.value().unwrap(), naive(&up), max_relative = 1e-13);
    }

    #[test]
    fn test_overflow_avoided() {
        let data = [710.0, 710.0, 709.0];
        assert!(naive(&data).is_infinite());

        let expected = 710.0 + (2.0 + (-1.0_f64).exp()).ln();

        let mut lse = RunningLogSumExp::new();
        for x in data {
            lse.add(x);
        }
        assert_relative_eq!(lse.value().unwrap(), expected, max_relative = 1e-14);
        assert_relative_eq!(log_sum_exp(&data).unwrap(), expected, max_relative = 1e-14);
    }

    #[test]
    fn test_underflow_avoided() {
        let data = [-800.0, -800.0];
        assert_eq!(naive(&data), f64::NEG_INFINITY);

        let expected = -800.0 + core::f64::consts::LN_2;
        assert_relative_eq!(log_sum_exp(&data).unwrap(), expected, max_relative = 1e-14);

        let mut lse = RunningLogSumExp::new();
        lse.add(-800.0);
        lse.add(-800.0);
        assert_relative_eq!(lse.value().unwrap(), expected, max_relative = 1e-14);
    }

    #[test]
    fn test_negative_infinity() {
        let mut lse = RunningLogSumExp::new();
        lse.add(f64::NEG_INFINITY);
        assert_eq!(lse.value(), Some(f64::NEG_INFINITY));

        lse.add(1.0);
        lse.add(f64::NEG_INFINITY);
        assert_eq!(lse.value(), Some(1.0));
        assert_eq!(lse.len(), 3);

        assert_eq!(
            log_sum_exp(&[f64::NEG_INFINITY, f64::NEG_INFINITY]),
            Some(f64::NEG_INFINITY)
        );
        assert_eq!(log_sum_exp(&[f64::NEG_INFINITY, 1.0]), Some(1.0));
    }

    #[test]
    fn test_clear() {
        let mut lse = RunningLogSumExp::new();
        lse.update(&4.0).unwrap();
        lse.update(&5.0).unwrap();

        lse.clear();

        assert!(Accumulator::is_empty(&lse));
        assert_eq!(lse.value(), None);
        assert_eq!(lse.size_bytes(), core::mem::size_of::<RunningLogSumExp>());
    }
}
