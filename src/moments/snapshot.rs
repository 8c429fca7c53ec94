//! Statistics derived from a moment accumulator at a point in the stream

use nalgebra::{DMatrix, DVector};

use super::MomentAccumulator;
use crate::math;
use crate::traits::MomentError;

/// Point-in-time view of a [`MomentAccumulator`]
///
/// Recomputed from the accumulator on every read and independent of it
/// afterwards. Covariance, variance and standard deviation use the `n - 1`
/// (sample) denominator; skewness and excess kurtosis are the biased
/// population estimators.
///
/// After a single observation the covariance, variance, standard deviation
/// and correlation are NaN, skewness is zero and kurtosis is `-3.0`. When every
/// variable has been constant so far the correlation matrix is all ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Observations folded into the accumulator
    pub count: u64,
    /// Mean per variable
    pub mean: DVector<f64>,
    /// Sample covariance matrix
    pub covariance: DMatrix<f64>,
    /// Diagonal of `covariance`
    pub variance: DVector<f64>,
    /// Square root of `variance`
    pub std: DVector<f64>,
    /// Pearson correlation matrix
    pub correlation: DMatrix<f64>,
    /// Skewness per variable
    pub skewness: DVector<f64>,
    /// Excess kurtosis per variable
    pub kurtosis: DVector<f64>,
}

impl Snapshot {
    pub(crate) fn from_accumulator(acc: &MomentAccumulator) -> Result<Self, MomentError> {
        match acc.count() {
            0 => {
                log_warn!("snapshot requested before any observation");
                Err(MomentError::Empty)
            }
            1 => Ok(Self::single_observation(acc)),
            _ => Ok(Self::from_moments(acc)),
        }
    }

    fn single_observation(acc: &MomentAccumulator) -> Self {
        let dim = acc.dim();

        // Kurtosis of -3 mirrors scipy's result for a degenerate sample.
        Self {
            count: 1,
            mean: acc.mean().clone(),
            covariance: DMatrix::from_element(dim, dim, f64::NAN),
            variance: DVector::from_element(dim, f64::NAN),
            std: DVector::from_element(dim, f64::NAN),
            correlation: DMatrix::from_element(dim, dim, f64::NAN),
            skewness: DVector::zeros(dim),
            kurtosis: DVector::from_element(dim, -3.0),
        }
    }

    fn from_moments(acc: &MomentAccumulator) -> Self {
        let dim = acc.dim();
        let n = acc.count() as f64;
        let dof = n - 1.0;

        let covariance = acc.comoments().map(|s| s / dof);
        let variance = covariance.diagonal();
        let std = variance.map(math::sqrt);

        let (m2, m3, m4) = (acc.m2(), acc.m3(), acc.m4());
        let sqrt_n = math::sqrt(n);
        let skewness = DVector::from_fn(dim, |k, _| sqrt_n * m3[k] * math::powf(m2[k], -1.5));
        let kurtosis = DVector::from_fn(dim, |k, _| n * m4[k] * math::powf(m2[k], -2.0) - 3.0);

        let correlation = if std.iter().all(|&s| s == 0.0) {
            log_trace!(
                "all {} variables constant after {} observations, reporting unit correlation",
                dim,
                acc.count()
            );
            DMatrix::from_element(dim, dim, 1.0)
        } else {
            // std[i] * std[j] commutes, so the result stays exactly symmetric
            DMatrix::from_fn(dim, dim, |i, j| covariance[(i, j)] / (std[i] * std[j]))
        };

        Self {
            count: acc.count(),
            mean: acc.mean().clone(),
            covariance,
            variance,
            std,
            correlation,
            skewness,
            kurtosis,
        }
    }

    /// Number of tracked variables
    pub fn dim(&self) -> usize {
        self.mean.len()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Snapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        #[cfg(not(feature = "std"))]
        use alloc::vec::Vec;

        fn rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
            m.row_iter().map(|row| row.iter().copied().collect()).collect()
        }

        let mut state = serializer.serialize_struct("Snapshot", 8)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("mean", self.mean.as_slice())?;
        state.serialize_field("covariance", &rows(&self.covariance))?;
        state.serialize_field("variance", self.variance.as_slice())?;
        state.serialize_field("std", self.std.as_slice())?;
        state.serialize_field("correlation", &rows(&self.correlation))?;
        state.serialize_field("skewness", self.skewness.as_slice())?;
        state.serialize_field("kurtosis", self.kurtosis.as_slice())?;
        state.end()
    }
}
