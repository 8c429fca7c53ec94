//! Single-pass accumulator for multivariate central moments
//!
//! Generalizes Welford's recurrence to the 3rd and 4th central moments
//! (Pébay's one-pass update) and to the full pairwise co-moment matrix.

use nalgebra::{DMatrix, DVector};

use super::Snapshot;
use crate::traits::{Accumulator, MomentError};

/// Running central moments of a fixed-width vector stream
///
/// Holds, per tracked variable, the running mean and the sums of 2nd, 3rd and
/// 4th powers of deviations, plus the symmetric co-moment matrix. Every update
/// works on deviations from the *current* mean, so intermediate quantities stay
/// close to zero regardless of the magnitude of the data.
///
/// # Example
///
/// ```
/// use flowmoments::moments::MomentAccumulator;
///
/// let mut acc = MomentAccumulator::new(2);
///
/// for row in [[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]] {
///     acc.update(&row).unwrap();
/// }
///
/// let snapshot = acc.snapshot().unwrap();
/// assert!((snapshot.mean[0] - 2.0).abs() < 1e-12);
/// assert!((snapshot.covariance[(0, 1)] - 1.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct MomentAccumulator {
    /// Number of tracked variables
    dim: usize,
    /// Number of observations seen
    count: u64,
    /// Running mean (M1)
    mean: DVector<f64>,
    /// Sum of squared deviations
    m2: DVector<f64>,
    /// Sum of cubed deviations
    m3: DVector<f64>,
    /// Sum of 4th-power deviations
    m4: DVector<f64>,
    /// Pairwise co-moments; diagonal equals `m2`
    comoments: DMatrix<f64>,
    /// Scratch: deviation from the previous mean
    delta: DVector<f64>,
    /// Scratch: deviation from the updated mean
    residual: DVector<f64>,
}

impl MomentAccumulator {
    /// Create an empty accumulator tracking `dim` variables
    ///
    /// # Panics
    ///
    /// Panics if `dim` is zero
    pub fn new(dim: usize) -> Self {
        assert!(dim > 0, "dim must be positive");

        log_debug!("moment accumulator created for {} variables", dim);

        Self {
            dim,
            count: 0,
            mean: DVector::zeros(dim),
            m2: DVector::zeros(dim),
            m3: DVector::zeros(dim),
            m4: DVector::zeros(dim),
            comoments: DMatrix::zeros(dim, dim),
            delta: DVector::zeros(dim),
            residual: DVector::zeros(dim),
        }
    }

    /// Fold one observation into the running moments
    ///
    /// Returns [`MomentError::DimensionMismatch`] if `x` does not have exactly
    /// [`dim`](Self::dim) values; the state is left untouched in that case.
    ///
    /// Non-finite values are not checked. A NaN permanently poisons the
    /// moments of its variable and the co-moments it takes part in.
    pub fn update(&mut self, x: &[f64]) -> Result<(), MomentError> {
        if x.len() != self.dim {
            log_warn!(
                "rejected observation with {} values, accumulator tracks {}",
                x.len(),
                self.dim
            );
            return Err(MomentError::DimensionMismatch {
                expected: self.dim,
                found: x.len(),
            });
        }

        let prev = self.count as f64;
        self.count += 1;
        let n = self.count as f64;
        let n_poly = n * n - 3.0 * n + 3.0;

        for k in 0..self.dim {
            let delta = x[k] - self.mean[k];
            let delta_n = delta / n;
            let delta_n2 = delta_n * delta_n;
            let term1 = delta * delta_n * prev;

            // Each line reads the previous value of the next-lower moment.
            self.m4[k] += term1 * delta_n2 * n_poly + 6.0 * delta_n2 * self.m2[k]
                - 4.0 * delta_n * self.m3[k];
            self.m3[k] += term1 * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2[k];
            self.m2[k] += term1;
            self.mean[k] += delta_n;

            self.delta[k] = delta;
            self.residual[k] = delta - delta_n;
        }

        if self.count > 1 {
            self.update_comoments();
        }

        Ok(())
    }

    /// Refresh the co-moment matrix from the deviations of the last update
    ///
    /// Only the upper triangle is accumulated; the lower triangle is copied
    /// from it so both halves stay bit-identical.
    fn update_comoments(&mut self) {
        for i in 0..self.dim {
            self.comoments[(i, i)] = self.m2[i];
            for j in (i + 1)..self.dim {
                self.comoments[(i, j)] += self.delta[i] * self.residual[j];
                self.comoments[(j, i)] = self.comoments[(i, j)];
            }
        }
    }

    /// Derive the current statistics
    ///
    /// Returns [`MomentError::Empty`] before the first observation.
    pub fn snapshot(&self) -> Result<Snapshot, MomentError> {
        Snapshot::from_accumulator(self)
    }

    /// Number of tracked variables
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of observations seen
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Check if no observation has been seen
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Running mean per variable
    pub fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    /// Sum of squared deviations per variable
    pub fn m2(&self) -> &DVector<f64> {
        &self.m2
    }

    /// Sum of cubed deviations per variable
    pub fn m3(&self) -> &DVector<f64> {
        &self.m3
    }

    /// Sum of 4th-power deviations per variable
    pub fn m4(&self) -> &DVector<f64> {
        &self.m4
    }

    /// Unnormalized co-moment matrix
    pub fn comoments(&self) -> &DMatrix<f64> {
        &self.comoments
    }
}

impl Accumulator for MomentAccumulator {
    type Item = [f64];
    type Summary = Snapshot;

    fn update(&mut self, item: &Self::Item) -> Result<(), MomentError> {
        MomentAccumulator::update(self, item)
    }

    fn summary(&self) -> Result<Self::Summary, MomentError> {
        self.snapshot()
    }

    fn clear(&mut self) {
        *self = Self::new(self.dim);
    }

    fn size_bytes(&self) -> usize {
        let buffers = 6 * self.dim + self.dim * self.dim;
        core::mem::size_of::<Self>() + buffers * core::mem::size_of::<f64>()
    }

    fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MomentAccumulator {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("MomentAccumulator", 7)?;
        state.serialize_field("dim", &self.dim)?;
        state.serialize_field("count", &self.count)?;
        state.serialize_field("mean", self.mean.as_slice())?;
        state.serialize_field("m2", self.m2.as_slice())?;
        state.serialize_field("m3", self.m3.as_slice())?;
        state.serialize_field("m4", self.m4.as_slice())?;
        // column-major, but the matrix is symmetric
        state.serialize_field("comoments", self.comoments.as_slice())?;
        state.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for MomentAccumulator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        #[cfg(not(feature = "std"))]
        use alloc::vec::Vec;

        #[derive(serde::Deserialize)]
        struct AccumulatorData {
            dim: usize,
            count: u64,
            mean: Vec<f64>,
            m2: Vec<f64>,
            m3: Vec<f64>,
            m4: Vec<f64>,
            comoments: Vec<f64>,
        }

        let data = AccumulatorData::deserialize(deserializer)?;
        if data.dim == 0 {
            return Err(D::Error::invalid_value(
                serde::de::Unexpected::Unsigned(0),
                &"a positive dimension",
            ));
        }
        for moment in [&data.mean, &data.m2, &data.m3, &data.m4] {
            if moment.len() != data.dim {
                return Err(D::Error::invalid_length(moment.len(), &"one value per variable"));
            }
        }
        if data.comoments.len() != data.dim * data.dim {
            return Err(D::Error::invalid_length(
                data.comoments.len(),
                &"dim * dim co-moments",
            ));
        }

        let comoments = DMatrix::from_vec(data.dim, data.dim, data.comoments);
        for i in 0..data.dim {
            // Diagonal is only synced with M2 once a second observation arrives
            if data.count > 1 && !same_value(comoments[(i, i)], data.m2[i]) {
                return Err(D::Error::custom("co-moment diagonal differs from m2"));
            }
            for j in (i + 1)..data.dim {
                if !same_value(comoments[(i, j)], comoments[(j, i)]) {
                    return Err(D::Error::custom("co-moment matrix is not symmetric"));
                }
            }
        }

        Ok(MomentAccumulator {
            dim: data.dim,
            count: data.count,
            mean: DVector::from_vec(data.mean),
            m2: DVector::from_vec(data.m2),
            m3: DVector::from_vec(data.m3),
            m4: DVector::from_vec(data.m4),
            comoments,
            delta: DVector::zeros(data.dim),
            residual: DVector::zeros(data.dim),
        })
    }
}

/// Bit-level equality that also matches any NaN with any NaN
#[cfg(feature = "serde")]
fn same_value(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}
