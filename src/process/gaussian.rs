//! Gaussian distribution over a runtime-dimension vector space.

use nalgebra::{DMatrix, DVector, SymmetricEigen};

use super::traits::Moments;

/// Multivariate Gaussian with a cached covariance square root.
///
/// The square root is recomputed whenever the covariance is set, so that
/// [`map_standard_normal`](Gaussian::map_standard_normal) stays a single
/// matrix-vector product on the sampling path.
#[derive(Debug, Clone)]
pub struct Gaussian {
    mean: DVector<f64>,
    covariance: DMatrix<f64>,
    sqrt_covariance: DMatrix<f64>,
}

impl Gaussian {
    /// Standard normal of the given dimension (zero mean, unit covariance).
    pub fn standard(dimension: usize) -> Self {
        Self {
            mean: DVector::zeros(dimension),
            covariance: DMatrix::identity(dimension, dimension),
            sqrt_covariance: DMatrix::identity(dimension, dimension),
        }
    }

    /// Dimension of the distribution.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.mean.len()
    }

    /// Set the mean vector.
    pub fn set_mean(&mut self, mean: DVector<f64>) {
        debug_assert_eq!(mean.len(), self.mean.len());
        self.mean = mean;
    }

    /// Set the covariance matrix and refresh the cached square root.
    ///
    /// Uses the Cholesky factor when the matrix is positive definite.
    /// Positive *semi*-definite covariances (a zero process-noise floor is
    /// legitimate) fall back to a symmetric eigendecomposition square root
    /// with negative eigenvalues clamped to zero.
    pub fn set_covariance(&mut self, covariance: DMatrix<f64>) {
        debug_assert_eq!(covariance.nrows(), self.mean.len());
        debug_assert_eq!(covariance.ncols(), self.mean.len());

        self.sqrt_covariance = match covariance.clone().cholesky() {
            Some(cholesky) => cholesky.l(),
            None => {
                let eigen = SymmetricEigen::new(covariance.clone());
                let sqrt_values = eigen
                    .eigenvalues
                    .map(|v| if v > 0.0 { v.sqrt() } else { 0.0 });
                &eigen.eigenvectors * DMatrix::from_diagonal(&sqrt_values)
            }
        };
        self.covariance = covariance;
    }

    /// Map a standard-normal noise vector to a sample: `mean + sqrt(Σ)·noise`.
    pub fn map_standard_normal(&self, noise: &DVector<f64>) -> DVector<f64> {
        debug_assert_eq!(noise.len(), self.dimension());
        &self.mean + &self.sqrt_covariance * noise
    }
}

impl Moments for Gaussian {
    fn mean(&self) -> &DVector<f64> {
        &self.mean
    }

    fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }
}
