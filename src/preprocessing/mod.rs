//! Preprocessing transformers applied between raw features and the models.
//!
//! The scaler is fitted exactly once, on the training partition only, and
//! reused verbatim at inference time. Test and inference data never feed
//! back into the fitted parameters.

use crate::error::{CorazonError, Result};
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Minimum std below which a feature is treated as constant.
const STD_EPSILON: f32 = 1e-10;

/// Standardizes features by removing mean and scaling to unit variance.
///
/// The standard score of a sample x is: z = (x - mean) / std, applied
/// per feature in the column order the scaler was fitted on.
///
/// Zero-variance features are guarded: a feature whose std is at or
/// below `1e-10` is centered but not divided, so constant columns map to
/// exactly 0.0 instead of producing NaN or Inf.
///
/// # Example
///
/// ```
/// use corazon::preprocessing::StandardScaler;
/// use corazon::primitives::Matrix;
///
/// let data = Matrix::from_vec(3, 2, vec![
///     0.0, 0.0,
///     1.0, 10.0,
///     2.0, 20.0,
/// ]).expect("valid matrix dimensions");
///
/// let mut scaler = StandardScaler::new();
/// let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
/// assert_eq!(scaled.shape(), (3, 2));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f32>>,
    /// Standard deviation of each feature (computed during fit).
    std: Option<Vec<f32>>,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Creates a new unfitted `StandardScaler`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
        }
    }

    /// Returns the mean of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn mean(&self) -> &[f32] {
        self.mean
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns the standard deviation of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn std(&self) -> &[f32] {
        self.std
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Computes the mean and standard deviation of each feature.
    ///
    /// Uses population std (divide by n, not n-1).
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix has zero samples.
    pub fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        let mut mean = vec![0.0; n_features];
        for (j, mean_j) in mean.iter_mut().enumerate() {
            let mut sum = 0.0;
            for i in 0..n_samples {
                sum += x.get(i, j);
            }
            *mean_j = sum / n_samples as f32;
        }

        let mut std = vec![0.0; n_features];
        for (j, std_j) in std.iter_mut().enumerate() {
            let mut sum_sq = 0.0;
            for i in 0..n_samples {
                let diff = x.get(i, j) - mean[j];
                sum_sq += diff * diff;
            }
            *std_j = (sum_sq / n_samples as f32).sqrt();
        }

        self.mean = Some(mean);
        self.std = Some(std);

        Ok(())
    }

    /// Standardizes a batch using the fitted mean and std.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted, or `SchemaMismatch`
    /// if the column count differs from the fitted state.
    pub fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let mean = self
            .mean
            .as_ref()
            .ok_or_else(|| CorazonError::from("Scaler not fitted"))?;
        let std = self
            .std
            .as_ref()
            .ok_or_else(|| CorazonError::from("Scaler not fitted"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(CorazonError::SchemaMismatch {
                expected: mean.len(),
                actual: n_features,
            });
        }

        let mut result = vec![0.0; n_samples * n_features];
        for i in 0..n_samples {
            for j in 0..n_features {
                let mut val = x.get(i, j) - mean[j];
                if std[j] > STD_EPSILON {
                    val /= std[j];
                }
                result[i * n_features + j] = val;
            }
        }

        Matrix::from_vec(n_samples, n_features, result)
            .map_err(|e| CorazonError::Other(e.to_string()))
    }

    /// Standardizes a single record.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`StandardScaler::transform`].
    pub fn transform_row(&self, row: &[f32]) -> Result<Vec<f32>> {
        let matrix = Matrix::from_vec(1, row.len(), row.to_vec())
            .map_err(|e| CorazonError::Other(e.to_string()))?;
        let scaled = self.transform(&matrix)?;
        Ok(scaled.as_slice().to_vec())
    }

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    pub fn fit_transform(&mut self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.fit(x)?;
        self.transform(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_computes_mean_and_population_std() {
        let data = Matrix::from_vec(4, 1, vec![2.0, 4.0, 6.0, 8.0]).expect("valid dimensions");
        let mut scaler = StandardScaler::new();
        scaler.fit(&data).expect("fit succeeds");

        assert!((scaler.mean()[0] - 5.0).abs() < 1e-6);
        // population std: sqrt(((−3)² + (−1)² + 1² + 3²) / 4) = sqrt(5)
        assert!((scaler.std()[0] - 5.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_transform_standardizes_columns() {
        let data = Matrix::from_vec(4, 2, vec![
            1.0, 100.0,
            2.0, 200.0,
            3.0, 300.0,
            4.0, 400.0,
        ])
        .expect("valid dimensions");

        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&data).expect("fit_transform succeeds");

        let (n_rows, n_cols) = scaled.shape();
        for j in 0..n_cols {
            let mut sum = 0.0;
            for i in 0..n_rows {
                sum += scaled.get(i, j);
            }
            assert!((sum / n_rows as f32).abs() < 1e-5, "column mean should be ~0");
        }
    }

    #[test]
    fn test_transform_unfitted_fails() {
        let data = Matrix::from_vec(1, 2, vec![1.0, 2.0]).expect("valid dimensions");
        let scaler = StandardScaler::new();
        assert!(scaler.transform(&data).is_err());
    }

    #[test]
    fn test_transform_column_count_mismatch_is_schema_error() {
        let train = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).expect("valid dimensions");
        let mut scaler = StandardScaler::new();
        scaler.fit(&train).expect("fit succeeds");

        let narrow = Matrix::from_vec(1, 1, vec![1.0]).expect("valid dimensions");
        let err = scaler.transform(&narrow).expect_err("width mismatch");
        assert!(matches!(
            err,
            CorazonError::SchemaMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_zero_variance_feature_maps_to_zero() {
        let data = Matrix::from_vec(3, 2, vec![
            5.0, 1.0,
            5.0, 2.0,
            5.0, 3.0,
        ])
        .expect("valid dimensions");

        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&data).expect("fit_transform succeeds");

        for i in 0..3 {
            let val = scaled.get(i, 0);
            assert_eq!(val, 0.0, "constant column must map to exactly 0.0");
            assert!(val.is_finite());
        }
        // The varying column still standardizes normally.
        assert!(scaled.get(0, 1) < 0.0);
        assert!(scaled.get(2, 1) > 0.0);
    }

    #[test]
    fn test_transform_row_matches_batch_transform() {
        let train = Matrix::from_vec(3, 2, vec![
            1.0, 10.0,
            2.0, 20.0,
            3.0, 30.0,
        ])
        .expect("valid dimensions");
        let mut scaler = StandardScaler::new();
        scaler.fit(&train).expect("fit succeeds");

        let row = [2.5, 15.0];
        let single = scaler.transform_row(&row).expect("transform_row succeeds");
        let batch = scaler
            .transform(&Matrix::from_vec(1, 2, row.to_vec()).expect("valid dimensions"))
            .expect("transform succeeds");

        assert_eq!(single.as_slice(), batch.as_slice());
    }

    #[test]
    fn test_serialized_scaler_reproduces_bit_identical_output() {
        let train = Matrix::from_vec(4, 3, vec![
            1.0, 50.0, 0.1,
            2.0, 60.0, 0.2,
            3.0, 70.0, 0.3,
            4.0, 80.0, 0.4,
        ])
        .expect("valid dimensions");
        let mut scaler = StandardScaler::new();
        scaler.fit(&train).expect("fit succeeds");

        let bytes = bincode::serialize(&scaler).expect("serialize succeeds");
        let restored: StandardScaler = bincode::deserialize(&bytes).expect("deserialize succeeds");

        let input = [2.5, 55.0, 0.15];
        let before = scaler.transform_row(&input).expect("transform succeeds");
        let after = restored.transform_row(&input).expect("transform succeeds");
        assert_eq!(before, after, "round-trip must be bit-identical");
    }
}
