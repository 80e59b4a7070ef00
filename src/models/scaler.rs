//! Per-feature standardization fitted on training data

use crate::error::{DetectionError, Result};
use serde::{Deserialize, Serialize};

/// Floor applied to per-feature standard deviation so constant features do
/// not divide by zero.
pub const MIN_STD_DEV: f64 = 1e-8;

/// Fitted per-feature mean and standard deviation. Immutable after fitting;
/// travels inside the trained model bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationParameters {
    pub mean: Vec<f64>,
    pub std_dev: Vec<f64>,
}

impl NormalizationParameters {
    pub fn dimension(&self) -> usize {
        self.mean.len()
    }
}

/// Standard scaler: `(x - mean) / std` with stored parameters.
///
/// Fitting happens once, offline; inference always transforms with the
/// stored parameters and never refits.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    params: NormalizationParameters,
}

impl StandardScaler {
    /// Fit per-feature mean and standard deviation from a training matrix.
    pub fn fit(matrix: &[Vec<f64>]) -> Result<Self> {
        let rows = matrix.len();
        if rows == 0 {
            return Err(DetectionError::Training(
                "cannot fit scaler on an empty matrix".to_string(),
            ));
        }

        let dim = matrix[0].len();
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != dim {
                return Err(DetectionError::Training(format!(
                    "row {} has length {}, expected {}",
                    i,
                    row.len(),
                    dim
                )));
            }
        }

        let mut mean = vec![0.0; dim];
        for row in matrix {
            for (m, &x) in mean.iter_mut().zip(row.iter()) {
                *m += x;
            }
        }
        for m in &mut mean {
            *m /= rows as f64;
        }

        let mut variance = vec![0.0; dim];
        for row in matrix {
            for ((v, &m), &x) in variance.iter_mut().zip(mean.iter()).zip(row.iter()) {
                *v += (x - m) * (x - m);
            }
        }

        let std_dev: Vec<f64> = variance
            .iter()
            .map(|v| (v / rows as f64).sqrt().max(MIN_STD_DEV))
            .collect();

        Ok(Self {
            params: NormalizationParameters { mean, std_dev },
        })
    }

    /// Rebuild a scaler from stored parameters (artifact load path).
    pub fn from_params(params: NormalizationParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &NormalizationParameters {
        &self.params
    }

    /// Fitted dimensionality.
    pub fn dimension(&self) -> usize {
        self.params.dimension()
    }

    /// Transform one vector with the stored parameters.
    pub fn transform(&self, vector: &[f64]) -> Result<Vec<f64>> {
        if vector.len() != self.dimension() {
            return Err(DetectionError::ShapeMismatch {
                expected: self.dimension(),
                actual: vector.len(),
            });
        }

        Ok(vector
            .iter()
            .zip(self.params.mean.iter())
            .zip(self.params.std_dev.iter())
            .map(|((&x, &m), &s)| (x - m) / s)
            .collect())
    }

    /// Transform a full matrix row by row.
    pub fn transform_matrix(&self, matrix: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        matrix.iter().map(|row| self.transform(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_and_transform() {
        let matrix = vec![vec![1.0, 10.0], vec![3.0, 30.0], vec![5.0, 50.0]];
        let scaler = StandardScaler::fit(&matrix).unwrap();

        // mean = [3, 30]
        assert_eq!(scaler.params().mean, vec![3.0, 30.0]);

        // Normalizing the mean yields 0
        let at_mean = scaler.transform(&[3.0, 30.0]).unwrap();
        assert!(at_mean.iter().all(|&v| v.abs() < 1e-12));

        // Normalizing mean + std yields 1
        let std = scaler.params().std_dev.clone();
        let at_std = scaler.transform(&[3.0 + std[0], 30.0 + std[1]]).unwrap();
        assert!(at_std.iter().all(|&v| (v - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_zero_variance_feature_is_floored() {
        let matrix = vec![vec![7.0], vec![7.0], vec![7.0]];
        let scaler = StandardScaler::fit(&matrix).unwrap();

        assert_eq!(scaler.params().std_dev[0], MIN_STD_DEV);
        // Still finite
        let out = scaler.transform(&[7.0]).unwrap();
        assert!(out[0].is_finite());
    }

    #[test]
    fn test_shape_mismatch() {
        let matrix = vec![vec![1.0, 2.0, 3.0]];
        let scaler = StandardScaler::fit(&matrix).unwrap();

        let err = scaler.transform(&[1.0, 2.0]).unwrap_err();
        match err {
            DetectionError::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_matrix_fails() {
        let err = StandardScaler::fit(&[]).unwrap_err();
        assert!(matches!(err, DetectionError::Training(_)));
    }

    #[test]
    fn test_ragged_matrix_fails() {
        let matrix = vec![vec![1.0, 2.0], vec![1.0]];
        let err = StandardScaler::fit(&matrix).unwrap_err();
        assert!(matches!(err, DetectionError::Training(_)));
    }
}
