//! Binary classifier capability and the logistic regression implementation

use crate::error::{DetectionError, Result};
use serde::{Deserialize, Serialize};

/// Capability required of any classifier plugged into the pipeline:
/// batch fit, hard label, and positive-class probability. Anything
/// implementing these three is substitutable without touching the rest of
/// the pipeline.
pub trait BinaryClassifier: Send + Sync {
    /// Train on a normalized feature matrix with binary labels
    /// (0 = real, 1 = fake).
    fn fit(&mut self, features: &[Vec<f64>], labels: &[u8]) -> Result<()>;

    /// Probability of the positive (fake) class for one normalized vector.
    fn predict_proba(&self, features: &[f64]) -> Result<f64>;

    /// Hard 0/1 label. Default: probability thresholded at 0.5.
    fn predict(&self, features: &[f64]) -> Result<u8> {
        Ok(if self.predict_proba(features)? >= 0.5 {
            1
        } else {
            0
        })
    }
}

/// L2-regularized logistic regression trained by batch gradient descent.
///
/// Small enough to train in-process on the synthetic corpus and fully
/// serializable, so the fitted weights travel inside the model bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub weights: Vec<f64>,
    pub bias: f64,
    learning_rate: f64,
    epochs: usize,
    l2: f64,
}

impl LogisticRegression {
    pub fn new(learning_rate: f64, epochs: usize, l2: f64) -> Self {
        Self {
            weights: Vec::new(),
            bias: 0.0,
            learning_rate,
            epochs,
            l2,
        }
    }

    /// Fitted dimensionality (0 before fitting).
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }

    fn logit(&self, features: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(0.1, 300, 1e-4)
    }
}

impl BinaryClassifier for LogisticRegression {
    fn fit(&mut self, features: &[Vec<f64>], labels: &[u8]) -> Result<()> {
        if features.is_empty() {
            return Err(DetectionError::Training(
                "cannot fit classifier on an empty matrix".to_string(),
            ));
        }
        if features.len() != labels.len() {
            return Err(DetectionError::Training(format!(
                "{} feature rows but {} labels",
                features.len(),
                labels.len()
            )));
        }

        let dim = features[0].len();
        for (i, row) in features.iter().enumerate() {
            if row.len() != dim {
                return Err(DetectionError::ShapeMismatch {
                    expected: dim,
                    actual: features[i].len(),
                });
            }
        }

        let n = features.len() as f64;
        self.weights = vec![0.0; dim];
        self.bias = 0.0;

        let mut grad = vec![0.0; dim];
        for _ in 0..self.epochs {
            grad.iter_mut().for_each(|g| *g = 0.0);
            let mut bias_grad = 0.0;

            for (row, &label) in features.iter().zip(labels.iter()) {
                let error = sigmoid(self.logit(row)) - label as f64;
                for (g, &x) in grad.iter_mut().zip(row.iter()) {
                    *g += error * x;
                }
                bias_grad += error;
            }

            for (w, g) in self.weights.iter_mut().zip(grad.iter()) {
                *w -= self.learning_rate * (g / n + self.l2 * *w);
            }
            self.bias -= self.learning_rate * bias_grad / n;
        }

        Ok(())
    }

    fn predict_proba(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.weights.len() {
            return Err(DetectionError::ShapeMismatch {
                expected: self.weights.len(),
                actual: features.len(),
            });
        }
        Ok(sigmoid(self.logit(features)))
    }
}

fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sigmoid_range_and_symmetry() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
        // Large magnitudes stay finite
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(800.0) <= 1.0);
    }

    #[test]
    fn test_fit_separable_data() {
        // Positive class sits at x=1, negative at x=-1
        let features: Vec<Vec<f64>> = (0..100)
            .map(|i| if i % 2 == 0 { vec![1.0] } else { vec![-1.0] })
            .collect();
        let labels: Vec<u8> = (0..100).map(|i| if i % 2 == 0 { 1 } else { 0 }).collect();

        let mut model = LogisticRegression::default();
        model.fit(&features, &labels).unwrap();

        assert!(model.predict_proba(&[1.0]).unwrap() > 0.8);
        assert!(model.predict_proba(&[-1.0]).unwrap() < 0.2);
        assert_eq!(model.predict(&[1.0]).unwrap(), 1);
        assert_eq!(model.predict(&[-1.0]).unwrap(), 0);
    }

    #[test]
    fn test_fit_rejects_bad_shapes() {
        let mut model = LogisticRegression::default();

        let err = model.fit(&[], &[]).unwrap_err();
        assert!(matches!(err, DetectionError::Training(_)));

        let err = model.fit(&[vec![1.0]], &[1, 0]).unwrap_err();
        assert!(matches!(err, DetectionError::Training(_)));

        let err = model
            .fit(&[vec![1.0, 2.0], vec![1.0]], &[1, 0])
            .unwrap_err();
        assert!(matches!(err, DetectionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_predict_proba_shape_mismatch() {
        let mut model = LogisticRegression::default();
        model.fit(&[vec![1.0], vec![-1.0]], &[1, 0]).unwrap();

        let err = model.predict_proba(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, DetectionError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_serialization_preserves_weights() {
        let mut model = LogisticRegression::default();
        model.fit(&[vec![1.0], vec![-1.0]], &[1, 0]).unwrap();

        let json = serde_json::to_string(&model).unwrap();
        let restored: LogisticRegression = serde_json::from_str(&json).unwrap();

        assert_eq!(model.weights, restored.weights);
        assert_eq!(model.bias, restored.bias);
    }
}
