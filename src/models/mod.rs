//! Trained model wrapper and training metadata.
//!
//! [`TrainedModel`] gives the four candidate classifier families one
//! uniform predict / predict_proba surface so the selector, the artifact
//! store, and the inference engine never care which family won.

use crate::classification::{KNearestNeighbors, LogisticRegression};
use crate::error::Result;
use crate::metrics::accuracy;
use crate::primitives::Matrix;
use crate::tree::{GradientBoostingClassifier, RandomForestClassifier};
use serde::{Deserialize, Serialize};

/// Display names of the candidate families, in fixed evaluation order.
pub const CANDIDATE_NAMES: [&str; 4] = [
    "Logistic Regression",
    "Random Forest",
    "KNN",
    "Gradient Boosting",
];

/// A fitted classifier from one of the four candidate families.
///
/// Opaque to callers: training produces it, the artifact store persists
/// it, inference calls `predict_proba` on it. The enum form keeps bincode
/// round-trips self-describing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrainedModel {
    /// Linear classifier candidate.
    Logistic(LogisticRegression),
    /// Ensemble-of-trees candidate.
    RandomForest(RandomForestClassifier),
    /// Instance-based candidate.
    Knn(KNearestNeighbors),
    /// Boosted-ensemble candidate.
    GradientBoosting(GradientBoostingClassifier),
}

impl TrainedModel {
    /// Returns the candidate family's display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TrainedModel::Logistic(_) => CANDIDATE_NAMES[0],
            TrainedModel::RandomForest(_) => CANDIDATE_NAMES[1],
            TrainedModel::Knn(_) => CANDIDATE_NAMES[2],
            TrainedModel::GradientBoosting(_) => CANDIDATE_NAMES[3],
        }
    }

    /// Predicts class labels (0/1) for scaled samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying model rejects the input.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        match self {
            TrainedModel::Logistic(model) => Ok(model.predict(x)),
            TrainedModel::RandomForest(model) => model.predict(x),
            TrainedModel::Knn(model) => model.predict(x),
            TrainedModel::GradientBoosting(model) => model.predict(x),
        }
    }

    /// Predicts [P(no disease), P(disease)] for scaled samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying model rejects the input.
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<Vec<f32>>> {
        match self {
            TrainedModel::Logistic(model) => {
                let positives = model.predict_proba(x);
                Ok(positives
                    .as_slice()
                    .iter()
                    .map(|&p| vec![1.0 - p, p])
                    .collect())
            }
            TrainedModel::RandomForest(model) => model.predict_proba(x),
            TrainedModel::Knn(model) => model.predict_proba(x),
            TrainedModel::GradientBoosting(model) => model.predict_proba(x),
        }
    }

    /// Computes accuracy against true labels.
    ///
    /// # Errors
    ///
    /// Returns an error if prediction fails.
    pub fn score(&self, x: &Matrix<f32>, y: &[usize]) -> Result<f32> {
        let predictions = self.predict(x)?;
        Ok(accuracy(&predictions, y))
    }
}

/// Descriptive training metadata persisted alongside the model.
///
/// Reporting only: inference logic never consumes these fields. Field
/// names match the metadata artifact's JSON keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Display name of the winning candidate family.
    pub best_model: String,
    /// Held-out accuracy of the winner.
    pub best_accuracy: f32,
    /// Training accuracy of the winner.
    pub train_accuracy: f32,
    /// Number of input features.
    pub n_features: usize,
    /// Training partition size.
    pub n_train_samples: usize,
    /// Held-out partition size.
    pub n_test_samples: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separable() -> (Matrix<f32>, Vec<usize>) {
        let x = Matrix::from_vec(6, 1, vec![0.0, 0.5, 1.0, 9.0, 9.5, 10.0])
            .expect("valid dimensions");
        (x, vec![0, 0, 0, 1, 1, 1])
    }

    #[test]
    fn test_wrapped_logistic_proba_pairs() {
        let (x, y) = separable();
        let mut inner = LogisticRegression::new()
            .with_learning_rate(0.5)
            .with_max_iter(2000);
        inner.fit(&x, &y).expect("fit succeeds");
        let model = TrainedModel::Logistic(inner);

        assert_eq!(model.name(), "Logistic Regression");
        let probas = model.predict_proba(&x).expect("predict_proba succeeds");
        for probs in &probas {
            assert_eq!(probs.len(), 2);
            assert!((probs[0] + probs[1] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_wrapped_knn_predicts() {
        let (x, y) = separable();
        let mut inner = KNearestNeighbors::new(3);
        inner.fit(&x, &y).expect("fit succeeds");
        let model = TrainedModel::Knn(inner);

        assert_eq!(model.name(), "KNN");
        let predictions = model.predict(&x).expect("predict succeeds");
        assert_eq!(predictions, y);
    }

    #[test]
    fn test_model_bincode_round_trip() {
        let (x, y) = separable();
        let mut inner = RandomForestClassifier::new(5).with_random_state(42);
        inner.fit(&x, &y).expect("fit succeeds");
        let model = TrainedModel::RandomForest(inner);

        let bytes = bincode::serialize(&model).expect("serialize succeeds");
        let restored: TrainedModel = bincode::deserialize(&bytes).expect("deserialize succeeds");

        assert_eq!(restored.name(), "Random Forest");
        assert_eq!(
            model.predict_proba(&x).expect("predict_proba succeeds"),
            restored.predict_proba(&x).expect("predict_proba succeeds")
        );
    }

    #[test]
    fn test_metadata_json_field_names() {
        let metadata = ModelMetadata {
            best_model: "KNN".to_string(),
            best_accuracy: 0.9,
            train_accuracy: 0.95,
            n_features: 13,
            n_train_samples: 800,
            n_test_samples: 200,
        };
        let json = serde_json::to_value(&metadata).expect("serialize succeeds");
        assert_eq!(json["best_model"], "KNN");
        assert_eq!(json["n_features"], 13);
        assert_eq!(json["n_train_samples"], 800);
    }
}
