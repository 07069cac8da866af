//! Train/test splitting and the multi-model comparison loop.
//!
//! The trainer performs a single stratified 80/20 holdout split with a
//! fixed seed, fits the four candidate families in a fixed order, and
//! keeps the one with the highest held-out accuracy. Ties keep the
//! earlier-evaluated candidate.

use crate::classification::{KNearestNeighbors, LogisticRegression};
use crate::error::{CorazonError, Result};
use crate::models::TrainedModel;
use crate::primitives::Matrix;
use crate::tree::{GradientBoostingClassifier, RandomForestClassifier};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Splits data into stratified train/test partitions.
///
/// Each class contributes `test_size` of its samples to the test
/// partition, so the class balance survives the split. Class index
/// groups are built positionally (binary labels), keeping the split
/// fully deterministic for a fixed seed.
///
/// # Arguments
///
/// * `x` - Feature matrix (`n_samples` × `n_features`)
/// * `y` - Binary labels (`n_samples`)
/// * `test_size` - Proportion of each class for the test split (0.0 to 1.0)
/// * `random_state` - Seed for reproducible shuffling
///
/// # Returns
///
/// Tuple of (x_train, x_test, y_train, y_test).
///
/// # Errors
///
/// Returns an error if inputs disagree in length, `test_size` is out of
/// range, or either partition would be empty.
#[allow(clippy::type_complexity)]
pub fn stratified_train_test_split(
    x: &Matrix<f32>,
    y: &[usize],
    test_size: f32,
    random_state: u64,
) -> Result<(Matrix<f32>, Matrix<f32>, Vec<usize>, Vec<usize>)> {
    if !(0.0..1.0).contains(&test_size) || test_size == 0.0 {
        return Err(CorazonError::InvalidInput {
            message: format!("test_size must be between 0 and 1, got {test_size}"),
        });
    }

    let (n_samples, _) = x.shape();
    if n_samples != y.len() {
        return Err(CorazonError::InvalidInput {
            message: format!(
                "X and y must have same number of samples, got {} and {}",
                n_samples,
                y.len()
            ),
        });
    }

    // Group indices by class; positional grouping keeps this deterministic.
    let mut class_indices: [Vec<usize>; 2] = [Vec::new(), Vec::new()];
    for (i, &label) in y.iter().enumerate() {
        if label > 1 {
            return Err(CorazonError::InvalidInput {
                message: format!("labels must be binary (0/1), found {label}"),
            });
        }
        class_indices[label].push(i);
    }

    let mut rng = StdRng::seed_from_u64(random_state);
    let mut train_indices = Vec::new();
    let mut test_indices = Vec::new();

    for indices in &mut class_indices {
        indices.shuffle(&mut rng);
        let n_test = (indices.len() as f32 * test_size).round() as usize;
        test_indices.extend_from_slice(&indices[..n_test]);
        train_indices.extend_from_slice(&indices[n_test..]);
    }

    if train_indices.is_empty() || test_indices.is_empty() {
        return Err(CorazonError::InvalidInput {
            message: format!(
                "split would result in empty train or test set (n_train={}, n_test={})",
                train_indices.len(),
                test_indices.len()
            ),
        });
    }

    let (x_train, y_train) = extract_samples(x, y, &train_indices);
    let (x_test, y_test) = extract_samples(x, y, &test_indices);

    Ok((x_train, x_test, y_train, y_test))
}

/// Extracts the rows of `x`/`y` at the given indices.
fn extract_samples(x: &Matrix<f32>, y: &[usize], indices: &[usize]) -> (Matrix<f32>, Vec<usize>) {
    let n_features = x.shape().1;
    let mut x_data = Vec::with_capacity(indices.len() * n_features);
    let mut y_data = Vec::with_capacity(indices.len());

    for &idx in indices {
        for j in 0..n_features {
            x_data.push(x.get(idx, j));
        }
        y_data.push(y[idx]);
    }

    let x_subset =
        Matrix::from_vec(indices.len(), n_features, x_data).expect("Failed to create matrix");
    (x_subset, y_data)
}

/// Train/test accuracies of one candidate family.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    /// Candidate family display name.
    pub name: String,
    /// Accuracy on the training partition.
    pub train_accuracy: f32,
    /// Accuracy on the held-out partition.
    pub test_accuracy: f32,
}

/// Outcome of the multi-model comparison.
#[derive(Debug)]
pub struct SelectionReport {
    /// The winning fitted model.
    pub best: TrainedModel,
    /// Winner's held-out accuracy.
    pub best_accuracy: f32,
    /// Winner's training accuracy.
    pub best_train_accuracy: f32,
    /// All candidates' scores, in evaluation order (reporting only).
    pub candidates: Vec<CandidateScore>,
}

/// Fits the four candidate families and picks the best by held-out
/// accuracy.
///
/// Candidates run in a fixed order: linear, ensemble-of-trees,
/// instance-based, boosted-ensemble. A candidate replaces the current
/// best only with strictly greater test accuracy, so ties keep the
/// earlier one.
#[derive(Debug, Clone)]
pub struct ModelSelector {
    random_state: u64,
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSelector {
    /// Creates a selector with the default seed (42).
    #[must_use]
    pub fn new() -> Self {
        Self { random_state: 42 }
    }

    /// Sets the random state used by stochastic candidates.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = random_state;
        self
    }

    /// Fits all candidates on the scaled training partition and scores
    /// them on the held-out partition.
    ///
    /// # Errors
    ///
    /// Returns an error if any candidate fails to fit or score. Training
    /// is offline and human-supervised, so failures abort loudly.
    pub fn select(
        &self,
        x_train: &Matrix<f32>,
        y_train: &[usize],
        x_test: &Matrix<f32>,
        y_test: &[usize],
    ) -> Result<SelectionReport> {
        let fitted = self.fit_candidates(x_train, y_train)?;

        let mut candidates = Vec::with_capacity(fitted.len());
        let mut best: Option<(TrainedModel, f32, f32)> = None;

        for model in fitted {
            let train_accuracy = model.score(x_train, y_train)?;
            let test_accuracy = model.score(x_test, y_test)?;

            candidates.push(CandidateScore {
                name: model.name().to_string(),
                train_accuracy,
                test_accuracy,
            });

            let replaces = match &best {
                None => true,
                Some((_, _, best_score)) => test_accuracy > *best_score,
            };
            if replaces {
                best = Some((model, train_accuracy, test_accuracy));
            }
        }

        let (best, best_train_accuracy, best_accuracy) =
            best.ok_or_else(|| CorazonError::from("no candidates were evaluated"))?;

        Ok(SelectionReport {
            best,
            best_accuracy,
            best_train_accuracy,
            candidates,
        })
    }

    /// Fits the four candidates in the fixed evaluation order.
    fn fit_candidates(&self, x_train: &Matrix<f32>, y_train: &[usize]) -> Result<Vec<TrainedModel>> {
        let mut logistic = LogisticRegression::new().with_max_iter(1000);
        logistic.fit(x_train, y_train)?;

        let mut forest = RandomForestClassifier::new(100)
            .with_max_depth(10)
            .with_random_state(self.random_state);
        forest.fit(x_train, y_train)?;

        let mut knn = KNearestNeighbors::new(7);
        knn.fit(x_train, y_train)?;

        let mut boosting = GradientBoostingClassifier::new().with_n_estimators(100);
        boosting.fit(x_train, y_train)?;

        Ok(vec![
            TrainedModel::Logistic(logistic),
            TrainedModel::RandomForest(forest),
            TrainedModel::Knn(knn),
            TrainedModel::GradientBoosting(boosting),
        ])
    }
}
