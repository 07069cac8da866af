//! Decision tree algorithms and ensemble methods.
//!
//! This module implements the tree-based candidate classifiers:
//! - CART decision trees using Gini impurity (binary labels)
//! - Random Forest ensemble classifier
//! - Gradient Boosting classifier for sequential ensemble learning
//!
//! All tree code is specialized to binary (0/1) labels, which keeps vote
//! counting and tie-breaking fully deterministic.

use crate::error::Result;
use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Internal node in a decision tree.
///
/// Contains a split condition (feature and threshold) and pointers to
/// left and right subtrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f32,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<TreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<TreeNode>,
}

/// Leaf node in a decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leaf {
    /// Predicted class label for this leaf
    pub class_label: usize,
    /// Number of training samples in this leaf
    pub n_samples: usize,
}

/// A node in a decision tree (either internal node or leaf).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Internal decision node with split condition
    Node(Node),
    /// Leaf node with class prediction
    Leaf(Leaf),
}

impl TreeNode {
    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf(_) => 0,
            TreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }
}

/// Decision tree classifier using the CART algorithm.
///
/// Uses Gini impurity for splitting criterion and builds trees recursively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    tree: Option<TreeNode>,
    max_depth: Option<usize>,
    /// Number of features the model was trained on (for validation)
    #[serde(default)]
    n_features: Option<usize>,
}

impl Default for DecisionTreeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTreeClassifier {
    /// Creates a new decision tree classifier with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: None,
            max_depth: None,
            n_features: None,
        }
    }

    /// Sets the maximum depth of the tree.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Fits the decision tree to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is invalid.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let (n_rows, n_cols) = x.shape();
        if n_rows != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if n_rows == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        self.n_features = Some(n_cols);
        self.tree = Some(build_tree(x, y, 0, self.max_depth));
        Ok(())
    }

    /// Predicts class labels for samples.
    ///
    /// # Panics
    ///
    /// Panics if called before fit() or if feature count doesn't match
    /// training data.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vec<usize> {
        let (n_samples, n_features) = x.shape();

        if let Some(expected) = self.n_features {
            assert!(
                n_features >= expected,
                "Feature count mismatch: model was trained with {expected} features but input has {n_features} features"
            );
        }

        let mut predictions = Vec::with_capacity(n_samples);
        for row in 0..n_samples {
            let mut sample = Vec::with_capacity(n_features);
            for col in 0..n_features {
                sample.push(x.get(row, col));
            }
            predictions.push(self.predict_one(&sample));
        }

        predictions
    }

    /// Predicts the class label for a single sample.
    fn predict_one(&self, x: &[f32]) -> usize {
        let tree = self.tree.as_ref().expect("Model not fitted yet");

        let mut node = tree;
        loop {
            match node {
                TreeNode::Leaf(leaf) => return leaf.class_label,
                TreeNode::Node(internal) => {
                    if x[internal.feature_idx] <= internal.threshold {
                        node = &internal.left;
                    } else {
                        node = &internal.right;
                    }
                }
            }
        }
    }

    /// Computes the accuracy score on test data.
    #[must_use]
    pub fn score(&self, x: &Matrix<f32>, y: &[usize]) -> f32 {
        let predictions = self.predict(x);
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(pred, true_label)| pred == true_label)
            .count();
        correct as f32 / y.len() as f32
    }
}

/// Calculate Gini impurity for binary labels.
///
/// Gini = 1 - p0² - p1², between 0.0 (pure) and 0.5 (maximum impurity).
fn gini_impurity(y: &[usize]) -> f32 {
    if y.is_empty() {
        return 0.0;
    }

    let n = y.len() as f32;
    let positives = y.iter().filter(|&&l| l == 1).count() as f32;
    let p1 = positives / n;
    let p0 = 1.0 - p1;

    1.0 - p0 * p0 - p1 * p1
}

/// Find the most frequent binary class. Ties resolve to class 0.
fn majority_class(y: &[usize]) -> usize {
    let positives = y.iter().filter(|&&l| l == 1).count();
    usize::from(positives * 2 > y.len())
}

/// Get sorted unique values from feature data, merging values closer
/// than 1e-10.
fn sorted_unique_values(x: &[f32]) -> Vec<f32> {
    let mut sorted_indices: Vec<usize> = (0..x.len()).collect();
    sorted_indices.sort_by(|&a, &b| {
        x[a].partial_cmp(&x[b])
            .expect("f32 values should be comparable")
    });

    let mut unique_values = Vec::new();
    let mut prev_val = x[sorted_indices[0]];
    unique_values.push(prev_val);

    for &idx in &sorted_indices[1..] {
        if (x[idx] - prev_val).abs() > 1e-10 {
            unique_values.push(x[idx]);
            prev_val = x[idx];
        }
    }

    unique_values
}

/// Find the best (threshold, gain) split for one feature column.
fn find_best_split_for_feature(x: &[f32], y: &[usize]) -> Option<(f32, f32)> {
    if x.len() < 2 {
        return None;
    }

    let unique_values = sorted_unique_values(x);
    if unique_values.len() < 2 {
        return None;
    }

    let current_impurity = gini_impurity(y);
    let mut best_gain = 0.0;
    let mut best_threshold = 0.0;

    // Try each midpoint as threshold
    for i in 0..unique_values.len() - 1 {
        let threshold = (unique_values[i] + unique_values[i + 1]) / 2.0;

        let mut left = Vec::new();
        let mut right = Vec::new();
        for (&value, &label) in x.iter().zip(y.iter()) {
            if value <= threshold {
                left.push(label);
            } else {
                right.push(label);
            }
        }
        if left.is_empty() || right.is_empty() {
            continue;
        }

        let n_left = left.len() as f32;
        let n_right = right.len() as f32;
        let n_total = n_left + n_right;
        let weighted = (n_left / n_total) * gini_impurity(&left)
            + (n_right / n_total) * gini_impurity(&right);
        let gain = current_impurity - weighted;

        if gain > best_gain {
            best_gain = gain;
            best_threshold = threshold;
        }
    }

    if best_gain > 0.0 {
        Some((best_threshold, best_gain))
    } else {
        None
    }
}

/// Find the best split across all features.
fn find_best_split(x_matrix: &Matrix<f32>, y: &[usize]) -> Option<(usize, f32, f32)> {
    let (n_samples, n_features) = x_matrix.shape();

    if n_samples < 2 {
        return None;
    }

    let mut best_gain = 0.0;
    let mut best_feature = 0;
    let mut best_threshold = 0.0;

    for feature_idx in 0..n_features {
        let mut feature_values = Vec::with_capacity(n_samples);
        for row in 0..n_samples {
            feature_values.push(x_matrix.get(row, feature_idx));
        }

        if let Some((threshold, gain)) = find_best_split_for_feature(&feature_values, y) {
            if gain > best_gain {
                best_gain = gain;
                best_feature = feature_idx;
                best_threshold = threshold;
            }
        }
    }

    if best_gain > 0.0 {
        Some((best_feature, best_threshold, best_gain))
    } else {
        None
    }
}

/// Split data into subsets based on indices.
fn split_data_by_indices(x: &Matrix<f32>, y: &[usize], indices: &[usize]) -> (Matrix<f32>, Vec<usize>) {
    let n_cols = x.shape().1;
    let mut data = Vec::with_capacity(indices.len() * n_cols);
    let mut labels = Vec::with_capacity(indices.len());

    for &idx in indices {
        for col in 0..n_cols {
            data.push(x.get(idx, col));
        }
        labels.push(y[idx]);
    }

    let matrix = Matrix::from_vec(indices.len(), n_cols, data)
        .expect("matrix creation should succeed with valid indices");
    (matrix, labels)
}

/// Check if tree building should stop at this node.
///
/// Returns a leaf node if stopping criteria are met, None otherwise.
fn check_stopping_criteria(y: &[usize], depth: usize, max_depth: Option<usize>) -> Option<TreeNode> {
    let n_samples = y.len();

    // Pure node
    if y.iter().all(|&l| l == y[0]) {
        return Some(TreeNode::Leaf(Leaf {
            class_label: y[0],
            n_samples,
        }));
    }

    // Max depth reached
    if let Some(max_d) = max_depth {
        if depth >= max_d {
            return Some(TreeNode::Leaf(Leaf {
                class_label: majority_class(y),
                n_samples,
            }));
        }
    }

    None
}

/// Build a decision tree recursively.
fn build_tree(x: &Matrix<f32>, y: &[usize], depth: usize, max_depth: Option<usize>) -> TreeNode {
    let n_samples = y.len();

    if let Some(leaf) = check_stopping_criteria(y, depth, max_depth) {
        return leaf;
    }

    let Some((feature_idx, threshold, _gain)) = find_best_split(x, y) else {
        return TreeNode::Leaf(Leaf {
            class_label: majority_class(y),
            n_samples,
        });
    };

    let mut left_indices = Vec::new();
    let mut right_indices = Vec::new();
    for row in 0..n_samples {
        if x.get(row, feature_idx) <= threshold {
            left_indices.push(row);
        } else {
            right_indices.push(row);
        }
    }
    if left_indices.is_empty() || right_indices.is_empty() {
        return TreeNode::Leaf(Leaf {
            class_label: majority_class(y),
            n_samples,
        });
    }

    let (left_matrix, left_labels) = split_data_by_indices(x, y, &left_indices);
    let (right_matrix, right_labels) = split_data_by_indices(x, y, &right_indices);

    let left_child = build_tree(&left_matrix, &left_labels, depth + 1, max_depth);
    let right_child = build_tree(&right_matrix, &right_labels, depth + 1, max_depth);

    TreeNode::Node(Node {
        feature_idx,
        threshold,
        left: Box::new(left_child),
        right: Box::new(right_child),
    })
}

/// Creates a bootstrap sample (random sample with replacement).
///
/// Returns indices of samples to include in the bootstrap sample.
fn bootstrap_sample(n_samples: usize, random_state: Option<u64>) -> Vec<usize> {
    use rand::distributions::{Distribution, Uniform};
    use rand::SeedableRng;

    let dist = Uniform::from(0..n_samples);
    let mut indices = Vec::with_capacity(n_samples);

    if let Some(seed) = random_state {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        for _ in 0..n_samples {
            indices.push(dist.sample(&mut rng));
        }
    } else {
        let mut rng = rand::thread_rng();
        for _ in 0..n_samples {
            indices.push(dist.sample(&mut rng));
        }
    }

    indices
}

/// Random Forest classifier: an ensemble of decision trees.
///
/// Combines multiple decision trees trained on bootstrap samples
/// to reduce overfitting and improve accuracy. Probabilities are the
/// vote fractions across trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTreeClassifier>,
    n_estimators: usize,
    max_depth: Option<usize>,
    random_state: Option<u64>,
}

impl RandomForestClassifier {
    /// Creates a new Random Forest classifier with `n_estimators` trees.
    #[must_use]
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            random_state: None,
        }
    }

    /// Sets the maximum depth for each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Sets the random state for reproducibility.
    #[must_use]
    pub fn with_random_state(mut self, random_state: u64) -> Self {
        self.random_state = Some(random_state);
        self
    }

    /// Fits the random forest to training data.
    ///
    /// Each tree sees its own bootstrap sample; tree i is seeded with
    /// `random_state + i` so a fixed seed reproduces the whole forest.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples != y.len() {
            return Err("Number of samples in X and y must match".into());
        }
        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        self.trees = Vec::with_capacity(self.n_estimators);

        for i in 0..self.n_estimators {
            let seed = self.random_state.map(|s| s + i as u64);
            let bootstrap_indices = bootstrap_sample(n_samples, seed);

            let mut bootstrap_x_data = Vec::with_capacity(n_samples * n_features);
            let mut bootstrap_y = Vec::with_capacity(n_samples);
            for &idx in &bootstrap_indices {
                for j in 0..n_features {
                    bootstrap_x_data.push(x.get(idx, j));
                }
                bootstrap_y.push(y[idx]);
            }

            let bootstrap_x = Matrix::from_vec(n_samples, n_features, bootstrap_x_data)
                .map_err(|_| "Failed to create bootstrap matrix")?;

            let mut tree = if let Some(max_depth) = self.max_depth {
                DecisionTreeClassifier::new().with_max_depth(max_depth)
            } else {
                DecisionTreeClassifier::new()
            };

            tree.fit(&bootstrap_x, &bootstrap_y)?;
            self.trees.push(tree);
        }

        Ok(())
    }

    /// Makes predictions by majority vote across trees.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest is not fitted.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let probas = self.predict_proba(x)?;
        Ok(probas
            .iter()
            .map(|probs| usize::from(probs[1] > probs[0]))
            .collect())
    }

    /// Predicts [P(class 0), P(class 1)] as vote fractions across trees.
    ///
    /// # Errors
    ///
    /// Returns an error if the forest is not fitted.
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<Vec<f32>>> {
        if self.trees.is_empty() {
            return Err("Model not trained yet".into());
        }

        let n_samples = x.shape().0;
        let n_trees = self.trees.len() as f32;

        // Collect per-tree predictions once, then tally votes per sample.
        let tree_predictions: Vec<Vec<usize>> =
            self.trees.iter().map(|tree| tree.predict(x)).collect();

        let mut probabilities = Vec::with_capacity(n_samples);
        for sample_idx in 0..n_samples {
            let positive_votes = tree_predictions
                .iter()
                .filter(|preds| preds[sample_idx] == 1)
                .count() as f32;
            let p1 = positive_votes / n_trees;
            probabilities.push(vec![1.0 - p1, p1]);
        }

        Ok(probabilities)
    }

    /// Calculates accuracy score on test data.
    ///
    /// # Errors
    ///
    /// Returns an error if prediction fails.
    pub fn score(&self, x: &Matrix<f32>, y: &[usize]) -> Result<f32> {
        let predictions = self.predict(x)?;
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(pred, true_label)| pred == true_label)
            .count();
        Ok(correct as f32 / y.len() as f32)
    }
}

/// Gradient Boosting classifier.
///
/// Implements gradient boosting with shallow decision trees as weak
/// learners, using gradient descent in function space:
///
/// 1. Initialize with constant prediction (log-odds)
/// 2. Each iteration fits a tree to the sign of the pseudo-residuals and
///    nudges the raw scores by `learning_rate`
/// 3. Final probability = sigmoid(sum of all contributions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostingClassifier {
    /// Number of boosting iterations (trees)
    n_estimators: usize,
    /// Learning rate (shrinkage parameter)
    learning_rate: f32,
    /// Maximum depth of each tree
    max_depth: usize,
    /// Initial prediction (log-odds for class 1)
    init_prediction: f32,
    /// Ensemble of decision trees
    estimators: Vec<DecisionTreeClassifier>,
}

impl Default for GradientBoostingClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GradientBoostingClassifier {
    /// Creates a new Gradient Boosting classifier with default parameters
    /// (100 estimators, learning rate 0.1, max depth 3).
    #[must_use]
    pub fn new() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            init_prediction: 0.0,
            estimators: Vec::new(),
        }
    }

    /// Sets the number of boosting iterations (trees).
    #[must_use]
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    /// Sets the learning rate (shrinkage parameter).
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the maximum depth of each tree.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sigmoid function: σ(x) = 1 / (1 + e^(-x))
    fn sigmoid(x: f32) -> f32 {
        1.0 / (1.0 + (-x).exp())
    }

    /// Trains the Gradient Boosting classifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is invalid.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &[usize]) -> Result<()> {
        if x.n_rows() != y.len() {
            return Err("x and y must have the same number of samples".into());
        }
        if x.n_rows() == 0 {
            return Err("Cannot fit with 0 samples".into());
        }

        let n_samples = x.n_rows();
        let y_float: Vec<f32> = y.iter().map(|&label| label as f32).collect();

        // Initialize prediction with log-odds
        let positive_count = y.iter().filter(|&&label| label == 1).count();
        let p = positive_count as f32 / n_samples as f32;
        self.init_prediction = if p > 0.0 && p < 1.0 {
            (p / (1.0 - p)).ln()
        } else if p >= 1.0 {
            5.0
        } else {
            -5.0
        };

        let mut raw_predictions = vec![self.init_prediction; n_samples];
        self.estimators.clear();

        for _iteration in 0..self.n_estimators {
            // Pseudo-residuals for log-loss: y - sigmoid(raw)
            let residual_labels: Vec<usize> = raw_predictions
                .iter()
                .zip(y_float.iter())
                .map(|(&raw, &label)| usize::from(label - Self::sigmoid(raw) >= 0.0))
                .collect();

            let mut tree = DecisionTreeClassifier::new().with_max_depth(self.max_depth);
            tree.fit(x, &residual_labels)?;

            let tree_preds = tree.predict(x);
            for (raw, &pred) in raw_predictions.iter_mut().zip(tree_preds.iter()) {
                *raw += self.learning_rate * if pred == 0 { -1.0 } else { 1.0 };
            }

            self.estimators.push(tree);
        }

        Ok(())
    }

    /// Predicts class labels for the given samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not trained.
    pub fn predict(&self, x: &Matrix<f32>) -> Result<Vec<usize>> {
        let probas = self.predict_proba(x)?;
        Ok(probas
            .iter()
            .map(|probs| usize::from(probs[1] >= 0.5))
            .collect())
    }

    /// Predicts [P(class 0), P(class 1)] for the given samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not trained.
    pub fn predict_proba(&self, x: &Matrix<f32>) -> Result<Vec<Vec<f32>>> {
        if self.estimators.is_empty() {
            return Err("Model not trained yet".into());
        }

        let n_samples = x.n_rows();
        let mut raw_predictions = vec![self.init_prediction; n_samples];

        for tree in &self.estimators {
            let tree_preds = tree.predict(x);
            for (raw, &pred) in raw_predictions.iter_mut().zip(tree_preds.iter()) {
                *raw += self.learning_rate * if pred == 0 { -1.0 } else { 1.0 };
            }
        }

        Ok(raw_predictions
            .iter()
            .map(|&raw| {
                let prob_class1 = Self::sigmoid(raw);
                vec![1.0 - prob_class1, prob_class1]
            })
            .collect())
    }

    /// Calculates accuracy score on test data.
    ///
    /// # Errors
    ///
    /// Returns an error if prediction fails.
    pub fn score(&self, x: &Matrix<f32>, y: &[usize]) -> Result<f32> {
        let predictions = self.predict(x)?;
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(pred, true_label)| pred == true_label)
            .count();
        Ok(correct as f32 / y.len() as f32)
    }

    /// Returns the number of fitted estimators (trees) in the ensemble.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.estimators.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor_free_data() -> (Matrix<f32>, Vec<usize>) {
        // Axis-aligned separable: x0 <= 2.5 is class 0.
        let x = Matrix::from_vec(8, 2, vec![
            0.0, 0.0,
            1.0, 2.0,
            2.0, 1.0,
            1.5, 1.5,
            4.0, 0.0,
            5.0, 2.0,
            4.5, 1.0,
            5.5, 1.5,
        ])
        .expect("valid dimensions");
        let y = vec![0, 0, 0, 0, 1, 1, 1, 1];
        (x, y)
    }

    #[test]
    fn test_gini_impurity_pure_and_mixed() {
        assert_eq!(gini_impurity(&[0, 0, 0]), 0.0);
        assert_eq!(gini_impurity(&[1, 1]), 0.0);
        assert!((gini_impurity(&[0, 1]) - 0.5).abs() < 1e-6);
        assert_eq!(gini_impurity(&[]), 0.0);
    }

    #[test]
    fn test_majority_class_binary() {
        assert_eq!(majority_class(&[0, 0, 1]), 0);
        assert_eq!(majority_class(&[1, 1, 0]), 1);
        // Ties resolve to class 0.
        assert_eq!(majority_class(&[0, 1]), 0);
    }

    #[test]
    fn test_decision_tree_fits_separable_data() {
        let (x, y) = xor_free_data();
        let mut tree = DecisionTreeClassifier::new().with_max_depth(3);
        tree.fit(&x, &y).expect("fit succeeds");

        assert!((tree.score(&x, &y) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_decision_tree_respects_max_depth() {
        let (x, y) = xor_free_data();
        let mut tree = DecisionTreeClassifier::new().with_max_depth(1);
        tree.fit(&x, &y).expect("fit succeeds");

        assert!(tree.tree.as_ref().expect("tree built").depth() <= 1);
    }

    #[test]
    fn test_decision_tree_rejects_empty_data() {
        let x = Matrix::from_vec(0, 2, vec![]).expect("empty matrix is valid");
        let mut tree = DecisionTreeClassifier::new();
        assert!(tree.fit(&x, &[]).is_err());
    }

    #[test]
    fn test_random_forest_fits_and_votes() {
        let (x, y) = xor_free_data();
        let mut forest = RandomForestClassifier::new(10)
            .with_max_depth(3)
            .with_random_state(42);
        forest.fit(&x, &y).expect("fit succeeds");

        let predictions = forest.predict(&x).expect("predict succeeds");
        assert_eq!(predictions, y);
    }

    #[test]
    fn test_random_forest_proba_is_vote_fraction() {
        let (x, y) = xor_free_data();
        let mut forest = RandomForestClassifier::new(10)
            .with_max_depth(3)
            .with_random_state(42);
        forest.fit(&x, &y).expect("fit succeeds");

        let probas = forest.predict_proba(&x).expect("predict_proba succeeds");
        for probs in &probas {
            assert!((probs[0] + probs[1] - 1.0).abs() < 1e-6);
            let tenths = probs[1] * 10.0;
            assert!(
                (tenths - tenths.round()).abs() < 1e-4,
                "votes over 10 trees quantize to tenths"
            );
        }
    }

    #[test]
    fn test_random_forest_deterministic_with_seed() {
        let (x, y) = xor_free_data();
        let mut a = RandomForestClassifier::new(5).with_random_state(7);
        let mut b = RandomForestClassifier::new(5).with_random_state(7);
        a.fit(&x, &y).expect("fit succeeds");
        b.fit(&x, &y).expect("fit succeeds");

        assert_eq!(
            a.predict_proba(&x).expect("predict_proba succeeds"),
            b.predict_proba(&x).expect("predict_proba succeeds")
        );
    }

    #[test]
    fn test_random_forest_unfitted_predict_fails() {
        let forest = RandomForestClassifier::new(5);
        let x = Matrix::from_vec(1, 2, vec![0.0, 0.0]).expect("valid dimensions");
        assert!(forest.predict(&x).is_err());
    }

    #[test]
    fn test_gradient_boosting_fits_separable_data() {
        let (x, y) = xor_free_data();
        let mut gbm = GradientBoostingClassifier::new()
            .with_n_estimators(30)
            .with_learning_rate(0.3)
            .with_max_depth(2);
        gbm.fit(&x, &y).expect("fit succeeds");

        let score = gbm.score(&x, &y).expect("score succeeds");
        assert!(score >= 0.75, "boosting should fit separable data, got {score}");
    }

    #[test]
    fn test_gradient_boosting_proba_bounds() {
        let (x, y) = xor_free_data();
        let mut gbm = GradientBoostingClassifier::new().with_n_estimators(10);
        gbm.fit(&x, &y).expect("fit succeeds");

        for probs in gbm.predict_proba(&x).expect("predict_proba succeeds") {
            assert!((0.0..=1.0).contains(&probs[1]));
            assert!((probs[0] + probs[1] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gradient_boosting_unfitted_fails() {
        let gbm = GradientBoostingClassifier::new();
        let x = Matrix::from_vec(1, 2, vec![0.0, 0.0]).expect("valid dimensions");
        assert!(gbm.predict(&x).is_err());
    }

    #[test]
    fn test_tree_serde_round_trip_preserves_predictions() {
        let (x, y) = xor_free_data();
        let mut tree = DecisionTreeClassifier::new().with_max_depth(3);
        tree.fit(&x, &y).expect("fit succeeds");

        let bytes = bincode::serialize(&tree).expect("serialize succeeds");
        let restored: DecisionTreeClassifier =
            bincode::deserialize(&bytes).expect("deserialize succeeds");

        assert_eq!(tree.predict(&x), restored.predict(&x));
    }
}
