//! Dataset providers producing labeled tabular data in the canonical schema.
//!
//! A provider's only obligation is to return a [`LabeledDataset`] whose
//! columns follow [`crate::schema::FEATURE_NAMES`] and whose labels are
//! binary. The synthetic generator stands in for real labels and is
//! swappable for a CSV-backed source without touching the rest of the
//! pipeline.

use crate::error::{CorazonError, Result};
use crate::primitives::Matrix;
use crate::schema::{FEATURE_NAMES, TARGET_NAME};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

/// A feature matrix with parallel binary labels.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    features: Matrix<f32>,
    labels: Vec<usize>,
    feature_names: Vec<String>,
}

impl LabeledDataset {
    /// Creates a labeled dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if row counts disagree, if the column count
    /// doesn't match the name list, or if any label is not 0/1.
    pub fn new(features: Matrix<f32>, labels: Vec<usize>, feature_names: Vec<String>) -> Result<Self> {
        let (n_rows, n_cols) = features.shape();
        if n_rows != labels.len() {
            return Err(CorazonError::InvalidInput {
                message: format!(
                    "feature rows ({n_rows}) and labels ({}) must have same length",
                    labels.len()
                ),
            });
        }
        if n_cols != feature_names.len() {
            return Err(CorazonError::SchemaMismatch {
                expected: feature_names.len(),
                actual: n_cols,
            });
        }
        if let Some(&bad) = labels.iter().find(|&&l| l > 1) {
            return Err(CorazonError::InvalidInput {
                message: format!("labels must be binary (0/1), found {bad}"),
            });
        }
        Ok(Self {
            features,
            labels,
            feature_names,
        })
    }

    /// Returns the feature matrix (n_samples x n_features).
    #[must_use]
    pub fn features(&self) -> &Matrix<f32> {
        &self.features
    }

    /// Returns the binary labels, parallel to the feature rows.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Returns the ordered feature names.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Returns the number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.features.n_rows()
    }

    /// Returns the number of features.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.features.n_cols()
    }

    /// Returns (negative, positive) label counts.
    #[must_use]
    pub fn class_counts(&self) -> (usize, usize) {
        let positives = self.labels.iter().filter(|&&l| l == 1).count();
        (self.labels.len() - positives, positives)
    }
}

/// Source of labeled training data.
///
/// Implementations must emit columns in canonical schema order.
pub trait DatasetProvider {
    /// Produces the labeled dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or violates the schema.
    fn load(&self) -> Result<LabeledDataset>;
}

/// Synthetic heart-disease dataset with physiologically plausible ranges.
///
/// Labels come from a weighted linear risk score thresholded at 100 —
/// a stand-in for clinical labels, kept only so the pipeline has
/// something deterministic to fit.
///
/// # Examples
///
/// ```
/// use corazon::dataset::{DatasetProvider, SyntheticHeartDataset};
///
/// let dataset = SyntheticHeartDataset::new(200, 42).load().expect("generation is infallible");
/// assert_eq!(dataset.n_features(), 13);
/// assert_eq!(dataset.n_samples(), 200);
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticHeartDataset {
    n_samples: usize,
    seed: u64,
}

impl SyntheticHeartDataset {
    /// Creates a generator for `n_samples` records with a fixed seed.
    #[must_use]
    pub fn new(n_samples: usize, seed: u64) -> Self {
        Self { n_samples, seed }
    }

    /// Weighted linear risk score used to derive synthetic labels.
    fn risk_score(row: &[f32]) -> f32 {
        let [age, sex, cp, trestbps, chol, fbs, _restecg, _thalach, exang, oldpeak, _slope, ca, thal] =
            row else {
            unreachable!("row width is fixed at 13");
        };

        age * 0.05
            + trestbps * 0.02
            + chol * 0.01
            + if *sex == 1.0 { 10.0 } else { 0.0 }
            + if *cp >= 2.0 { 15.0 } else { 0.0 }
            + if *fbs == 1.0 { 10.0 } else { 0.0 }
            + if *exang == 1.0 { 20.0 } else { 0.0 }
            + if *oldpeak > 1.5 { 25.0 } else { 0.0 }
            + ca * 10.0
            + if *thal == 3.0 { 15.0 } else { 0.0 }
    }
}

impl DatasetProvider for SyntheticHeartDataset {
    fn load(&self) -> Result<LabeledDataset> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let n = self.n_samples;

        let int_range = |lo: u32, hi: u32, rng: &mut StdRng, n: usize| -> Vec<f32> {
            let dist = Uniform::from(lo..hi);
            (0..n).map(|_| dist.sample(rng) as f32).collect()
        };

        let age = int_range(29, 78, &mut rng, n);
        let sex = int_range(0, 2, &mut rng, n);
        let cp = int_range(0, 4, &mut rng, n);
        let trestbps = int_range(94, 201, &mut rng, n);
        let chol = int_range(126, 565, &mut rng, n);
        let fbs = int_range(0, 2, &mut rng, n);
        let restecg = int_range(0, 3, &mut rng, n);
        let thalach = int_range(71, 203, &mut rng, n);
        let exang = int_range(0, 2, &mut rng, n);

        let oldpeak_dist = Uniform::from(0.0f32..6.2);
        let oldpeak: Vec<f32> = (0..n)
            .map(|_| (oldpeak_dist.sample(&mut rng) * 10.0).round() / 10.0)
            .collect();

        let slope = int_range(0, 3, &mut rng, n);
        let ca = int_range(0, 4, &mut rng, n);

        let thal_choices = [1.0f32, 2.0, 3.0];
        let thal: Vec<f32> = (0..n)
            .map(|_| {
                *thal_choices
                    .choose(&mut rng)
                    .expect("choices slice is non-empty")
            })
            .collect();

        let columns = [
            &age, &sex, &cp, &trestbps, &chol, &fbs, &restecg, &thalach, &exang, &oldpeak, &slope,
            &ca, &thal,
        ];

        let mut data = Vec::with_capacity(n * columns.len());
        let mut labels = Vec::with_capacity(n);
        for i in 0..n {
            let row: Vec<f32> = columns.iter().map(|col| col[i]).collect();
            labels.push(usize::from(Self::risk_score(&row) > 100.0));
            data.extend_from_slice(&row);
        }

        let features = Matrix::from_vec(n, columns.len(), data)
            .map_err(|e| CorazonError::Other(e.to_string()))?;
        let names = FEATURE_NAMES.iter().map(|&s| s.to_string()).collect();
        LabeledDataset::new(features, labels, names)
    }
}

/// CSV-backed dataset provider.
///
/// The header row must contain all 13 canonical feature columns plus a
/// `target` column; column order in the file is arbitrary and gets
/// reordered to the canonical schema. Parse failures abort loudly, per
/// the training-side error policy.
#[derive(Debug, Clone)]
pub struct CsvDataset {
    path: PathBuf,
}

impl CsvDataset {
    /// Creates a loader for the given CSV file.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DatasetProvider for CsvDataset {
    fn load(&self) -> Result<LabeledDataset> {
        let text = std::fs::read_to_string(&self.path)?;
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let header = lines.next().ok_or_else(|| CorazonError::InvalidInput {
            message: "CSV file is empty".to_string(),
        })?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();

        let column_index = |name: &str| -> Result<usize> {
            columns
                .iter()
                .position(|&c| c == name)
                .ok_or_else(|| CorazonError::MissingFeature {
                    name: name.to_string(),
                })
        };

        let feature_indices: Vec<usize> = FEATURE_NAMES
            .iter()
            .map(|&name| column_index(name))
            .collect::<Result<_>>()?;
        let target_index = column_index(TARGET_NAME)?;

        let mut data = Vec::new();
        let mut labels = Vec::new();
        for (line_no, line) in lines.enumerate() {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != columns.len() {
                return Err(CorazonError::InvalidInput {
                    message: format!(
                        "row {} has {} fields, header has {}",
                        line_no + 2,
                        fields.len(),
                        columns.len()
                    ),
                });
            }

            for &idx in &feature_indices {
                let value: f32 = fields[idx].parse().map_err(|_| CorazonError::InvalidInput {
                    message: format!("row {}: '{}' is not numeric", line_no + 2, fields[idx]),
                })?;
                data.push(value);
            }
            let label: usize = fields[target_index]
                .parse()
                .map_err(|_| CorazonError::InvalidInput {
                    message: format!(
                        "row {}: target '{}' is not an integer",
                        line_no + 2,
                        fields[target_index]
                    ),
                })?;
            labels.push(label);
        }

        let n_rows = labels.len();
        let features = Matrix::from_vec(n_rows, FEATURE_NAMES.len(), data)
            .map_err(|e| CorazonError::Other(e.to_string()))?;
        let names = FEATURE_NAMES.iter().map(|&s| s.to_string()).collect();
        LabeledDataset::new(features, labels, names)
    }
}
