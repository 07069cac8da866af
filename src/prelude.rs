//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use corazon::prelude::*;
//! ```

pub use crate::artifacts::{ArtifactBundle, ArtifactStore};
pub use crate::classification::{KNearestNeighbors, LogisticRegression};
pub use crate::dataset::{CsvDataset, DatasetProvider, LabeledDataset, SyntheticHeartDataset};
pub use crate::error::{CorazonError, Result};
pub use crate::inference::{Confidence, InferenceEngine, PredictionResult, RiskLevel};
pub use crate::metrics::accuracy;
pub use crate::model_selection::{stratified_train_test_split, ModelSelector, SelectionReport};
pub use crate::models::{ModelMetadata, TrainedModel};
pub use crate::preprocessing::StandardScaler;
pub use crate::primitives::{Matrix, Vector};
pub use crate::schema::{FeatureSchema, FEATURE_NAMES};
pub use crate::tree::{DecisionTreeClassifier, GradientBoostingClassifier, RandomForestClassifier};
