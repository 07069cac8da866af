//! Corazon: heart-disease risk modeling in pure Rust.
//!
//! Corazon covers the full life of a tabular risk model: generating or
//! loading a labeled dataset, scaling features, training four candidate
//! classifier families, keeping the best one, persisting the artifact
//! bundle, and scoring single JSON records against it.
//!
//! # Quick Start
//!
//! ```
//! use corazon::prelude::*;
//!
//! // Generate a small labeled dataset and split it.
//! let dataset = SyntheticHeartDataset::new(120, 42).load().unwrap();
//! let (x_train, x_test, y_train, y_test) =
//!     stratified_train_test_split(dataset.features(), dataset.labels(), 0.2, 42).unwrap();
//!
//! // Scale, then compare the candidate families.
//! let mut scaler = StandardScaler::new();
//! let x_train = scaler.fit_transform(&x_train).unwrap();
//! let x_test = scaler.transform(&x_test).unwrap();
//! let report = ModelSelector::new()
//!     .select(&x_train, &y_train, &x_test, &y_test)
//!     .unwrap();
//! assert!(report.best_accuracy > 0.5);
//! ```
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`schema`]: Canonical feature order and JSON record assembly
//! - [`dataset`]: Synthetic and CSV dataset providers
//! - [`preprocessing`]: Standard scaling
//! - [`classification`]: Logistic regression and k-nearest neighbors
//! - [`tree`]: Decision tree, random forest, gradient boosting
//! - [`metrics`]: Evaluation metrics
//! - [`model_selection`]: Stratified splitting and the candidate comparison
//! - [`models`]: The trained-model wrapper and training metadata
//! - [`artifacts`]: Bundle persistence (bincode + JSON)
//! - [`inference`]: Single-record JSON scoring
//! - [`error`]: Error types

pub mod artifacts;
pub mod classification;
pub mod dataset;
pub mod error;
pub mod inference;
pub mod metrics;
pub mod model_selection;
pub mod models;
pub mod preprocessing;
pub mod prelude;
pub mod primitives;
pub mod schema;
pub mod tree;
