//! Canonical feature schema shared between training and inference.
//!
//! The 13 clinical features are always handled in one fixed order. Training
//! bakes this order into the fitted scaler and persists it alongside the
//! model; inference replays the persisted order when assembling input
//! vectors. The order is never inferred from map iteration.

use crate::error::{CorazonError, Result};
use serde_json::{Map, Value};

/// The 13 clinical features, in canonical column order.
pub const FEATURE_NAMES: [&str; 13] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Name of the binary target column in labeled datasets.
pub const TARGET_NAME: &str = "target";

/// An ordered list of feature names defining vector column order.
///
/// # Examples
///
/// ```
/// use corazon::schema::FeatureSchema;
///
/// let schema = FeatureSchema::canonical();
/// assert_eq!(schema.len(), 13);
/// assert_eq!(schema.names()[0], "age");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    /// Returns the canonical 13-feature schema.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            names: FEATURE_NAMES.iter().map(|&s| s.to_string()).collect(),
        }
    }

    /// Builds a schema from a persisted feature-name list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty.
    pub fn from_names(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(CorazonError::InvalidInput {
                message: "feature-name list is empty".to_string(),
            });
        }
        Ok(Self { names })
    }

    /// Returns the ordered feature names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns the number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the schema has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Assembles an ordered feature vector from a name -> value mapping.
    ///
    /// Values are read strictly in this schema's order, so the result
    /// lines up with the columns the scaler and model were fitted on.
    ///
    /// # Errors
    ///
    /// Returns `MissingFeature` naming the first absent key, or
    /// `InvalidInput` if a value is not numeric.
    pub fn assemble(&self, record: &Map<String, Value>) -> Result<Vec<f32>> {
        let mut values = Vec::with_capacity(self.names.len());
        for name in &self.names {
            let value = record.get(name).ok_or_else(|| CorazonError::MissingFeature {
                name: name.clone(),
            })?;
            let number = value.as_f64().ok_or_else(|| CorazonError::InvalidInput {
                message: format!("feature '{name}' is not numeric"),
            })?;
            values.push(number as f32);
        }
        Ok(values)
    }
}
