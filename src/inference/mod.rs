//! Online single-record inference over a loaded artifact bundle.
//!
//! The engine holds the fitted scaler, the winning model, and the
//! feature schema from one training run. [`InferenceEngine::predict`]
//! never returns `Err`: every failure past the artifact-loading boundary
//! becomes a structured [`PredictionResult::Failure`] payload, so a
//! caller piping records through always gets one JSON object per record.

use crate::artifacts::ArtifactStore;
use crate::error::{CorazonError, Result};
use crate::models::TrainedModel;
use crate::preprocessing::StandardScaler;
use crate::primitives::Matrix;
use crate::schema::FeatureSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Qualitative risk bracket derived from the disease probability.
///
/// Brackets are half-open on the left: a probability exactly on a
/// boundary lands in the upper bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// p < 0.30
    Low,
    /// 0.30 <= p < 0.60
    Moderate,
    /// 0.60 <= p < 0.80
    High,
    /// p >= 0.80
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskLevel {
    /// Maps a disease probability to its bracket.
    #[must_use]
    pub fn from_probability(p: f64) -> Self {
        if p < 0.30 {
            RiskLevel::Low
        } else if p < 0.60 {
            RiskLevel::Moderate
        } else if p < 0.80 {
            RiskLevel::High
        } else {
            RiskLevel::VeryHigh
        }
    }
}

/// How decisive the probability is.
///
/// Probabilities near 0.5 mean the model is on the fence; anything
/// outside (0.40, 0.60) counts as a confident call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// 0.40 <= p <= 0.60
    Moderate,
    /// p < 0.40 or p > 0.60
    High,
}

impl Confidence {
    /// Maps a disease probability to a confidence label.
    #[must_use]
    pub fn from_probability(p: f64) -> Self {
        if p < 0.40 || p > 0.60 {
            Confidence::High
        } else {
            Confidence::Moderate
        }
    }
}

/// One JSON object per input record, success or failure.
///
/// The untagged representation keeps the success shape
/// `{prediction, probability, risk_level, confidence}` and the failure
/// shape `{error, prediction: -1}` with no wrapper key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionResult {
    /// A completed prediction.
    Success {
        /// Predicted class: 1 = disease, 0 = no disease.
        prediction: i64,
        /// P(disease), rounded to 4 decimal places.
        probability: f64,
        /// Risk bracket for the probability.
        risk_level: RiskLevel,
        /// Decisiveness label for the probability.
        confidence: Confidence,
    },
    /// A rejected record.
    Failure {
        /// Human-readable reason the record was rejected.
        error: String,
        /// Sentinel class, always -1.
        prediction: i64,
    },
}

impl PredictionResult {
    /// Builds the failure shape `{error, prediction: -1}`.
    pub fn failure(error: impl Into<String>) -> Self {
        PredictionResult::Failure {
            error: error.into(),
            prediction: -1,
        }
    }
}

/// Loaded scaler + model + schema, ready to score records.
#[derive(Debug)]
pub struct InferenceEngine {
    scaler: StandardScaler,
    model: TrainedModel,
    schema: FeatureSchema,
}

impl InferenceEngine {
    /// Loads the artifact bundle from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`CorazonError::ArtifactLoad`] if any artifact file is
    /// missing or corrupt. Loading is the only fallible step; after it
    /// succeeds, prediction never errors.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let bundle = ArtifactStore::new(dir.as_ref()).load_bundle()?;
        let schema = FeatureSchema::from_names(bundle.feature_names)?;
        Ok(Self {
            scaler: bundle.scaler,
            model: bundle.model,
            schema,
        })
    }

    /// Builds an engine from already-loaded components. Test seam; the
    /// binaries go through [`load`](Self::load).
    pub fn from_parts(
        scaler: StandardScaler,
        model: TrainedModel,
        schema: FeatureSchema,
    ) -> Self {
        Self {
            scaler,
            model,
            schema,
        }
    }

    /// Returns the winning model's display name.
    #[must_use]
    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Scores one JSON record.
    ///
    /// The record must be a JSON object carrying every schema feature as
    /// a number; extra keys are ignored. Any problem with the record or
    /// the model's output yields a [`PredictionResult::Failure`], never a
    /// panic or an `Err`.
    #[must_use]
    pub fn predict(&self, record: &Value) -> PredictionResult {
        match self.predict_inner(record) {
            Ok(result) => result,
            Err(e) => PredictionResult::failure(e.to_string()),
        }
    }

    fn predict_inner(&self, record: &Value) -> Result<PredictionResult> {
        let object = record.as_object().ok_or_else(|| CorazonError::InvalidInput {
            message: "input record must be a JSON object".to_string(),
        })?;

        let row = self.schema.assemble(object)?;
        let scaled = self.scaler.transform_row(&row)?;
        let x = Matrix::from_vec(1, scaled.len(), scaled)?;

        // The class comes from the model's own decision rule, not from
        // re-thresholding the probability; at an exact vote tie the two
        // can disagree.
        let prediction = self
            .model
            .predict(&x)?
            .first()
            .copied()
            .ok_or_else(|| CorazonError::from("model returned no prediction"))?;

        let probas = self.model.predict_proba(&x)?;
        let p_disease = probas
            .first()
            .and_then(|probs| probs.get(1))
            .copied()
            .ok_or_else(|| CorazonError::from("model returned no probabilities"))?;

        // Risk and confidence derive from the rounded probability so the
        // reported number and its brackets can never disagree.
        let probability = round4(f64::from(p_disease));

        Ok(PredictionResult::Success {
            prediction: prediction as i64,
            probability,
            risk_level: RiskLevel::from_probability(probability),
            confidence: Confidence::from_probability(probability),
        })
    }
}

/// Rounds to 4 decimal places, half away from zero.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
