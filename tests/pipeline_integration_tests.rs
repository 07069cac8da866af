//! End-to-end pipeline tests: train on a synthetic dataset, persist the
//! artifact bundle, reload it through the inference engine, and score
//! JSON records.

use corazon::artifacts::{ArtifactBundle, ArtifactStore};
use corazon::dataset::{DatasetProvider, SyntheticHeartDataset};
use corazon::inference::{Confidence, InferenceEngine, PredictionResult, RiskLevel};
use corazon::model_selection::{stratified_train_test_split, ModelSelector};
use corazon::models::ModelMetadata;
use corazon::preprocessing::StandardScaler;
use corazon::schema::FEATURE_NAMES;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Trains on a small synthetic dataset and saves the bundle into `dir`.
fn train_into(dir: &std::path::Path, n_samples: usize, seed: u64) -> ModelMetadata {
    let dataset = SyntheticHeartDataset::new(n_samples, seed)
        .load()
        .expect("generation succeeds");
    let (x_train, x_test, y_train, y_test) =
        stratified_train_test_split(dataset.features(), dataset.labels(), 0.2, seed)
            .expect("split succeeds");

    let mut scaler = StandardScaler::new();
    let x_train_scaled = scaler.fit_transform(&x_train).expect("fit_transform succeeds");
    let x_test_scaled = scaler.transform(&x_test).expect("transform succeeds");

    let report = ModelSelector::new()
        .with_random_state(seed)
        .select(&x_train_scaled, &y_train, &x_test_scaled, &y_test)
        .expect("selection succeeds");

    let metadata = ModelMetadata {
        best_model: report.best.name().to_string(),
        best_accuracy: report.best_accuracy,
        train_accuracy: report.best_train_accuracy,
        n_features: FEATURE_NAMES.len(),
        n_train_samples: y_train.len(),
        n_test_samples: y_test.len(),
    };

    let bundle = ArtifactBundle {
        scaler,
        model: report.best,
        feature_names: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
        metadata: metadata.clone(),
    };
    ArtifactStore::new(dir).save_bundle(&bundle).expect("save succeeds");
    metadata
}

fn example_record() -> Value {
    json!({
        "age": 63, "sex": 1, "cp": 3, "trestbps": 145, "chol": 233,
        "fbs": 1, "restecg": 0, "thalach": 150, "exang": 0,
        "oldpeak": 2.3, "slope": 0, "ca": 0, "thal": 1
    })
}

#[test]
fn test_train_save_load_predict() {
    let dir = TempDir::new().expect("tempdir");
    let metadata = train_into(dir.path(), 200, 42);

    assert_eq!(metadata.n_features, 13);
    assert_eq!(metadata.n_train_samples + metadata.n_test_samples, 200);
    assert!(metadata.best_accuracy > 0.5, "winner should beat coin flips");

    let engine = InferenceEngine::load(dir.path()).expect("load succeeds");
    match engine.predict(&example_record()) {
        PredictionResult::Success {
            prediction,
            probability,
            risk_level,
            confidence,
        } => {
            assert!(prediction == 0 || prediction == 1);
            assert!((0.0..=1.0).contains(&probability));
            // Labels must agree with the reported probability.
            assert_eq!(risk_level, RiskLevel::from_probability(probability));
            assert_eq!(confidence, Confidence::from_probability(probability));
        }
        PredictionResult::Failure { error, .. } => panic!("unexpected failure: {error}"),
    }
}

#[test]
fn test_missing_feature_yields_sentinel() {
    let dir = TempDir::new().expect("tempdir");
    train_into(dir.path(), 120, 42);
    let engine = InferenceEngine::load(dir.path()).expect("load succeeds");

    let mut record = example_record();
    record.as_object_mut().expect("object").remove("oldpeak");

    match engine.predict(&record) {
        PredictionResult::Failure { error, prediction } => {
            assert_eq!(prediction, -1);
            assert!(error.contains("oldpeak"), "error should name the feature: {error}");
        }
        PredictionResult::Success { .. } => panic!("expected failure"),
    }
}

#[test]
fn test_prediction_json_has_four_decimal_probability() {
    let dir = TempDir::new().expect("tempdir");
    train_into(dir.path(), 120, 42);
    let engine = InferenceEngine::load(dir.path()).expect("load succeeds");

    let value = serde_json::to_value(engine.predict(&example_record())).expect("serialize");
    let probability = value["probability"].as_f64().expect("probability is a number");
    let scaled = probability * 10_000.0;
    assert!(
        (scaled - scaled.round()).abs() < 1e-6,
        "probability {probability} not rounded to 4 decimals"
    );
}

#[test]
fn test_training_is_deterministic_across_runs() {
    let dir_a = TempDir::new().expect("tempdir");
    let dir_b = TempDir::new().expect("tempdir");
    let meta_a = train_into(dir_a.path(), 160, 42);
    let meta_b = train_into(dir_b.path(), 160, 42);

    assert_eq!(meta_a, meta_b);

    let engine_a = InferenceEngine::load(dir_a.path()).expect("load succeeds");
    let engine_b = InferenceEngine::load(dir_b.path()).expect("load succeeds");
    assert_eq!(
        engine_a.predict(&example_record()),
        engine_b.predict(&example_record())
    );
}

#[test]
fn test_load_fails_loudly_without_artifacts() {
    let dir = TempDir::new().expect("tempdir");
    let err = InferenceEngine::load(dir.path()).expect_err("load must fail");
    assert!(err.to_string().contains("scaler.bin"), "error should name the file: {err}");
}

#[test]
fn test_metadata_file_is_readable_json() {
    let dir = TempDir::new().expect("tempdir");
    let metadata = train_into(dir.path(), 120, 42);

    let text = std::fs::read_to_string(dir.path().join("model_metadata.json"))
        .expect("metadata file exists");
    let value: Value = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(value["best_model"], metadata.best_model.as_str());
    assert_eq!(value["n_features"], 13);
}

#[test]
fn test_feature_names_file_preserves_order() {
    let dir = TempDir::new().expect("tempdir");
    train_into(dir.path(), 120, 42);

    let text = std::fs::read_to_string(dir.path().join("feature_names.json"))
        .expect("feature names file exists");
    let names: Vec<String> = serde_json::from_str(&text).expect("valid JSON");
    assert_eq!(names, FEATURE_NAMES.map(String::from).to_vec());
}
