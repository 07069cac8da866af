//! Persistence of the trained artifact bundle.
//!
//! Training writes four files into one directory; inference reads all
//! four back. Model state goes through bincode, human-facing metadata
//! through JSON:
//!
//! - `scaler.bin` - fitted [`StandardScaler`] (bincode)
//! - `model.bin` - winning [`TrainedModel`] (bincode)
//! - `feature_names.json` - canonical feature order (JSON array)
//! - `model_metadata.json` - training report (JSON object)
//!
//! Loading fails fast on the first missing or corrupt file. There is no
//! partial-bundle fallback: a bundle either loads whole or not at all.

use crate::error::{CorazonError, Result};
use crate::models::{ModelMetadata, TrainedModel};
use crate::preprocessing::StandardScaler;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Scaler artifact file name.
pub const SCALER_FILE: &str = "scaler.bin";
/// Model artifact file name.
pub const MODEL_FILE: &str = "model.bin";
/// Feature-order artifact file name.
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";
/// Metadata artifact file name.
pub const METADATA_FILE: &str = "model_metadata.json";

/// The complete set of artifacts produced by one training run.
#[derive(Debug)]
pub struct ArtifactBundle {
    /// Fitted feature scaler.
    pub scaler: StandardScaler,
    /// Winning fitted model.
    pub model: TrainedModel,
    /// Feature names in the order the scaler and model expect.
    pub feature_names: Vec<String>,
    /// Descriptive training report.
    pub metadata: ModelMetadata,
}

/// Reads and writes artifact bundles under a single directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Creates a store rooted at `dir`. The directory need not exist yet;
    /// [`save_bundle`](Self::save_bundle) creates it.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the store's directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes all four artifact files, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or any file
    /// fails to serialize or write.
    pub fn save_bundle(&self, bundle: &ArtifactBundle) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        self.save_bincode(SCALER_FILE, &bundle.scaler)?;
        self.save_bincode(MODEL_FILE, &bundle.model)?;
        self.save_json(FEATURE_NAMES_FILE, &bundle.feature_names)?;
        self.save_json(METADATA_FILE, &bundle.metadata)?;

        Ok(())
    }

    /// Reads all four artifact files back into a bundle.
    ///
    /// # Errors
    ///
    /// Returns [`CorazonError::ArtifactLoad`] naming the first file that
    /// is missing or fails to decode.
    pub fn load_bundle(&self) -> Result<ArtifactBundle> {
        let scaler: StandardScaler = self.load_bincode(SCALER_FILE)?;
        let model: TrainedModel = self.load_bincode(MODEL_FILE)?;
        let feature_names: Vec<String> = self.load_json(FEATURE_NAMES_FILE)?;
        let metadata: ModelMetadata = self.load_json(METADATA_FILE)?;

        Ok(ArtifactBundle {
            scaler,
            model,
            feature_names,
            metadata,
        })
    }

    fn save_bincode<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let bytes = bincode::serialize(value)
            .map_err(|e| CorazonError::Serialization(format!("{file}: {e}")))?;
        fs::write(self.dir.join(file), bytes)?;
        Ok(())
    }

    fn save_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| CorazonError::Serialization(format!("{file}: {e}")))?;
        fs::write(self.dir.join(file), json)?;
        Ok(())
    }

    fn load_bincode<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let bytes = fs::read(self.dir.join(file)).map_err(|e| CorazonError::ArtifactLoad {
            file: file.to_string(),
            reason: e.to_string(),
        })?;
        bincode::deserialize(&bytes).map_err(|e| CorazonError::ArtifactLoad {
            file: file.to_string(),
            reason: e.to_string(),
        })
    }

    fn load_json<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let text =
            fs::read_to_string(self.dir.join(file)).map_err(|e| CorazonError::ArtifactLoad {
                file: file.to_string(),
                reason: e.to_string(),
            })?;
        serde_json::from_str(&text).map_err(|e| CorazonError::ArtifactLoad {
            file: file.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::KNearestNeighbors;
    use crate::primitives::Matrix;
    use crate::schema::FEATURE_NAMES;
    use tempfile::TempDir;

    fn sample_bundle() -> ArtifactBundle {
        let x = Matrix::from_vec(4, 2, vec![0.0, 0.0, 0.1, 0.1, 5.0, 5.0, 5.1, 5.1])
            .expect("valid dimensions");
        let y = vec![0, 0, 1, 1];

        let mut scaler = StandardScaler::new();
        let x_scaled = scaler.fit_transform(&x).expect("fit_transform succeeds");
        let mut knn = KNearestNeighbors::new(1);
        knn.fit(&x_scaled, &y).expect("fit succeeds");

        ArtifactBundle {
            scaler,
            model: TrainedModel::Knn(knn),
            feature_names: FEATURE_NAMES.iter().map(|s| (*s).to_string()).collect(),
            metadata: ModelMetadata {
                best_model: "KNN".to_string(),
                best_accuracy: 1.0,
                train_accuracy: 1.0,
                n_features: 2,
                n_train_samples: 4,
                n_test_samples: 0,
            },
        }
    }

    #[test]
    fn test_save_creates_all_four_files() {
        let dir = TempDir::new().expect("tempdir");
        let store = ArtifactStore::new(dir.path());
        store.save_bundle(&sample_bundle()).expect("save succeeds");

        for file in [SCALER_FILE, MODEL_FILE, FEATURE_NAMES_FILE, METADATA_FILE] {
            assert!(dir.path().join(file).exists(), "{file} missing");
        }
    }

    #[test]
    fn test_round_trip_preserves_predictions() {
        let dir = TempDir::new().expect("tempdir");
        let store = ArtifactStore::new(dir.path());
        let bundle = sample_bundle();
        store.save_bundle(&bundle).expect("save succeeds");

        let restored = store.load_bundle().expect("load succeeds");
        assert_eq!(restored.model.name(), "KNN");
        assert_eq!(restored.metadata, bundle.metadata);
        assert_eq!(restored.feature_names, bundle.feature_names);

        let x = Matrix::from_vec(1, 2, vec![4.9, 4.9]).expect("valid dimensions");
        let x_orig = bundle.scaler.transform(&x).expect("transform succeeds");
        let x_rest = restored.scaler.transform(&x).expect("transform succeeds");
        assert_eq!(x_orig.as_slice(), x_rest.as_slice());
        assert_eq!(
            bundle.model.predict(&x_orig).expect("predict succeeds"),
            restored.model.predict(&x_rest).expect("predict succeeds")
        );
    }

    #[test]
    fn test_missing_file_names_the_file() {
        let dir = TempDir::new().expect("tempdir");
        let store = ArtifactStore::new(dir.path());
        store.save_bundle(&sample_bundle()).expect("save succeeds");
        std::fs::remove_file(dir.path().join(MODEL_FILE)).expect("remove succeeds");

        let err = store.load_bundle().expect_err("load must fail");
        match err {
            CorazonError::ArtifactLoad { file, .. } => assert_eq!(file, MODEL_FILE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_corrupt_file_names_the_file() {
        let dir = TempDir::new().expect("tempdir");
        let store = ArtifactStore::new(dir.path());
        store.save_bundle(&sample_bundle()).expect("save succeeds");
        std::fs::write(dir.path().join(FEATURE_NAMES_FILE), "not json").expect("write succeeds");

        let err = store.load_bundle().expect_err("load must fail");
        match err {
            CorazonError::ArtifactLoad { file, .. } => assert_eq!(file, FEATURE_NAMES_FILE),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_empty_dir_fails_on_scaler_first() {
        let dir = TempDir::new().expect("tempdir");
        let store = ArtifactStore::new(dir.path());

        let err = store.load_bundle().expect_err("load must fail");
        match err {
            CorazonError::ArtifactLoad { file, .. } => assert_eq!(file, SCALER_FILE),
            other => panic!("unexpected error: {other}"),
        }
    }
}
