//! Offline training pipeline.
//!
//! Builds (or loads) the labeled dataset, fits and compares the four
//! candidate classifier families on a stratified 80/20 split, and writes
//! the winning artifact bundle to disk.
//!
//! ```text
//! train [--out DIR] [--data FILE.csv] [--samples N] [--seed N]
//! ```
//!
//! Without `--data`, a synthetic dataset is generated (default 1000
//! samples, seed 42).

use corazon::artifacts::{ArtifactBundle, ArtifactStore};
use corazon::dataset::{CsvDataset, DatasetProvider, SyntheticHeartDataset};
use corazon::error::Result;
use corazon::model_selection::{stratified_train_test_split, ModelSelector};
use corazon::models::ModelMetadata;
use corazon::preprocessing::StandardScaler;
use corazon::schema::FEATURE_NAMES;
use std::process;

struct TrainArgs {
    out_dir: String,
    data_path: Option<String>,
    n_samples: usize,
    seed: u64,
}

impl TrainArgs {
    fn parse() -> std::result::Result<Self, String> {
        let mut args = TrainArgs {
            out_dir: "artifacts".to_string(),
            data_path: None,
            n_samples: 1000,
            seed: 42,
        };

        let mut iter = std::env::args().skip(1);
        while let Some(flag) = iter.next() {
            let mut value = |name: &str| {
                iter.next().ok_or_else(|| format!("{name} requires a value"))
            };
            match flag.as_str() {
                "--out" => args.out_dir = value("--out")?,
                "--data" => args.data_path = Some(value("--data")?),
                "--samples" => {
                    args.n_samples = value("--samples")?
                        .parse()
                        .map_err(|e| format!("--samples: {e}"))?;
                }
                "--seed" => {
                    args.seed = value("--seed")?.parse().map_err(|e| format!("--seed: {e}"))?;
                }
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(args)
    }
}

fn run(args: &TrainArgs) -> Result<()> {
    let dataset = match &args.data_path {
        Some(path) => {
            println!("Loading dataset from {path}...");
            CsvDataset::new(path).load()?
        }
        None => {
            println!(
                "Generating synthetic dataset ({} samples, seed {})...",
                args.n_samples, args.seed
            );
            SyntheticHeartDataset::new(args.n_samples, args.seed).load()?
        }
    };

    let (negatives, positives) = dataset.class_counts();
    println!(
        "Dataset shape: ({}, {})",
        dataset.n_samples(),
        dataset.features().n_cols()
    );
    println!("Target distribution: 0 -> {negatives}, 1 -> {positives}");

    let (x_train, x_test, y_train, y_test) =
        stratified_train_test_split(dataset.features(), dataset.labels(), 0.2, args.seed)?;
    println!(
        "Train/test split: {} train, {} test",
        y_train.len(),
        y_test.len()
    );

    let mut scaler = StandardScaler::new();
    let x_train_scaled = scaler.fit_transform(&x_train)?;
    let x_test_scaled = scaler.transform(&x_test)?;

    println!("\nTraining candidate models...");
    let report = ModelSelector::new()
        .with_random_state(args.seed)
        .select(&x_train_scaled, &y_train, &x_test_scaled, &y_test)?;

    for candidate in &report.candidates {
        println!(
            "  {}: train accuracy {:.4}, test accuracy {:.4}",
            candidate.name, candidate.train_accuracy, candidate.test_accuracy
        );
    }
    println!(
        "\nBest model: {} (test accuracy {:.4})",
        report.best.name(),
        report.best_accuracy
    );

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
        metadata,
    };

    let store = ArtifactStore::new(&args.out_dir);
    store.save_bundle(&bundle)?;
    println!("\nArtifacts saved to {}/:", args.out_dir);
    println!("  scaler.bin");
    println!("  model.bin");
    println!("  feature_names.json");
    println!("  model_metadata.json");

    Ok(())
}

fn main() {
    let args = match TrainArgs::parse() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("usage: train [--out DIR] [--data FILE.csv] [--samples N] [--seed N]");
            process::exit(2);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Training failed: {e}");
        process::exit(1);
    }
}
