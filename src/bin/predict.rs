//! Single-record inference CLI.
//!
//! ```text
//! predict [--artifacts DIR] [JSON_RECORD]
//! ```
//!
//! The record is a JSON object carrying all thirteen features. Without a
//! record argument, a built-in example patient is scored. The output is
//! always exactly one JSON object on stdout; malformed input yields a
//! structured error object rather than a crash.

use corazon::inference::{InferenceEngine, PredictionResult};
use serde_json::{json, Value};
use std::process;

/// Example patient scored when no record is given.
fn example_record() -> Value {
    json!({
        "age": 63, "sex": 1, "cp": 3, "trestbps": 145, "chol": 233,
        "fbs": 1, "restecg": 0, "thalach": 150, "exang": 0,
        "oldpeak": 2.3, "slope": 0, "ca": 0, "thal": 1
    })
}

fn print_result(result: &PredictionResult) {
    match serde_json::to_string_pretty(result) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("Failed to serialize result: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    let mut artifacts_dir = "artifacts".to_string();
    let mut record_text: Option<String> = None;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--artifacts" {
            match iter.next() {
                Some(dir) => artifacts_dir = dir,
                None => {
                    eprintln!("error: --artifacts requires a value");
                    process::exit(2);
                }
            }
        } else if record_text.is_none() {
            record_text = Some(arg);
        } else {
            eprintln!("error: unexpected argument: {arg}");
            eprintln!("usage: predict [--artifacts DIR] [JSON_RECORD]");
            process::exit(2);
        }
    }

    let record: Value = match record_text {
        Some(text) => match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) => {
                // Contract with callers: malformed input still produces a
                // parseable result object, with only the error key.
                println!("{}", json!({"error": "Invalid JSON input"}));
                return;
            }
        },
        None => example_record(),
    };

    // Loading is stage one of the scoring pipeline: its failures become
    // the same structured result object as any other, never a bare exit.
    let engine = match InferenceEngine::load(&artifacts_dir) {
        Ok(engine) => engine,
        Err(e) => {
            print_result(&PredictionResult::failure(e.to_string()));
            return;
        }
    };

    print_result(&engine.predict(&record));
}
