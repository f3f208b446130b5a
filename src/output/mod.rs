use crate::error::OutputError;
use crate::result::{BenchmarkRun, PredictionResult, RunSummary};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Serialize)]
struct RunRecord<'a> {
    model_name: &'a str,
    predictions: &'a [PredictionResult],
    overall_accuracy: f64,
}

#[derive(Deserialize)]
struct StoredRun {
    overall_accuracy: f64,
}

/// Make sure the output directory exists before the first run persists
pub fn ensure_dir(dir: &Path) -> Result<(), OutputError> {
    std::fs::create_dir_all(dir).map_err(OutputError::CreateDir)
}

/// Persist one completed run.
///
/// The record is written to a temp file in the target directory and
/// renamed into place, so a crash mid-write never truncates an existing
/// checkpoint.
pub fn write_run(path: &Path, run: &BenchmarkRun) -> Result<(), OutputError> {
    let record = RunRecord {
        model_name: &run.model_name,
        predictions: &run.predictions,
        overall_accuracy: run.overall_accuracy(),
    };
    let json = serde_json::to_string_pretty(&record)?;
    write_atomic(path, &json)
}

/// Read the authoritative accuracy back from a checkpoint file
pub fn load_run_accuracy(path: &Path) -> Result<f64, OutputError> {
    let content = std::fs::read_to_string(path).map_err(|e| OutputError::ReadCheckpoint {
        path: path.to_path_buf(),
        source: e,
    })?;
    let stored: StoredRun =
        serde_json::from_str(&content).map_err(|e| OutputError::ParseCheckpoint {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(stored.overall_accuracy)
}

/// Persist the per-model summary next to its run files
pub fn write_summary(out_dir: &Path, summary: &RunSummary) -> Result<(), OutputError> {
    let path = out_dir.join(format!("benchmark_results_{}_avg.json", summary.model_name));
    let json = serde_json::to_string_pretty(summary)?;
    write_atomic(&path, &json)
}

fn write_atomic(path: &Path, content: &str) -> Result<(), OutputError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(OutputError::Write)?;
    tmp.write_all(content.as_bytes())
        .map_err(OutputError::Write)?;
    tmp.persist(path).map_err(|e| OutputError::Persist {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_run() -> BenchmarkRun {
        let mut run = BenchmarkRun::new("fake");
        run.predictions.push(PredictionResult {
            simulation_id: 1,
            initial_image_path: "data/sim_1_initial.png".to_string(),
            prompt: "predict".to_string(),
            model_response: "answer(2)".to_string(),
            actual_bucket: 2,
            predicted_bucket: Some(2),
            is_correct: true,
        });
        run
    }

    #[test]
    fn test_run_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmark_results_fake_run1.json");

        write_run(&path, &sample_run()).unwrap();
        assert_eq!(load_run_accuracy(&path).unwrap(), 1.0);

        // No stray temp file left behind
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmark_results_fake_run1.json");
        std::fs::write(&path, "stale").unwrap();

        write_run(&path, &sample_run()).unwrap();
        assert_eq!(load_run_accuracy(&path).unwrap(), 1.0);
    }

    #[test]
    fn test_load_missing_checkpoint() {
        assert!(matches!(
            load_run_accuracy(Path::new("/nonexistent/run1.json")),
            Err(OutputError::ReadCheckpoint { .. })
        ));
    }

    #[test]
    fn test_summary_file_naming() {
        let dir = tempfile::tempdir().unwrap();
        let summary = RunSummary::from_accuracies("fake", vec![0.5, 1.0]).unwrap();
        write_summary(dir.path(), &summary).unwrap();

        let content =
            std::fs::read_to_string(dir.path().join("benchmark_results_fake_avg.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["average_accuracy"], serde_json::json!(0.75));
    }
}
