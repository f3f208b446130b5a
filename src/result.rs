use crate::error::RunnerError;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Outcome of a single model request against one simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub simulation_id: u32,
    pub initial_image_path: String,
    pub prompt: String,
    pub model_response: String,
    pub actual_bucket: u8,
    pub predicted_bucket: Option<u8>,
    pub is_correct: bool,
}

/// One complete pass of a model over the dataset
#[derive(Debug)]
pub struct BenchmarkRun {
    pub model_name: String,
    pub predictions: Vec<PredictionResult>,
}

impl BenchmarkRun {
    pub fn new(model_name: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            predictions: Vec::new(),
        }
    }

    /// Fraction of correct predictions; 0.0 for an empty run
    pub fn overall_accuracy(&self) -> f64 {
        if self.predictions.is_empty() {
            return 0.0;
        }
        let correct = self.predictions.iter().filter(|p| p.is_correct).count();
        correct as f64 / self.predictions.len() as f64
    }
}

/// Cross-run aggregate for one model
#[derive(Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub model_name: String,
    pub run_accuracies: Vec<f64>,
    pub average_accuracy: f64,
    pub generated_at: String,
}

impl RunSummary {
    /// Aggregate per-run accuracies into their arithmetic mean.
    ///
    /// A model with zero completed runs has no defined mean; that is a
    /// loud error, not an empty summary.
    pub fn from_accuracies(model_name: &str, run_accuracies: Vec<f64>) -> Result<Self, RunnerError> {
        if run_accuracies.is_empty() {
            return Err(RunnerError::NoCompletedRuns(model_name.to_string()));
        }
        let average_accuracy = run_accuracies.iter().sum::<f64>() / run_accuracies.len() as f64;
        Ok(Self {
            model_name: model_name.to_string(),
            run_accuracies,
            average_accuracy,
            generated_at: Utc::now().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(id: u32, actual: u8, predicted: Option<u8>) -> PredictionResult {
        PredictionResult {
            simulation_id: id,
            initial_image_path: format!("data/sim_{}_initial.png", id),
            prompt: "predict".to_string(),
            model_response: "answer(2)".to_string(),
            actual_bucket: actual,
            predicted_bucket: predicted,
            is_correct: predicted == Some(actual),
        }
    }

    #[test]
    fn test_empty_run_has_zero_accuracy() {
        assert_eq!(BenchmarkRun::new("m").overall_accuracy(), 0.0);
    }

    #[test]
    fn test_overall_accuracy() {
        let mut run = BenchmarkRun::new("m");
        run.predictions.push(prediction(1, 2, Some(2)));
        run.predictions.push(prediction(2, 1, Some(2)));
        run.predictions.push(prediction(3, 3, None));
        assert!((run.overall_accuracy() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_mean() {
        let summary = RunSummary::from_accuracies("m", vec![0.5, 1.0]).unwrap();
        assert_eq!(summary.average_accuracy, 0.75);
        assert_eq!(summary.run_accuracies, vec![0.5, 1.0]);
    }

    #[test]
    fn test_summary_of_zero_runs_fails() {
        assert!(matches!(
            RunSummary::from_accuracies("m", Vec::new()),
            Err(RunnerError::NoCompletedRuns(_))
        ));
    }
}
