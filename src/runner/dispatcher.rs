use crate::config::RetryConfig;
use crate::dataset::{self, SimulationCase};
use crate::error::RunnerError;
use crate::extract::extract_bucket;
use crate::provider::Adapter;
use crate::result::PredictionResult;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::warn;

use super::retry::robust_request;

/// Dispatch one batch of cases concurrently and collect the results in
/// input order.
///
/// Completion order is unordered, so every future carries its input index
/// and the finished batch is re-merged before anything is appended to the
/// run. Cases with missing companion assets are dropped with a warning.
/// The first case that exhausts its retries fails the whole batch;
/// dropping the remaining futures cancels their in-flight requests.
pub async fn run_batch(
    adapter: &Arc<dyn Adapter>,
    batch: &[SimulationCase],
    prompt: &str,
    retry: &RetryConfig,
    model_name: &str,
) -> Result<Vec<PredictionResult>, RunnerError> {
    let mut in_flight: FuturesUnordered<_> = batch
        .iter()
        .enumerate()
        .map(|(index, case)| process_case(adapter, case, prompt, retry, model_name, index))
        .collect();

    let mut completed: Vec<(usize, Option<PredictionResult>)> = Vec::with_capacity(batch.len());
    while let Some(result) = in_flight.next().await {
        completed.push(result?);
    }

    completed.sort_by_key(|(index, _)| *index);
    Ok(completed
        .into_iter()
        .filter_map(|(_, prediction)| prediction)
        .collect())
}

async fn process_case(
    adapter: &Arc<dyn Adapter>,
    case: &SimulationCase,
    prompt: &str,
    retry: &RetryConfig,
    model_name: &str,
    index: usize,
) -> Result<(usize, Option<PredictionResult>), RunnerError> {
    let image = case.image_path();
    let results = case.results_path();
    if !image.exists() || !results.exists() {
        warn!("sim {} missing assets, dropping", case.id);
        return Ok((index, None));
    }

    let actual_bucket = dataset::load_final_bucket(&results)?;

    let label = format!("{} sim {}", model_name, case.id);
    let response = robust_request(retry, &label, || adapter.request(&image, prompt)).await?;

    let predicted_bucket = extract_bucket(&response);
    Ok((
        index,
        Some(PredictionResult {
            simulation_id: case.id,
            initial_image_path: image.display().to_string(),
            prompt: prompt.to_string(),
            model_response: response,
            actual_bucket,
            predicted_bucket,
            is_correct: predicted_bucket == Some(actual_bucket),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::discover_cases;
    use crate::error::AdapterError;
    use async_trait::async_trait;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    /// Completes cases in reverse id order and answers with its own id
    struct StaggeredAdapter;

    #[async_trait]
    impl Adapter for StaggeredAdapter {
        async fn request(&self, image: &Path, _prompt: &str) -> Result<String, AdapterError> {
            let name = image.file_name().unwrap().to_string_lossy().into_owned();
            let id: u64 = name
                .trim_start_matches("sim_")
                .trim_end_matches("_initial.png")
                .parse()
                .unwrap();
            tokio::time::sleep(Duration::from_millis(500 - id * 100)).await;
            Ok(format!("answer({})", id))
        }
    }

    fn write_case(dir: &Path, id: u32, bucket: u8) {
        fs::write(dir.join(format!("sim_{}.json", id)), "{}").unwrap();
        fs::write(dir.join(format!("sim_{}_initial.png", id)), "").unwrap();
        fs::write(
            dir.join(format!("sim_{}_results.json", id)),
            format!(r#"{{"finalBucket": {}}}"#, bucket),
        )
        .unwrap();
    }

    fn retry() -> RetryConfig {
        RetryConfig {
            max_retries: 1,
            base_delay_secs: 0.0,
            cooldown_secs: 0,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_remerge_to_input_order() {
        let dir = tempfile::tempdir().unwrap();
        for id in 1..=4 {
            write_case(dir.path(), id, 1);
        }
        let cases = discover_cases(dir.path()).unwrap();
        let adapter: Arc<dyn Adapter> = Arc::new(StaggeredAdapter);

        let results = run_batch(&adapter, &cases, "p", &retry(), "fake")
            .await
            .unwrap();

        let ids: Vec<u32> = results.iter().map(|r| r.simulation_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(results[0].predicted_bucket, Some(1));
        assert!(results[0].is_correct);
        // answer(4) is out of range, so no answer and no credit
        assert_eq!(results[3].predicted_bucket, None);
        assert!(!results[3].is_correct);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_assets_dropped() {
        let dir = tempfile::tempdir().unwrap();
        write_case(dir.path(), 1, 1);
        write_case(dir.path(), 2, 2);
        fs::remove_file(dir.path().join("sim_1_initial.png")).unwrap();
        let cases = discover_cases(dir.path()).unwrap();
        let adapter: Arc<dyn Adapter> = Arc::new(StaggeredAdapter);

        let results = run_batch(&adapter, &cases, "p", &retry(), "fake")
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].simulation_id, 2);
    }
}
