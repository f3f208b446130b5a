use crate::config::RetryConfig;
use crate::dataset::SimulationCase;
use crate::error::RunnerError;
use crate::output;
use crate::provider::Adapter;
use crate::result::{BenchmarkRun, RunSummary};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

use super::dispatcher::run_batch;

/// Resolved settings for one benchmark invocation, built once in the CLI
/// and shared by every requested model.
#[derive(Debug, Clone)]
pub struct Harness {
    pub prompt: String,
    pub retry: RetryConfig,
    pub runs: u32,
    pub batch_size: usize,
    pub out_dir: PathBuf,
    pub overwrite: bool,
    pub cooldown: Duration,
}

impl Harness {
    /// Execute every requested run for one model and aggregate the
    /// per-run accuracies into a persisted summary.
    ///
    /// Runs whose result file already exists are skipped unless overwrite
    /// is set; the persisted accuracy is authoritative and the file is
    /// read, never rewritten. Fresh runs go batch by batch, persist
    /// atomically, then pause for the cooldown so a completed run does
    /// not immediately burst the provider again.
    pub async fn bench_model(
        &self,
        slug: &str,
        adapter: Arc<dyn Adapter>,
        cases: &[SimulationCase],
    ) -> Result<RunSummary, RunnerError> {
        output::ensure_dir(&self.out_dir)?;

        let mut run_accuracies = Vec::new();

        for run_idx in 1..=self.runs {
            let run_file = self
                .out_dir
                .join(format!("benchmark_results_{}_run{}.json", slug, run_idx));

            if run_file.exists() && !self.overwrite {
                let accuracy = output::load_run_accuracy(&run_file)?;
                info!(
                    "skipping {} (checkpoint accuracy {:.2}%)",
                    run_file.display(),
                    accuracy * 100.0
                );
                run_accuracies.push(accuracy);
                continue;
            }

            info!("{} - run {}/{}", slug, run_idx, self.runs);
            let mut run = BenchmarkRun::new(slug);

            for batch in cases.chunks(self.batch_size.max(1)) {
                let predictions =
                    run_batch(&adapter, batch, &self.prompt, &self.retry, slug).await?;
                run.predictions.extend(predictions);
            }

            let accuracy = run.overall_accuracy();
            output::write_run(&run_file, &run)?;
            info!(
                "wrote {} (accuracy {:.2}%)",
                run_file.display(),
                accuracy * 100.0
            );
            run_accuracies.push(accuracy);

            sleep(self.cooldown).await;
        }

        let summary = RunSummary::from_accuracies(slug, run_accuracies)?;
        output::write_summary(&self.out_dir, &summary)?;
        info!(
            "{} average accuracy {:.2}%",
            slug,
            summary.average_accuracy * 100.0
        );

        Ok(summary)
    }
}
