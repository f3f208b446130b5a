use crate::cli::RunArgs;
use crate::config::{Provider, Registry};
use crate::dataset;
use crate::prompt;
use crate::provider::{self, Adapter, AdapterOptions};
use crate::runner::Harness;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    info!("Loading registry from {:?}", args.registry);
    let mut registry = Registry::load(&args.registry)?;
    registry.validate()?;

    // Apply CLI overrides
    if let Some(max_retries) = args.max_retries {
        registry.retry.max_retries = max_retries;
    }
    if let Some(base_delay) = args.base_delay {
        registry.retry.base_delay_secs = base_delay;
    }
    if let Some(max_tokens) = args.max_tokens {
        registry.request.max_tokens = max_tokens;
    }
    if let Some(timeout) = args.timeout_seconds {
        registry.request.timeout_secs = timeout;
    }

    let prompt = prompt::load_prompt(args.prompt_file.as_deref())?;

    let mut cases = dataset::discover_cases(&args.data_dir)?;
    if let Some(subset) = args.subset {
        if subset > 0 {
            cases.truncate(subset);
        }
    }
    info!("{} cases in {:?}", cases.len(), args.data_dir);

    let opts = AdapterOptions {
        max_tokens: registry.request.max_tokens,
        timeout: Duration::from_secs(registry.request.timeout_secs),
        thinking_budget: args.thinking_budget,
        openai_base_url: args.openai_base_url.clone(),
        openai_api_key: args.openai_api_key.clone(),
    };

    // Resolve every adapter up front so a bad slug or missing key fails
    // before any network activity
    let mut adapters: Vec<(String, Provider, Arc<dyn Adapter>)> = Vec::new();
    for slug in &args.models {
        let entry = registry.entry(slug)?;
        let adapter = provider::create_adapter(slug, entry, &opts)?;
        adapters.push((slug.clone(), entry.provider, adapter));
    }

    if args.dry_run {
        print_execution_plan(&args, &adapters, cases.len());
        return Ok(());
    }

    let harness = Harness {
        prompt,
        retry: registry.retry.clone(),
        runs: args.runs,
        batch_size: args.batch_size,
        out_dir: args.output_dir.clone(),
        overwrite: args.overwrite,
        cooldown: Duration::from_secs(registry.retry.cooldown_secs),
    };

    for (slug, _, adapter) in adapters {
        harness.bench_model(&slug, adapter, &cases).await?;
    }

    Ok(())
}

fn print_execution_plan(
    args: &RunArgs,
    adapters: &[(String, Provider, Arc<dyn Adapter>)],
    case_count: usize,
) {
    println!("\n=== Execution Plan ===\n");
    println!("Data dir: {:?}", args.data_dir);
    println!("Output dir: {:?}", args.output_dir);
    println!("Cases: {}", case_count);
    println!("Runs per model: {}", args.runs);
    println!("Batch size: {}", args.batch_size);

    println!("\nModels to benchmark:");
    for (slug, provider, _) in adapters {
        let mut skips = Vec::new();
        for run_idx in 1..=args.runs {
            let run_file = args
                .output_dir
                .join(format!("benchmark_results_{}_run{}.json", slug, run_idx));
            if run_file.exists() && !args.overwrite {
                skips.push(run_idx);
            }
        }
        let status = if skips.is_empty() {
            String::new()
        } else {
            format!(" [SKIP runs {:?} - checkpoints exist]", skips)
        };
        println!("  - {} ({}){}", slug, provider, status);
    }
    println!();
}
