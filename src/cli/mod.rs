pub mod run;
pub mod schema;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vpct")]
#[command(
    author,
    version,
    about = "Image-based bucket-prediction benchmarks across OpenAI-compatible and Anthropic endpoints"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute benchmark runs and persist per-run results
    Run(RunArgs),

    /// Print JSON Schema for registry validation
    Schema,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// Directory holding the pre-generated simulation dataset
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory for per-run and summary result files
    #[arg(short, long, default_value = "out")]
    pub output_dir: PathBuf,

    /// Prompt file overriding the built-in prompt
    #[arg(short, long)]
    pub prompt_file: Option<PathBuf>,

    /// Path to the model registry
    #[arg(long, default_value = "models.yaml")]
    pub registry: PathBuf,

    /// Model slugs to benchmark (comma-separated, see registry)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub models: Vec<String>,

    /// Repetitions per model
    #[arg(long, default_value_t = 1)]
    pub runs: u32,

    /// Cases dispatched concurrently per batch
    #[arg(long, default_value_t = 1)]
    pub batch_size: usize,

    /// Only benchmark the first N cases
    #[arg(long)]
    pub subset: Option<usize>,

    /// Override max retry attempts per request
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Override backoff base delay in seconds
    #[arg(long)]
    pub base_delay: Option<f64>,

    /// Re-run and overwrite existing per-run result files
    #[arg(long)]
    pub overwrite: bool,

    /// Completion token limit per request
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Default Anthropic thinking budget (per-model registry values win)
    #[arg(long, default_value_t = 0)]
    pub thinking_budget: u32,

    /// Override base_url for OpenAI-compatible endpoints (e.g. OpenRouter)
    #[arg(long)]
    pub openai_base_url: Option<String>,

    /// API key for that endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Show plan without executing
    #[arg(long)]
    pub dry_run: bool,
}
