mod anthropic;
mod openai;

pub use anthropic::AnthropicAdapter;
pub use openai::OpenAiAdapter;

use crate::config::{ModelEntry, Provider};
use crate::error::{AdapterError, ConfigError};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Shared per-request limits resolved from config and CLI flags
#[derive(Debug, Clone)]
pub struct AdapterOptions {
    pub max_tokens: u32,
    pub timeout: Duration,
    pub thinking_budget: u32,
    pub openai_base_url: Option<String>,
    pub openai_api_key: Option<String>,
}

/// A vision-capable inference endpoint: one still image plus a prompt in,
/// free-form response text out.
#[async_trait]
pub trait Adapter: Send + Sync {
    async fn request(&self, image: &Path, prompt: &str) -> Result<String, AdapterError>;
}

/// Build the adapter for a registry entry.
///
/// Resolved once at startup, before any network activity, so unknown
/// providers and missing keys abort the invocation up front.
pub fn create_adapter(
    slug: &str,
    entry: &ModelEntry,
    opts: &AdapterOptions,
) -> Result<Arc<dyn Adapter>, ConfigError> {
    let model = entry.model.clone().unwrap_or_else(|| slug.to_string());

    match entry.provider {
        Provider::OpenAi => {
            let api_key = opts
                .openai_api_key
                .clone()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .ok_or(ConfigError::MissingApiKey("OPENAI_API_KEY"))?;
            Ok(Arc::new(OpenAiAdapter::new(
                model,
                api_key,
                opts.openai_base_url.clone(),
                entry.reasoning_effort.clone(),
                opts,
            )?))
        }
        Provider::Anthropic => {
            let api_key = std::env::var("ANTHROPIC_API_KEY")
                .map_err(|_| ConfigError::MissingApiKey("ANTHROPIC_API_KEY"))?;
            let thinking_budget = entry.thinking_budget.unwrap_or(opts.thinking_budget);
            Ok(Arc::new(AnthropicAdapter::new(
                model,
                api_key,
                thinking_budget,
                opts,
            )?))
        }
    }
}

/// Keep provider error bodies readable in logs
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 300;
    if body.chars().count() <= MAX_CHARS {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}
