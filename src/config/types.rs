use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::defaults::*;

/// Model registry plus the shared retry and request settings, loaded once
/// at startup and threaded through as an immutable value.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Registry {
    #[serde(default)]
    pub models: HashMap<String, ModelEntry>,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub request: RequestConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ModelEntry {
    pub provider: Provider,

    /// Provider-side model id; defaults to the registry slug
    #[serde(default)]
    pub model: Option<String>,

    /// OpenAI reasoning effort; ignored by Anthropic models
    #[serde(default)]
    pub reasoning_effort: Option<String>,

    /// Anthropic extended-thinking token budget; ignored by OpenAI models
    #[serde(default)]
    pub thinking_budget: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Anthropic,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::OpenAi => write!(f, "openai"),
            Provider::Anthropic => write!(f, "anthropic"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: f64,

    /// Pause between completed runs of the same model
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_secs: default_base_delay_secs(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl RetryConfig {
    /// Delay before the retry that follows the given zero-indexed attempt
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_secs_f64(self.base_delay_secs * 2f64.powi(attempt as i32))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RequestConfig {
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
