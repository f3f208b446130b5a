mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use std::path::Path;

impl Registry {
    /// Load the model registry from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let registry: Registry = serde_yaml::from_str(&content)?;
        Ok(registry)
    }

    /// Validate the registry
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::NoModels);
        }
        Ok(())
    }

    /// Resolve a requested slug, failing fast on unknown models
    pub fn entry(&self, slug: &str) -> Result<&ModelEntry, ConfigError> {
        self.models
            .get(slug)
            .ok_or_else(|| ConfigError::UnknownModel(slug.to_string()))
    }
}
