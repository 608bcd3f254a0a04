//! Engine configuration storage.
//!
//! Reads `config.toml` into [`EngineConfig`] and layers environment
//! overrides on top.

use std::fs;
use std::path::{Path, PathBuf};

use adpanel_core::config::{CapabilityMode, EngineConfig};
use adpanel_core::error::{PanelError, Result};

/// Worker base URL; setting it also switches the capability to `http`.
pub const ENV_API_BASE: &str = "ADPANEL_API_BASE";
pub const ENV_API_KEY: &str = "ADPANEL_API_KEY";
pub const ENV_CONCURRENCY: &str = "ADPANEL_CONCURRENCY";

pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a new config storage handle.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the config file (usually `config.toml`)
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the config file.
    ///
    /// # Returns
    ///
    /// - `Ok(EngineConfig)`: Parsed config, or defaults when the file is
    ///   missing or empty
    /// - `Err(PanelError::Config)`: The file exists but is not valid TOML
    pub fn load(&self) -> Result<EngineConfig> {
        if !self.path.exists() {
            tracing::debug!("[ConfigStorage] {} not found, using defaults", self.path.display());
            return Ok(EngineConfig::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(EngineConfig::default());
        }

        toml::from_str(&content)
            .map_err(|e| PanelError::config(format!("{}: {}", self.path.display(), e)))
    }

    /// Loads the config file and applies process environment overrides.
    pub fn load_with_env(&self) -> Result<EngineConfig> {
        let config = self.load()?;
        apply_env(config, |name| std::env::var(name).ok())
    }
}

/// Applies environment overrides read through `lookup`.
///
/// Empty values are ignored. The result is validated.
pub fn apply_env<F>(mut config: EngineConfig, lookup: F) -> Result<EngineConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(base_url) = var(ENV_API_BASE) {
        tracing::debug!("[ConfigStorage] {} set, using http capability", ENV_API_BASE);
        config.capability.mode = CapabilityMode::Http;
        config.capability.base_url = Some(base_url);
    }
    if let Some(api_key) = var(ENV_API_KEY) {
        config.capability.api_key = Some(api_key);
    }
    if let Some(concurrency) = var(ENV_CONCURRENCY) {
        config.concurrency = concurrency.parse().map_err(|_| {
            PanelError::config(format!("{} must be a positive integer, got '{}'", ENV_CONCURRENCY, concurrency))
        })?;
    }

    config.validate()?;
    Ok(config)
}
