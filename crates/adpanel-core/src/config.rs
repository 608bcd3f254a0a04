//! Engine configuration models.
//!
//! Loaded from `~/.config/adpanel/config.toml` by the infrastructure layer.
//! Every field has a default so a missing or partial file is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};

const DEFAULT_CONCURRENCY: usize = 8;
const DEFAULT_REACTION_TIMEOUT_SECS: u64 = 60;
const DEFAULT_SEED: u64 = 42;

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_reaction_timeout_secs() -> Option<u64> {
    Some(DEFAULT_REACTION_TIMEOUT_SECS)
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Which capability implementation backs panel generation and evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityMode {
    /// Seeded offline simulation
    #[default]
    Simulated,
    /// Remote worker API
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityConfig {
    #[serde(default)]
    pub mode: CapabilityMode,
    /// Worker base URL, required for `http` mode
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Seed for the simulated capability
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for CapabilityConfig {
    fn default() -> Self {
        Self {
            mode: CapabilityMode::default(),
            base_url: None,
            api_key: None,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum reaction requests in flight
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Per-reaction timeout; `None` waits indefinitely
    #[serde(default = "default_reaction_timeout_secs")]
    pub reaction_timeout_secs: Option<u64>,
    #[serde(default)]
    pub capability: CapabilityConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            reaction_timeout_secs: default_reaction_timeout_secs(),
            capability: CapabilityConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn reaction_timeout(&self) -> Option<Duration> {
        self.reaction_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(PanelError::config("concurrency must be at least 1"));
        }
        if self.capability.mode == CapabilityMode::Http
            && self.capability.base_url.as_deref().is_none_or(str::is_empty)
        {
            return Err(PanelError::config("capability.base_url is required in http mode"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str("concurrency = 4").unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.reaction_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.capability.mode, CapabilityMode::Simulated);
        assert_eq!(config.capability.seed, 42);
    }

    #[test]
    fn test_http_mode_requires_base_url() {
        let mut config = EngineConfig::default();
        config.capability.mode = CapabilityMode::Http;
        assert!(config.validate().is_err());
        config.capability.base_url = Some("https://worker.example".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = EngineConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
