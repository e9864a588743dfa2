// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::PersuadeError;
use crate::infra::paths;
use crate::provider::ProviderEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    #[serde(default)]
    pub outcome: OutcomeConfig,

    /// Optional full catalog override. Empty means the built-in catalog.
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Length of one retry-interval unit, in milliseconds.
    pub tick_unit_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { tick_unit_ms: 1000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeConfig {
    /// Per-iteration probability that the provider concedes.
    pub success_rate: f64,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self { success_rate: 0.7 }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when no
    /// config.toml exists.
    pub fn load() -> Result<Self, PersuadeError> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, PersuadeError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| PersuadeError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), PersuadeError> {
        if !(0.0..=1.0).contains(&self.outcome.success_rate) {
            return Err(PersuadeError::Config(format!(
                "outcome.success_rate must be between 0.0 and 1.0, got {}",
                self.outcome.success_rate
            )));
        }
        if self.scheduler.tick_unit_ms == 0 {
            return Err(PersuadeError::Config(
                "scheduler.tick_unit_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
