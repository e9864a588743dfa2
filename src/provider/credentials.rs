// src/provider/credentials.rs — Provider API key storage
//
// # Security Note
// API keys are stored as plaintext JSON on disk with chmod 600 on Unix. For
// higher security environments, prefer environment variables over persisting
// keys to disk.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::infra::paths;

const CREDENTIALS_FILE: &str = "providers.json";

/// Per-provider API keys, stored at ~/.persuade/credentials/providers.json.
///
/// The iteration engine never reads these — outcomes are synthesized. They
/// exist so a production deployment can hand the right key to an outbound
/// provider call per iteration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(default)]
    keys: HashMap<String, String>,
}

impl ApiKeys {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&credentials_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&credentials_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    pub fn set(&mut self, provider: impl Into<String>, key: impl Into<String>) {
        self.keys.insert(provider.into(), key.into());
    }

    pub fn get(&self, provider: &str) -> Option<&str> {
        self.keys.get(provider).map(String::as_str)
    }

    /// Providers that have a stored key, sorted for display.
    pub fn providers(&self) -> Vec<&str> {
        let mut providers: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        providers.sort_unstable();
        providers
    }
}

fn credentials_path() -> PathBuf {
    paths::credentials_dir().join(CREDENTIALS_FILE)
}
