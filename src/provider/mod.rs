// src/provider/mod.rs — Provider catalog

pub mod credentials;

use serde::{Deserialize, Serialize};

use crate::infra::errors::PersuadeError;

/// One provider row: display name, supported models, flat per-token rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub models: Vec<String>,
    pub cost_per_token: f64,
}

/// Catalog entry as it appears in config.toml `[[providers]]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub key: String,
    pub name: String,
    pub models: Vec<String>,
    pub cost_per_token: f64,
}

/// Static table of supported AI providers. Supplied at startup, read-only
/// afterwards; key order is preserved for display.
#[derive(Debug, Clone)]
pub struct ProviderCatalog {
    entries: Vec<(String, ProviderInfo)>,
}

impl ProviderCatalog {
    /// The built-in provider table.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                entry("openai", "OpenAI", &["gpt-4", "gpt-4-turbo", "gpt-3.5-turbo"], 0.00003),
                entry(
                    "anthropic",
                    "Anthropic",
                    &["claude-3-opus", "claude-3-sonnet", "claude-3-haiku"],
                    0.000015,
                ),
                entry("google", "Google", &["gemini-pro", "gemini-pro-vision"], 0.000125),
                entry("cohere", "Cohere", &["command", "command-light"], 0.000015),
                entry(
                    "huggingface",
                    "Hugging Face",
                    &[
                        "meta-llama/Llama-2-70b-chat-hf",
                        "mistralai/Mixtral-8x7B-Instruct-v0.1",
                    ],
                    0.0000008,
                ),
            ],
        }
    }

    /// Build a catalog from config entries, preserving their order.
    pub fn from_entries(entries: Vec<ProviderEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| {
                    (
                        e.key,
                        ProviderInfo {
                            name: e.name,
                            models: e.models,
                            cost_per_token: e.cost_per_token,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ProviderInfo> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, info)| info)
    }

    pub fn require(&self, key: &str) -> Result<&ProviderInfo, PersuadeError> {
        self.get(key)
            .ok_or_else(|| PersuadeError::UnknownProvider(key.to_string()))
    }

    /// Check that `model` is one of `key`'s listed models.
    pub fn require_model(&self, key: &str, model: &str) -> Result<(), PersuadeError> {
        let info = self.require(key)?;
        if info.models.iter().any(|m| m == model) {
            Ok(())
        } else {
            Err(PersuadeError::UnknownModel {
                provider: key.to_string(),
                model: model.to_string(),
            })
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProviderInfo)> {
        self.entries.iter().map(|(key, info)| (key.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry(key: &str, name: &str, models: &[&str], cost_per_token: f64) -> (String, ProviderInfo) {
    (
        key.to_string(),
        ProviderInfo {
            name: name.to_string(),
            models: models.iter().map(|m| m.to_string()).collect(),
            cost_per_token,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_contents() {
        let catalog = ProviderCatalog::builtin();
        assert_eq!(catalog.len(), 5);

        let openai = catalog.get("openai").unwrap();
        assert_eq!(openai.name, "OpenAI");
        assert_eq!(openai.models.len(), 3);
        assert!((openai.cost_per_token - 0.00003).abs() < 1e-12);

        let hf = catalog.get("huggingface").unwrap();
        assert!((hf.cost_per_token - 0.0000008).abs() < 1e-12);
    }

    #[test]
    fn test_builtin_catalog_order() {
        let catalog = ProviderCatalog::builtin();
        let keys: Vec<&str> = catalog.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["openai", "anthropic", "google", "cohere", "huggingface"]);
    }

    #[test]
    fn test_require_unknown_provider() {
        let catalog = ProviderCatalog::builtin();
        let err = catalog.require("mystery").unwrap_err();
        assert!(matches!(err, PersuadeError::UnknownProvider(_)));
        assert!(err.is_rejection());
    }

    #[test]
    fn test_require_model() {
        let catalog = ProviderCatalog::builtin();
        assert!(catalog.require_model("anthropic", "claude-3-haiku").is_ok());

        let err = catalog.require_model("anthropic", "gpt-4").unwrap_err();
        assert!(matches!(err, PersuadeError::UnknownModel { .. }));
    }

    #[test]
    fn test_from_entries_preserves_order() {
        let catalog = ProviderCatalog::from_entries(vec![
            ProviderEntry {
                key: "b".into(),
                name: "B".into(),
                models: vec!["b-1".into()],
                cost_per_token: 0.1,
            },
            ProviderEntry {
                key: "a".into(),
                name: "A".into(),
                models: vec!["a-1".into()],
                cost_per_token: 0.2,
            },
        ]);
        let keys: Vec<&str> = catalog.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
