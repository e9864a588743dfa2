// src/cli/keys.rs — `keys` subcommand

use crate::cli::KeysAction;
use crate::provider::credentials::ApiKeys;
use crate::provider::ProviderCatalog;

pub fn run_keys(catalog: &ProviderCatalog, action: KeysAction) -> anyhow::Result<()> {
    match action {
        KeysAction::Set { provider, key } => {
            if catalog.get(&provider).is_none() {
                anyhow::bail!("Unknown provider '{provider}'. See `persuade providers`.");
            }
            let mut keys = ApiKeys::load()?;
            keys.set(&provider, key);
            keys.save()?;
            println!("Stored API key for {provider}.");
            Ok(())
        }
        KeysAction::List => {
            let keys = ApiKeys::load()?;
            let providers = keys.providers();
            if providers.is_empty() {
                println!("No API keys stored. Use `persuade keys set <provider> <key>`.");
            } else {
                for provider in providers {
                    println!("{provider}");
                }
            }
            Ok(())
        }
    }
}
