// src/main.rs — persuade entry point

use std::sync::Arc;

use clap::Parser;

use persuade::cli::{catalog, keys, run, Cli, Commands};
use persuade::infra::config::Config;
use persuade::infra::logger;
use persuade::provider::ProviderCatalog;

#[tokio::main]
async fn main() {
    // Initialize logging (respects RUST_LOG)
    logger::init_logging("info");

    if let Err(e) = dispatch().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn dispatch() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load config (falls back to defaults if no config.toml)
    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };

    let catalog = Arc::new(if config.providers.is_empty() {
        ProviderCatalog::builtin()
    } else {
        ProviderCatalog::from_entries(config.providers.clone())
    });

    match cli.command {
        Commands::Run { file } => run::run_sessions(&file, &config, catalog).await,
        Commands::Providers => {
            catalog::show_providers(&catalog);
            Ok(())
        }
        Commands::Estimate {
            provider,
            iterations,
        } => catalog::show_estimate(&catalog, &provider, iterations),
        Commands::Keys { action } => keys::run_keys(&catalog, action),
    }
}
