// src/cli/mod.rs — CLI definition (clap derive)

pub mod catalog;
pub mod keys;
pub mod run;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "persuade", about = "AI stance-training session engine", version)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run training sessions defined in a TOML file until they finish
    Run {
        /// Path to a TOML file with [[session]] entries
        file: String,
    },
    /// List the provider catalog
    Providers,
    /// Print the projected cost for a provider and iteration count
    Estimate {
        /// Provider key (e.g. openai)
        provider: String,
        /// Planned iteration count
        iterations: u32,
    },
    /// Manage stored provider API keys
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum KeysAction {
    /// Store an API key for a provider
    Set {
        /// Provider key (e.g. openai)
        provider: String,
        /// The API key to store
        key: String,
    },
    /// List providers with stored keys (values are never printed)
    List,
}
