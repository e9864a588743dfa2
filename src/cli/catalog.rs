// src/cli/catalog.rs — `providers` and `estimate` subcommands

use crate::core::cost;
use crate::provider::ProviderCatalog;

pub fn show_providers(catalog: &ProviderCatalog) {
    for (key, info) in catalog.iter() {
        println!("{:<12} {:<14} ${:.7}/token", key, info.name, info.cost_per_token);
        for model in &info.models {
            println!("             - {model}");
        }
    }
}

pub fn show_estimate(
    catalog: &ProviderCatalog,
    provider: &str,
    iterations: u32,
) -> anyhow::Result<()> {
    let projected = cost::estimate_cost(catalog, provider, iterations)?;
    let info = catalog.require(provider)?;
    println!("{} x {} iterations: ${:.4}", info.name, iterations, projected);
    Ok(())
}
