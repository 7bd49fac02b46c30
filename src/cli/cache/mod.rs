//! Cache command - query cache maintenance without starting the agent

use clap::Subcommand;

use crate::domain::DomainError;
use crate::infrastructure::logging::init_logging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum CacheCommand {
    /// Print entry count, threshold and TTL as JSON
    Stats,

    /// Remove every cached entry
    Clear,
}

pub async fn run(action: CacheCommand) -> anyhow::Result<()> {
    let config = super::load_config()?;
    init_logging(&config.logging);

    let cache = crate::open_query_cache(&config).await?;

    match action {
        CacheCommand::Stats => {
            println!("{}", serde_json::to_string_pretty(&cache.stats().await)?);
        }
        CacheCommand::Clear => {
            cache.clear().await.map_err(DomainError::from)?;
            println!("Query cache cleared");
        }
    }

    Ok(())
}
