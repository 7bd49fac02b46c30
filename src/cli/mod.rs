//! CLI module for ragchat
//!
//! - `serve`: HTTP API
//! - `chat`: interactive terminal conversation
//! - `cache`: query cache maintenance

pub mod cache;
pub mod chat;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// Retrieval-augmented chatbot with a semantic query cache
#[derive(Parser)]
#[command(name = "ragchat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,

    /// Chat with the assistant in the terminal
    Chat,

    /// Inspect or clear the query cache
    Cache {
        #[command(subcommand)]
        action: cache::CacheCommand,
    },
}

/// Read layered configuration and reject invalid values up front
pub(crate) fn load_config() -> anyhow::Result<AppConfig> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["ragchat", "serve"]).unwrap();
        assert!(matches!(cli.command, Command::Serve));

        let cli = Cli::try_parse_from(["ragchat", "cache", "clear"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Cache {
                action: cache::CacheCommand::Clear
            }
        ));
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["ragchat"]).is_err());
    }
}
