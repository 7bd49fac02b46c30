use clap::Parser;
use ragchat::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Chat => cli::chat::run().await,
        Command::Cache { action } => cli::cache::run(action).await,
    }
}
