//! Chat command - interactive terminal conversation

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::LoggingConfig;
use crate::domain::DEFAULT_SESSION;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::services::ChatAgentService;

const BANNER: &str = "\
RAG chatbot with semantic query cache
Commands: quit | exit | reset | history | stats | clear-cache
";

/// A line typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Quit,
    Reset,
    History,
    Stats,
    ClearCache,
    Message(&'a str),
    Empty,
}

impl<'a> ReplCommand<'a> {
    /// Keywords match case-insensitively; anything else is a chat message
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();

        match trimmed.to_lowercase().as_str() {
            "" => Self::Empty,
            "quit" | "exit" => Self::Quit,
            "reset" => Self::Reset,
            "history" => Self::History,
            "stats" => Self::Stats,
            "clear-cache" => Self::ClearCache,
            _ => Self::Message(trimmed),
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config()?;

    // Keep the prompt readable unless RUST_LOG asks for more
    init_logging(&LoggingConfig {
        level: "warn".to_string(),
        format: config.logging.format,
    });

    println!("Initializing chatbot...");
    let agent = crate::create_chat_agent(&config).await?;

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();

    chat_loop(&agent, DEFAULT_SESSION, input, &mut output).await
}

/// Read lines until `quit`/`exit` or end of input, answering each one
pub async fn chat_loop<R, W>(
    agent: &ChatAgentService,
    session_id: &str,
    input: R,
    output: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(BANNER.as_bytes()).await?;
    let mut lines = input.lines();

    loop {
        output.write_all(b"\nYou: ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let text = match ReplCommand::parse(&line) {
            ReplCommand::Empty => continue,
            ReplCommand::Quit => {
                output.write_all(b"Goodbye!\n").await?;
                break;
            }
            ReplCommand::Reset => {
                agent.reset(session_id).await;
                "Conversation history cleared.".to_string()
            }
            ReplCommand::History => agent.history(session_id).await,
            ReplCommand::Stats => serde_json::to_string_pretty(&agent.cache().stats().await)?,
            ReplCommand::ClearCache => match agent.cache().clear().await {
                Ok(()) => "Query cache cleared.".to_string(),
                Err(e) => format!("Failed to clear query cache: {}", e),
            },
            ReplCommand::Message(message) => match agent.chat(session_id, message).await {
                Ok(reply) if reply.cached => format!("Assistant [cached]: {}", reply.content),
                Ok(reply) => format!("Assistant: {}", reply.content),
                Err(e) => format!("Error: {}", e),
            },
        };

        output.write_all(format!("\n{}\n", text).as_bytes()).await?;
    }

    output.flush().await?;
    Ok(())
}
