//! ragchat
//!
//! A retrieval-augmented chatbot with a semantic query cache:
//! - Knowledge base built from a directory of text and Markdown documents
//! - OpenAI chat completions and embeddings
//! - Cache that answers paraphrased questions from earlier responses
//! - HTTP API and interactive terminal chat

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use domain::{EmbeddingProvider, LlmProvider};
use infrastructure::{
    embedding::OpenAiEmbeddingProvider,
    llm::{HttpClient, OpenAiProvider},
    services::{ChatAgentService, ChatAgentSettings, KnowledgeBaseService, QueryCacheService},
};
use tracing::info;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(120);

fn create_embedding_provider(
    config: &AppConfig,
    http_client: HttpClient,
    api_key: &str,
) -> Arc<dyn EmbeddingProvider> {
    Arc::new(OpenAiEmbeddingProvider::with_base_url(
        http_client,
        api_key,
        &config.llm.base_url,
    ))
}

/// Build the chat agent: open both indexes, load or build the knowledge base
/// and wire the cache in front of the model
pub async fn create_chat_agent(config: &AppConfig) -> anyhow::Result<ChatAgentService> {
    config.validate()?;
    let api_key = config.require_api_key()?;

    let http_client = HttpClient::with_timeout(PROVIDER_TIMEOUT)?;

    let embeddings = create_embedding_provider(config, http_client.clone(), api_key);
    let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::with_base_url(
        http_client,
        api_key,
        &config.llm.base_url,
    ));

    let knowledge_base =
        KnowledgeBaseService::open(embeddings.clone(), config.knowledge_base.clone()).await?;
    let chunks = knowledge_base.initialize().await?;
    info!(chunks, "Knowledge base ready");

    let cache = QueryCacheService::open(embeddings, config.cache.clone()).await?;

    let settings = ChatAgentSettings {
        model: config.llm.model.clone(),
        temperature: config.llm.temperature,
    };

    Ok(ChatAgentService::new(
        llm,
        Arc::new(knowledge_base),
        Arc::new(cache),
        settings,
    ))
}

/// Open the persistent query cache on its own, for maintenance commands.
///
/// Stats and clear never call the embedding provider, so a missing API key
/// is tolerated here.
pub async fn open_query_cache(config: &AppConfig) -> anyhow::Result<QueryCacheService> {
    let api_key = config.openai_api_key.as_deref().unwrap_or_default();
    let embeddings = create_embedding_provider(config, HttpClient::new(), api_key);

    Ok(QueryCacheService::open(embeddings, config.cache.clone()).await?)
}
