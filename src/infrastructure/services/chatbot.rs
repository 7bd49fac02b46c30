//! Readiness handle around the chat agent

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::domain::DomainError;

use super::ChatAgentService;

/// Shared handle that starts empty and is filled once the agent is built.
///
/// Cloning shares the same slot, so a server can hand out clones before the
/// knowledge base has finished loading.
#[derive(Debug, Clone, Default)]
pub struct Chatbot {
    agent: Arc<OnceCell<Arc<ChatAgentService>>>,
}

impl Chatbot {
    /// A handle with no agent yet
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that is ready immediately
    pub fn ready(agent: Arc<ChatAgentService>) -> Self {
        Self {
            agent: Arc::new(OnceCell::new_with(Some(agent))),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.agent.initialized()
    }

    /// Install the agent; a second call is rejected
    pub fn initialize(&self, agent: Arc<ChatAgentService>) -> Result<(), DomainError> {
        self.agent
            .set(agent)
            .map_err(|_| DomainError::internal("Chatbot is already initialized"))
    }

    pub fn agent(&self) -> Result<Arc<ChatAgentService>, DomainError> {
        self.agent
            .get()
            .cloned()
            .ok_or_else(|| DomainError::not_ready("Chatbot not initialized"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::knowledge_base::StaticRetriever;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::query_cache::{CacheEntry, QueryCacheConfig};
    use crate::infrastructure::services::{ChatAgentSettings, QueryCacheService};
    use crate::infrastructure::vector_index::InMemoryVectorIndex;

    fn agent() -> Arc<ChatAgentService> {
        let cache = QueryCacheService::new(
            Arc::new(InMemoryVectorIndex::<CacheEntry>::new()),
            Arc::new(MockEmbeddingProvider::new("mock", 4)),
            QueryCacheConfig::default(),
        )
        .unwrap();

        Arc::new(ChatAgentService::new(
            Arc::new(MockLlmProvider::new("mock")),
            Arc::new(StaticRetriever::default()),
            Arc::new(cache),
            ChatAgentSettings::default(),
        ))
    }

    #[test]
    fn test_not_ready_until_initialized() {
        let chatbot = Chatbot::new();

        assert!(!chatbot.is_ready());
        assert!(matches!(chatbot.agent(), Err(DomainError::NotReady { .. })));
    }

    #[test]
    fn test_initialize_is_visible_through_clones() {
        let chatbot = Chatbot::new();
        let shared = chatbot.clone();

        chatbot.initialize(agent()).unwrap();

        assert!(shared.is_ready());
        assert!(shared.agent().is_ok());
    }

    #[test]
    fn test_second_initialize_rejected() {
        let chatbot = Chatbot::ready(agent());

        assert!(chatbot.initialize(agent()).is_err());
    }
}
