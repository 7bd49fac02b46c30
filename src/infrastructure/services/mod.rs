//! Infrastructure services

mod chat_agent_service;
mod chatbot;
mod knowledge_base_service;
mod query_cache_service;

pub use chat_agent_service::{ChatAgentService, ChatAgentSettings};
pub use chatbot::Chatbot;
pub use knowledge_base_service::KnowledgeBaseService;
pub use query_cache_service::QueryCacheService;
