//! Application state shared by handlers

use std::sync::Arc;

use crate::domain::DomainError;
use crate::infrastructure::services::{ChatAgentService, Chatbot};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub chatbot: Chatbot,
}

impl AppState {
    pub fn new(chatbot: Chatbot) -> Self {
        Self { chatbot }
    }

    /// The chat agent, or a not-ready error while it is still being built
    pub fn agent(&self) -> Result<Arc<ChatAgentService>, DomainError> {
        self.chatbot.agent()
    }
}
