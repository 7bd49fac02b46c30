//! Chat agent service - cache-first retrieval augmented conversation

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::domain::conversation::{ChatReply, Transcript, NO_HISTORY_MESSAGE, SYSTEM_PROMPT};
use crate::domain::knowledge_base::{retrieve_formatted, Retriever};
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_chat_turn;

use super::QueryCacheService;

/// Model settings used for every generated turn
#[derive(Debug, Clone)]
pub struct ChatAgentSettings {
    pub model: String,
    pub temperature: f32,
}

impl Default for ChatAgentSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
        }
    }
}

type SessionHandle = Arc<Mutex<Transcript>>;

/// Conversational agent answering from the query cache when it can and
/// from the knowledge base plus the model otherwise
#[derive(Debug)]
pub struct ChatAgentService {
    llm: Arc<dyn LlmProvider>,
    retriever: Arc<dyn Retriever>,
    cache: Arc<QueryCacheService>,
    settings: ChatAgentSettings,
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl ChatAgentService {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        retriever: Arc<dyn Retriever>,
        cache: Arc<QueryCacheService>,
        settings: ChatAgentSettings,
    ) -> Self {
        Self {
            llm,
            retriever,
            cache,
            settings,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<QueryCacheService> {
        &self.cache
    }

    pub fn settings(&self) -> &ChatAgentSettings {
        &self.settings
    }

    async fn session(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(session_id) {
            return handle.clone();
        }

        self.sessions
            .write()
            .await
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    /// Answer one message within a session.
    ///
    /// Turns of the same session run one at a time. A failed generation
    /// leaves both the transcript and the cache untouched.
    pub async fn chat(&self, session_id: &str, message: &str) -> Result<ChatReply, DomainError> {
        if message.trim().is_empty() {
            return Err(DomainError::validation("Message cannot be empty"));
        }

        let session = self.session(session_id).await;
        let mut transcript = session.lock().await;

        if let Some(cached) = self.cache.lookup(message, session_id).await {
            transcript.record_turn(message, cached.clone());
            record_chat_turn("cache");
            debug!(session_id = %session_id, "Answered from query cache");

            return Ok(ChatReply::cached(cached));
        }

        let context = retrieve_formatted(self.retriever.as_ref(), message).await;

        let request = LlmRequest::builder()
            .system(SYSTEM_PROMPT)
            .system(context)
            .messages(transcript.messages().iter().cloned())
            .user(message)
            .temperature(self.settings.temperature)
            .build();

        let response = self.llm.chat(&self.settings.model, request).await?;
        let content = response.content().to_string();

        transcript.record_turn(message, content.clone());
        drop(transcript);

        let metadata = HashMap::from([(
            "model".to_string(),
            Value::from(self.settings.model.clone()),
        )]);
        self.cache
            .store(message, &content, session_id, Some(metadata))
            .await;

        record_chat_turn("generated");
        debug!(
            session_id = %session_id,
            provider = self.llm.provider_name(),
            "Generated response"
        );

        Ok(ChatReply::generated(content))
    }

    /// Forget a session and its transcript; the query cache is kept
    pub async fn reset(&self, session_id: &str) {
        let handle = self.sessions.write().await.remove(session_id);

        // A turn still holding the handle finishes against the detached transcript
        if let Some(handle) = handle {
            handle.lock().await.clear();
        }

        info!(session_id = %session_id, "Conversation history cleared");
    }

    /// The session transcript rendered one message per line
    pub async fn history(&self, session_id: &str) -> String {
        let handle = self.sessions.read().await.get(session_id).cloned();

        let Some(handle) = handle else {
            return NO_HISTORY_MESSAGE.to_string();
        };

        let transcript = handle.lock().await;

        if transcript.is_empty() {
            NO_HISTORY_MESSAGE.to_string()
        } else {
            transcript.render()
        }
    }
}
