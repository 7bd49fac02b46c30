//! Request and response bodies of the chat endpoints

use serde::{Deserialize, Serialize};

use crate::domain::conversation::DEFAULT_SESSION;
use crate::domain::ChatReply;

fn default_session() -> String {
    DEFAULT_SESSION.to_string()
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "default_session")]
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub cached: bool,
}

impl From<ChatReply> for ChatResponse {
    fn from(reply: ChatReply) -> Self {
        Self {
            success: true,
            response: reply.content,
            cached: reply.cached,
        }
    }
}

/// Body of `POST /api/reset`; also the query of `GET /api/history`
#[derive(Debug, Clone, Deserialize)]
pub struct SessionParams {
    #[serde(default = "default_session")]
    pub session_id: String,
}

impl Default for SessionParams {
    fn default() -> Self {
        Self {
            session_id: default_session(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub history: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}
