//! Chatbot endpoints mounted under `/api`

pub mod cache;
pub mod conversation;

use axum::{
    routing::{get, post},
    Router,
};

use super::health;
use super::state::AppState;

pub fn create_chat_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/chat", post(conversation::chat))
        .route("/reset", post(conversation::reset))
        .route("/history", get(conversation::history))
        .route("/cache/stats", get(cache::cache_stats))
        .route("/cache/clear", post(cache::clear_cache))
}
