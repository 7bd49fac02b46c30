//! Chat, reset and history handlers

use axum::extract::{Query, State};
use tracing::{error, info};

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, ChatRequest, ChatResponse, HistoryResponse, Json, ResetResponse, SessionParams,
};

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let agent = state.agent()?;

    let message = request
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("No message provided"))?;

    info!(session_id = %request.session_id, "Processing chat message");

    let reply = agent
        .chat(&request.session_id, &message)
        .await
        .inspect_err(|e| {
            error!(session_id = %request.session_id, error = %e, "Chat turn failed");
        })?;

    Ok(Json(ChatResponse::from(reply)))
}

/// POST /api/reset
///
/// An absent body resets the default session.
pub async fn reset(
    State(state): State<AppState>,
    body: Option<Json<SessionParams>>,
) -> Result<Json<ResetResponse>, ApiError> {
    let params = body.map(|Json(p)| p).unwrap_or_default();
    let agent = state.agent()?;

    agent.reset(&params.session_id).await;

    Ok(Json(ResetResponse {
        success: true,
        message: "Conversation history cleared".to_string(),
    }))
}

/// GET /api/history
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<SessionParams>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let agent = state.agent()?;

    Ok(Json(HistoryResponse {
        success: true,
        history: agent.history(&params.session_id).await,
    }))
}
