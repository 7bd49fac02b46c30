//! Query cache handlers

use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, SuccessResponse};
use crate::domain::CacheStats;
use crate::domain::DomainError;

/// GET /api/cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> Result<Json<CacheStats>, ApiError> {
    let agent = state.agent()?;

    Ok(Json(agent.cache().stats().await))
}

/// POST /api/cache/clear
pub async fn clear_cache(State(state): State<AppState>) -> Result<Json<SuccessResponse>, ApiError> {
    let agent = state.agent()?;

    agent.cache().clear().await.map_err(DomainError::from)?;
    info!("Query cache cleared via API");

    Ok(Json(SuccessResponse { success: true }))
}
