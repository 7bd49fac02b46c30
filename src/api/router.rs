use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::chat;
use super::health;
use super::middleware::logging_middleware;
use super::state::AppState;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Create the full router with application state
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let mut router = Router::new()
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .nest("/api", chat::create_chat_router())
        .with_state(state);

    if let Some(metrics) = metrics {
        router = router.merge(create_metrics_router(metrics));
    }

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::knowledge_base::{DocumentChunk, StaticRetriever};
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::query_cache::{CacheEntry, QueryCacheConfig};
    use crate::infrastructure::services::{
        ChatAgentService, ChatAgentSettings, Chatbot, QueryCacheService,
    };
    use crate::infrastructure::vector_index::InMemoryVectorIndex;

    fn ready_state(llm: MockLlmProvider) -> AppState {
        let cache = QueryCacheService::new(
            Arc::new(InMemoryVectorIndex::<CacheEntry>::new()),
            Arc::new(MockEmbeddingProvider::new("mock", 8)),
            QueryCacheConfig::default(),
        )
        .unwrap();

        let agent = ChatAgentService::new(
            Arc::new(llm),
            Arc::new(StaticRetriever::new(vec![DocumentChunk::new(
                "Rust is fast.",
                0,
            )])),
            Arc::new(cache),
            ChatAgentSettings::default(),
        );

        AppState::new(Chatbot::ready(Arc::new(agent)))
    }

    fn app() -> Router {
        create_router(
            ready_state(MockLlmProvider::new("mock").with_reply("Rust is a language.")),
            None,
        )
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_readiness() {
        let (status, body) = send(&app(), Method::GET, "/api/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["chatbot_initialized"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_not_ready_returns_503() {
        let app = create_router(AppState::default(), None);

        let (status, body) = send(&app, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chatbot_initialized"], false);

        let (status, _) = send(&app, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/chat",
            Some(json!({"message": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["type"], "service_unavailable_error");

        let (status, _) = send(&app, Method::GET, "/api/cache/stats", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_live_and_ready() {
        let app = app();

        let (status, _) = send(&app, Method::GET, "/live", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/ready", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn test_chat_then_cached_reply() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/chat",
            Some(json!({"message": "What is Rust?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "response": "Rust is a language.", "cached": false})
        );

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/chat",
            Some(json!({"message": "What is Rust?", "session_id": "other"})),
        )
        .await;
        assert_eq!(body["cached"], true);
    }

    #[tokio::test]
    async fn test_empty_message_is_bad_request() {
        let app = app();

        for payload in [json!({"message": "   "}), json!({})] {
            let (status, body) = send(&app, Method::POST, "/api/chat", Some(payload)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"]["type"], "invalid_request_error");
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_provider_failure_is_bad_gateway() {
        let app = create_router(
            ready_state(MockLlmProvider::new("mock").with_error("rate limited")),
            None,
        );

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/chat",
            Some(json!({"message": "What is Rust?"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["type"], "upstream_error");
    }

    #[tokio::test]
    async fn test_history_and_reset() {
        let app = app();

        send(
            &app,
            Method::POST,
            "/api/chat",
            Some(json!({"message": "What is Rust?", "session_id": "s1"})),
        )
        .await;

        let (status, body) = send(&app, Method::GET, "/api/history?session_id=s1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["history"],
            "User: What is Rust?\nAssistant: Rust is a language."
        );

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/reset",
            Some(json!({"session_id": "s1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "Conversation history cleared"})
        );

        let (_, body) = send(&app, Method::GET, "/api/history?session_id=s1", None).await;
        assert_eq!(body["history"], "No conversation history available.");
    }

    #[tokio::test]
    async fn test_reset_without_body_uses_default_session() {
        let app = app();

        send(
            &app,
            Method::POST,
            "/api/chat",
            Some(json!({"message": "What is Rust?"})),
        )
        .await;

        let (status, _) = send(&app, Method::POST, "/api/reset", None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/api/history", None).await;
        assert_eq!(body["history"], "No conversation history available.");
    }

    #[tokio::test]
    async fn test_cache_stats_and_clear() {
        let app = app();

        send(
            &app,
            Method::POST,
            "/api/chat",
            Some(json!({"message": "What is Rust?"})),
        )
        .await;

        let (status, body) = send(&app, Method::GET, "/api/cache/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enabled"], true);
        assert_eq!(body["total_entries"], 1);
        assert_eq!(body["ttl_hours"], 24.0);

        let (status, body) = send(&app, Method::POST, "/api/cache/clear", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));

        let (_, body) = send(&app, Method::GET, "/api/cache/stats", None).await;
        assert_eq!(body["total_entries"], 0);
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let request = Request::builder()
            .uri("/live")
            .header("x-request-id", "req-42")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-42");
    }
}
