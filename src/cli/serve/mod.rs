//! Serve command - runs the HTTP API

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::api::{create_router, AppState};
use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;
use crate::infrastructure::observability::init_metrics;
use crate::infrastructure::services::Chatbot;

/// Bind first, then build the chatbot in the background.
///
/// Until initialization finishes the chat endpoints answer 503 while health
/// and liveness probes already respond.
pub async fn run() -> anyhow::Result<()> {
    let config = super::load_config()?;
    init_logging(&config.logging);

    let metrics = init_metrics(&config.metrics);
    let chatbot = Chatbot::new();
    let app = create_router(AppState::new(chatbot.clone()), metrics);

    let addr = build_socket_addr(&config)?;
    let listener = TcpListener::bind(addr).await?;
    info!("Starting server on {}", addr);

    tokio::spawn(initialize_chatbot(config, chatbot));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn initialize_chatbot(config: AppConfig, chatbot: Chatbot) {
    info!("Initializing chatbot");

    match crate::create_chat_agent(&config).await {
        Ok(agent) => match chatbot.initialize(Arc::new(agent)) {
            Ok(()) => info!("Chatbot initialized"),
            Err(e) => error!(error = %e, "Failed to install chatbot"),
        },
        Err(e) => error!(error = %e, "Failed to initialize chatbot"),
    }
}

fn build_socket_addr(config: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    )))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
