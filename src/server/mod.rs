mod cors;
pub mod handlers;
mod types;

pub use cors::{cors_layer, origin_allowed, with_cors};
pub use handlers::AppState;
pub use types::*;

use crate::{Result, assistant::Assistant, config::Config, config::ServerConfig};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

/// `/health` and `/chat`, the long-running service surface.
pub fn service_router(state: AppState, server: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat));
    with_cors(router, &server.cors, server.cors.service).with_state(state)
}

/// `/api/chat` and `/api/analyze-image`, mounted as per-request functions.
pub fn functions_router(state: AppState, server: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/api/chat", post(handlers::chat))
        .route("/api/analyze-image", post(handlers::analyze_image));
    with_cors(router, &server.cors, server.cors.functions).with_state(state)
}

pub fn router(state: AppState, server: &ServerConfig) -> Router {
    service_router(state.clone(), server)
        .merge(functions_router(state, server))
        .layer(DefaultBodyLimit::max(server.body_limit_bytes))
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config) -> Result<()> {
    let assistant = Assistant::new(&config.llm)?;
    let app = router(AppState::new(assistant), &config.server);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => info!("Received terminate signal, starting graceful shutdown"),
    }
}
