//! HTTP server implementation for the jsonstore API

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use std::{io, net::SocketAddr, sync::Arc};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::api_handlers;
use jsonstore_core::{
    core::{AppState, ConfiguredAppState},
    log_info, log_warn,
    storage::StorageImpl,
};

/// Errors that stop the HTTP server
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested
        addr: SocketAddr,
        /// Underlying socket error
        source: io::Error,
    },

    /// The accept loop failed
    #[error("HTTP server failed: {0}")]
    Serve(#[source] io::Error),
}

/// Creates the application router with all routes and middleware
pub fn create_router<S: StorageImpl>(app_state: Arc<AppState<S>>) -> Router {
    let base = app_state.config.server.base_path.clone();

    // CORS configuration - permissive
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        // Admin routes
        .route(
            &format!("{}/admin/reload", base),
            get(api_handlers::reload::<S>).fallback(api_handlers::not_found),
        )
        // Collection routes
        .route(
            &format!("{}/{{collection}}", base),
            get(api_handlers::list_entities::<S>)
                .post(api_handlers::create_entity::<S>)
                .fallback(api_handlers::not_found),
        )
        .route(
            &format!("{}/{{collection}}/{{id}}", base),
            get(api_handlers::get_entity::<S>)
                .put(api_handlers::replace_entity::<S>)
                .patch(api_handlers::update_entity::<S>)
                .delete(api_handlers::delete_entity::<S>)
                .fallback(api_handlers::not_found),
        )
        // System routes
        .route("/health", get(api_handlers::health_check::<S>))
        .route("/info", get(api_handlers::system_info::<S>))
        .fallback(api_handlers::not_found)
        // Apply middleware to ALL routes
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(app_state)
}

async fn serve_api_server_with_app(addr: SocketAddr, app: Router) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    log_info!("Server listening on http://{}", addr);
    log_info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    log_info!("Server stopped accepting connections");
    Ok(())
}

/// Start the HTTP server with the configured AppState and run it until
/// Ctrl-C or SIGTERM
pub async fn start_api_server(configured_app_state: ConfiguredAppState) -> Result<(), ServerError> {
    let http_addr = configured_app_state.http_addr();
    let base_path = configured_app_state.config().server.base_path.clone();

    log_info!("Starting jsonstore API server on {} under {}", http_addr, base_path);

    // Match once on storage type to get concrete AppState, then start server
    match configured_app_state {
        ConfiguredAppState::File { app_state } => {
            log_info!("Starting server with file storage backend");
            let app = create_router(Arc::new(app_state));
            serve_api_server_with_app(http_addr, app).await
        }
        ConfiguredAppState::Memory { app_state } => {
            log_info!("Starting server with memory storage backend");
            let app = create_router(Arc::new(app_state));
            serve_api_server_with_app(http_addr, app).await
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_warn!("Failed to listen for Ctrl-C: {}", e);
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
                log_warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log_warn!("Received Ctrl-C, shutting down"),
        _ = terminate => log_warn!("Received SIGTERM, shutting down"),
    }
}
