pub mod config;
pub mod db;
pub mod errors;
pub mod http;
mod logging;
mod middleware;
pub mod models;
pub mod state;

use std::sync::Arc;

use config::Config;
use db::{connection::Database, postgres::PgRatingStore};
use middleware::cors_layer;
use state::AppState;
use tower_http::trace::TraceLayer;

pub use http::{RequestEnvelope, ResponseEnvelope, create_http_routes, dispatch};

/// Builds the axum app around `state`.
pub fn build_app(state: AppState) -> axum::Router {
    create_http_routes(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

pub async fn start_server() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    logging::init_logging(&config.log_level);

    let database = Database::connect(&config).await;
    if !database.is_connected() {
        tracing::warn!("Starting without a database; rating routes will return 500");
    }

    let state = AppState::new(Arc::new(PgRatingStore::new(database)));
    tracing::info!("Backend {} starting", state.backend_id);

    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!("Ratings backend listening on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
