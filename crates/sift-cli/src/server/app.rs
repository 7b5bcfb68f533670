//! Axum application setup.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};

use super::handlers;
use super::state::AppState;
use crate::web::static_handler;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration for local development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/datasets", get(handlers::list_datasets))
        .route("/datasets/url", post(handlers::load_url))
        .route("/datasets/upload", post(handlers::upload_dataset))
        .route("/datasets/:label", get(handlers::get_dataset))
        .route("/datasets/:label/filter", post(handlers::filter_dataset))
        .route("/datasets/:label/summary", post(handlers::summarize_dataset))
        .route("/datasets/:label/export", post(handlers::export_dataset))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES));

    Router::new()
        .nest("/api", api_routes)
        .fallback(static_handler)
        .layer(cors)
        .with_state(state)
}

/// Start the web server and run until Ctrl+C.
pub async fn run_server(state: AppState, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(%addr, "server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
}
