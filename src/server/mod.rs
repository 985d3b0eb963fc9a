//! # HTTP Server for Template Storage and Rendering
//!
//! Serves the saved-template API, the built-in catalog and HTML rendering.
//!
//! ## Usage
//!
//! ```bash
//! canvasmail serve --listen 0.0.0.0:8080 --data templates.json
//! ```

pub mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::CanvasError;

/// Saved templates carry preview thumbnails as data URLs.
const BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Build the application router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Saved templates
        .route("/api/templates/save", post(handlers::templates::save))
        .route("/api/templates/update", put(handlers::templates::update))
        .route("/api/templates/:user_id", get(handlers::templates::list))
        .route(
            "/api/templates/:user_id/:template_id",
            delete(handlers::templates::delete),
        )
        .route(
            "/api/templates/:user_id/:template_id/export",
            get(handlers::templates::export),
        )
        // Catalog
        .route("/api/catalog", get(handlers::catalog::list))
        .route("/api/catalog/:id", get(handlers::catalog::get))
        .route(
            "/api/catalog/:id/instantiate",
            post(handlers::catalog::instantiate),
        )
        // Rendering
        .route("/api/render/preview", post(handlers::render::preview))
        .route("/api/render/tree", post(handlers::render::tree))
        .route("/api/render/export", post(handlers::render::export))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use canvasmail::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), canvasmail::CanvasError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     data_path: Some("templates.json".into()),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), CanvasError> {
    let state = Arc::new(AppState::open(config.clone()).await?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            tracing::error!(listen = %config.listen_addr, error = %e, "Failed to bind");
            CanvasError::Io(e)
        })?;

    tracing::info!(
        listen = %config.listen_addr,
        data = ?config.data_path,
        "canvasmail server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
