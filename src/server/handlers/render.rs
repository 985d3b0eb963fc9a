//! Rendering handlers.
//!
//! The renderer runs on the blocking pool. A panic inside it surfaces as a
//! 500 `{"error": "preview error: ..."}` for that request only.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::document::CanvasDocument;
use crate::render::{self, Rendered, html};

use super::super::state::AppState;
use super::{ApiError, ApiJson};

/// Header carrying the number of render warnings on preview responses.
pub const WARNINGS_HEADER: &str = "x-render-warnings";

/// Body of the preview endpoints. Page and zoom default to the document's own.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub document: CanvasDocument,
    pub page_index: Option<usize>,
    pub zoom_level: Option<f64>,
}

impl PreviewRequest {
    fn page_index(&self) -> usize {
        self.page_index
            .unwrap_or_else(|| self.document.active_page_index())
    }

    fn zoom(&self) -> f64 {
        self.zoom_level.unwrap_or_else(|| self.document.zoom_level())
    }
}

/// Body of `POST /api/render/export`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub document: CanvasDocument,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub zoom_level: Option<f64>,
}

/// Run `f` on the blocking pool, turning a panic into a preview error.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "Renderer task failed");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("preview error: {}", e),
        )
    })
}

async fn render_request(req: PreviewRequest) -> Result<Rendered, ApiError> {
    let page_index = req.page_index();
    let zoom = req.zoom();
    let document = req.document;
    blocking(move || render::render(&document, page_index, zoom)).await
}

fn log_warnings(rendered: &Rendered) -> usize {
    let warnings = rendered.as_page().map_or(&[][..], |p| &p.warnings[..]);
    for warning in warnings {
        tracing::warn!(?warning, "Render warning");
    }
    warnings.len()
}

/// Handle POST /api/render/preview - editor preview fragment.
pub async fn preview(
    State(_state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PreviewRequest>,
) -> Result<Response, ApiError> {
    let rendered = render_request(req).await?;
    let count = log_warnings(&rendered);
    let body = html::preview_html(&rendered);

    let mut headers = HeaderMap::new();
    headers.insert(WARNINGS_HEADER, HeaderValue::from(count));
    Ok((headers, Html(body)).into_response())
}

/// Handle POST /api/render/tree - the visual tree as JSON, warnings included.
pub async fn tree(
    State(_state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PreviewRequest>,
) -> Result<Json<Rendered>, ApiError> {
    let rendered = render_request(req).await?;
    log_warnings(&rendered);
    Ok(Json(rendered))
}

/// Handle POST /api/render/export - full email HTML for every page.
pub async fn export(
    State(_state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ExportRequest>,
) -> Result<Html<String>, ApiError> {
    let title = req.title.unwrap_or_else(|| "Email".to_string());
    let zoom = req.zoom_level.unwrap_or(1.0);
    let document = req.document;
    let body = blocking(move || html::export_html(&document, &title, zoom)).await?;
    Ok(Html(body))
}
