//! Built-in template catalog handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

use crate::catalog::{self, CatalogEntry};
use crate::document::CanvasDocument;
use crate::error::CanvasError;

use super::super::state::AppState;
use super::ApiError;

/// Handle GET /api/catalog - list built-in templates.
pub async fn list(State(_state): State<Arc<AppState>>) -> Json<Vec<CatalogEntry>> {
    Json(catalog::list_templates())
}

/// Handle GET /api/catalog/:id - one template.
pub async fn get(
    State(_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CatalogEntry>, ApiError> {
    catalog::get(&id)
        .map(Json)
        .ok_or_else(|| CanvasError::not_found(format!("template '{}'", id)).into())
}

/// Handle POST /api/catalog/:id/instantiate - a new one-page document.
pub async fn instantiate(
    State(_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<CanvasDocument>, ApiError> {
    let document = catalog::instantiate_document(&id)?;
    tracing::debug!(template = %id, "Instantiated catalog template");
    Ok(Json(document))
}
