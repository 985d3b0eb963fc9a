//! Saved-template handlers.
//!
//! Wire contract:
//!
//! | Route | Response |
//! |-------|----------|
//! | `POST /api/templates/save` | stored record, or 400 `{error}` |
//! | `GET /api/templates/:user_id` | `[records]` |
//! | `DELETE /api/templates/:user_id/:template_id` | `{message}` (idempotent) |
//! | `PUT /api/templates/update` | `{message, updated}` |
//! | `GET /api/templates/:user_id/:template_id/export` | email HTML |

use axum::{
    Json,
    extract::{Path, State},
    response::Html,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::document::CanvasDocument;
use crate::error::CanvasError;
use crate::render::html::export_html;
use crate::store::{SaveTemplate, SavedTemplate, UserId};

use super::super::state::AppState;
use super::{ApiError, ApiJson};

/// Body of `POST /save`. Every field is optional here so missing ones come
/// back as a 400 listing them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub user_id: Option<UserId>,
    pub template_id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub preview: Option<String>,
    pub content: Option<Value>,
}

/// Body of `PUT /update`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub user_id: Option<UserId>,
    pub template_id: Option<String>,
    pub name: Option<String>,
    pub content: Option<Value>,
}

fn present(value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|v| !v.trim().is_empty())
}

fn require_fields(fields: &[(&str, bool)]) -> Result<(), CanvasError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CanvasError::Validation(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )))
    }
}

/// Parse `content`, which clients send either as an object or as the
/// JSON-encoded string of one.
fn parse_content(content: Value) -> Result<CanvasDocument, CanvasError> {
    let parsed = match content {
        Value::String(s) => serde_json::from_str(&s),
        other => serde_json::from_value(other),
    };
    parsed.map_err(|e| CanvasError::Validation(format!("invalid content: {}", e)))
}

impl TryFrom<SaveRequest> for SaveTemplate {
    type Error = CanvasError;

    fn try_from(req: SaveRequest) -> Result<Self, CanvasError> {
        require_fields(&[
            ("userId", req.user_id.as_ref().is_some_and(|u| !u.is_blank())),
            ("templateId", present(&req.template_id)),
            ("name", present(&req.name)),
            ("content", req.content.as_ref().is_some_and(|c| !c.is_null())),
        ])?;
        let (Some(user_id), Some(template_id), Some(name), Some(content)) =
            (req.user_id, req.template_id, req.name, req.content)
        else {
            return Err(CanvasError::Validation("missing required field(s)".into()));
        };
        Ok(SaveTemplate {
            user_id,
            template_id,
            name,
            category: req.category,
            preview: req.preview,
            content: parse_content(content)?,
        })
    }
}

/// Handle POST /api/templates/save - create or update a saved template.
pub async fn save(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SaveRequest>,
) -> Result<Json<SavedTemplate>, ApiError> {
    let request = SaveTemplate::try_from(req)?;
    let saved = state.store.save(request).await?;
    tracing::info!(
        user_id = %saved.user_id,
        template_id = %saved.template_id,
        pages = saved.content.page_count(),
        "Saved template"
    );
    Ok(Json(saved))
}

/// Handle GET /api/templates/:user_id - list a user's templates.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<SavedTemplate>>, ApiError> {
    let records = state.store.list(&UserId::from(user_id)).await?;
    Ok(Json(records))
}

/// Handle DELETE /api/templates/:user_id/:template_id - idempotent delete.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path((user_id, template_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let user_id = UserId::from(user_id);
    let removed = state.store.delete(&user_id, &template_id).await?;
    tracing::info!(%user_id, %template_id, removed, "Deleted template");
    Ok(Json(json!({ "message": "Template deleted successfully" })))
}

/// Handle PUT /api/templates/update - overwrite name and content.
pub async fn update(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<UpdateRequest>,
) -> Result<Json<Value>, ApiError> {
    require_fields(&[
        ("userId", req.user_id.as_ref().is_some_and(|u| !u.is_blank())),
        ("templateId", present(&req.template_id)),
        ("name", present(&req.name)),
        ("content", req.content.as_ref().is_some_and(|c| !c.is_null())),
    ])?;
    let (Some(user_id), Some(template_id), Some(name), Some(content)) =
        (req.user_id, req.template_id, req.name, req.content)
    else {
        return Err(CanvasError::Validation("missing required field(s)".into()).into());
    };
    let content = parse_content(content)?;

    let updated = state
        .store
        .update(&user_id, &template_id, &name, content)
        .await?;
    tracing::info!(%user_id, %template_id, updated, "Updated template");
    Ok(Json(json!({
        "message": "Template updated successfully",
        "updated": updated,
    })))
}

/// Handle GET /api/templates/:user_id/:template_id/export - email HTML of a saved template.
pub async fn export(
    State(state): State<Arc<AppState>>,
    Path((user_id, template_id)): Path<(String, String)>,
) -> Result<Html<String>, ApiError> {
    let record = state
        .store
        .get(&UserId::from(user_id), &template_id)
        .await?
        .ok_or_else(|| CanvasError::NotFound(format!("saved template '{}'", template_id)))?;
    let html = super::render::blocking(move || export_html(&record.content, &record.name, 1.0)).await?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> SaveRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn save_request_lists_missing_fields() {
        let err = SaveTemplate::try_from(request(json!({"userId": 1, "name": ""}))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: missing required field(s): templateId, name, content"
        );
    }

    #[test]
    fn save_request_accepts_stringified_content() {
        let req = request(json!({
            "userId": 42,
            "templateId": "t",
            "name": "N",
            "content": "{\"pages\":[{\"elements\":[]}],\"activePageIndex\":0,\"zoomLevel\":1}"
        }));
        let save = SaveTemplate::try_from(req).unwrap();
        assert_eq!(save.user_id, UserId::from(42u64));
        assert_eq!(save.content.page_count(), 1);
    }

    #[test]
    fn save_request_rejects_malformed_content() {
        let req = request(json!({
            "userId": 1, "templateId": "t", "name": "N",
            "content": {"pages": [], "zoomLevel": -1}
        }));
        let err = SaveTemplate::try_from(req).unwrap_err();
        assert!(matches!(err, CanvasError::Validation(_)));
    }
}
