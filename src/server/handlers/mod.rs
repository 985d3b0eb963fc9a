//! HTTP handlers for the server.

pub mod catalog;
pub mod render;
pub mod templates;

use async_trait::async_trait;
use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::CanvasError;

/// Error response: `{"error": "..."}` with a status derived from the error kind.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<CanvasError> for ApiError {
    fn from(e: CanvasError) -> Self {
        let status = match &e {
            CanvasError::Validation(_) | CanvasError::Json(_) => StatusCode::BAD_REQUEST,
            CanvasError::NotFound(_) => StatusCode::NOT_FOUND,
            CanvasError::Store(_) | CanvasError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %e, "Request failed");
        }
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// `Json<T>` whose rejections use the `{"error": ...}` envelope with a 400.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text()))
            }
        }
    }
}
