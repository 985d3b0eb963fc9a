//! # Error Types
//!
//! This module defines error types used throughout the canvasmail library.
//!
//! Rendering never produces a [`CanvasError`]: malformed elements degrade to
//! "render nothing" and are reported as warnings instead.

use thiserror::Error;

/// Main error type for canvasmail operations
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Missing or malformed required field, invalid geometry or index
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown catalog template, element or page
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence backend fault (surfaced to the caller, never retried)
    #[error("Store error: {0}")]
    Store(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CanvasError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        CanvasError::Validation(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        CanvasError::NotFound(msg.into())
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = CanvasError> = std::result::Result<T, E>;
