//! # Template Store
//!
//! Persistence for users' saved templates, keyed by `(userId, templateId)`.
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`MemoryStore`] | Process-local map, lost on restart |
//! | [`FileStore`] | Same map, flushed to a JSON file after every write |
//!
//! Saves are upserts performed under a single write lock, so two saves for
//! the same key never produce two records. There is no versioning: the last
//! write wins.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::document::CanvasDocument;
use crate::error::{CanvasError, Result};

/// Owner of a saved template.
///
/// Accepts JSON numbers as well as strings (`42` and `"42"` are the same user).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        crate::document::types::deserialize_id(deserializer).map(UserId)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for UserId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// A user's persisted canvas document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTemplate {
    pub user_id: UserId,
    pub template_id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Thumbnail (usually a data URL) shown in template pickers.
    #[serde(default)]
    pub preview: Option<String>,
    pub content: CanvasDocument,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input to [`TemplateStore::save`].
#[derive(Debug, Clone)]
pub struct SaveTemplate {
    pub user_id: UserId,
    pub template_id: String,
    pub name: String,
    /// `None` leaves an existing record's category untouched.
    pub category: Option<String>,
    /// `None` leaves an existing record's preview untouched.
    pub preview: Option<String>,
    pub content: CanvasDocument,
}

impl SaveTemplate {
    pub fn new(
        user_id: impl Into<UserId>,
        template_id: impl Into<String>,
        name: impl Into<String>,
        content: CanvasDocument,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            template_id: template_id.into(),
            name: name.into(),
            category: None,
            preview: None,
            content,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = Some(preview.into());
        self
    }

    /// Blank strings count as missing.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.user_id.is_blank() {
            missing.push("userId");
        }
        if self.template_id.trim().is_empty() {
            missing.push("templateId");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(CanvasError::validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }
}

/// Backend for saved templates.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Create or update the record for `(user_id, template_id)`.
    async fn save(&self, request: SaveTemplate) -> Result<SavedTemplate>;

    /// All records owned by `user_id`, ordered by template id.
    async fn list(&self, user_id: &UserId) -> Result<Vec<SavedTemplate>>;

    /// One record, if present.
    async fn get(&self, user_id: &UserId, template_id: &str) -> Result<Option<SavedTemplate>>;

    /// Remove matching records. Returns how many were removed; 0 is not an error.
    async fn delete(&self, user_id: &UserId, template_id: &str) -> Result<usize>;

    /// Overwrite name and content of matching records. Returns how many changed.
    async fn update(
        &self,
        user_id: &UserId,
        template_id: &str,
        name: &str,
        content: CanvasDocument,
    ) -> Result<usize>;
}
