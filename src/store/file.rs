//! JSON-file template store.
//!
//! The whole record set lives in memory and is rewritten to disk after each
//! successful write, via a temp file and rename so a crash never leaves a
//! half-written file behind. The write lock is held across the flush, which
//! serializes writers. Changes become visible only once they are on disk.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::memory::Records;
use super::{SaveTemplate, SavedTemplate, TemplateStore, UserId};
use crate::document::CanvasDocument;
use crate::error::{CanvasError, Result};

/// Store backed by a single JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    records: RwLock<Records>,
}

fn store_err(action: &str, path: &Path, e: impl std::fmt::Display) -> CanvasError {
    CanvasError::Store(format!("{} {}: {}", action, path.display(), e))
}

impl FileStore {
    /// Open (or start) a store at `path`. A missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let records: Vec<SavedTemplate> = serde_json::from_slice(&bytes)
                    .map_err(|e| store_err("failed to parse", &path, e))?;
                tracing::info!(path = %path.display(), count = records.len(), "Loaded template store");
                Records::from_records(records)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Starting empty template store");
                Records::default()
            }
            Err(e) => return Err(store_err("failed to read", &path, e)),
        };
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn flush(&self, records: &Records) -> Result<()> {
        let json = serde_json::to_vec_pretty(&records.all())
            .map_err(|e| store_err("failed to encode", &self.path, e))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| store_err("failed to write", &tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| store_err("failed to replace", &self.path, e))?;
        tracing::debug!(path = %self.path.display(), "Flushed template store");
        Ok(())
    }
}

#[async_trait]
impl TemplateStore for FileStore {
    async fn save(&self, request: SaveTemplate) -> Result<SavedTemplate> {
        let mut records = self.records.write().await;
        let mut next = records.clone();
        let saved = next.upsert(request)?;
        self.flush(&next).await?;
        *records = next;
        Ok(saved)
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<SavedTemplate>> {
        Ok(self.records.read().await.list(user_id))
    }

    async fn get(&self, user_id: &UserId, template_id: &str) -> Result<Option<SavedTemplate>> {
        Ok(self.records.read().await.get(user_id, template_id))
    }

    async fn delete(&self, user_id: &UserId, template_id: &str) -> Result<usize> {
        let mut records = self.records.write().await;
        let mut next = records.clone();
        let removed = next.delete(user_id, template_id);
        if removed > 0 {
            self.flush(&next).await?;
            *records = next;
        }
        Ok(removed)
    }

    async fn update(
        &self,
        user_id: &UserId,
        template_id: &str,
        name: &str,
        content: CanvasDocument,
    ) -> Result<usize> {
        let mut records = self.records.write().await;
        let mut next = records.clone();
        let updated = next.update(user_id, template_id, name, content)?;
        if updated > 0 {
            self.flush(&next).await?;
            *records = next;
        }
        Ok(updated)
    }
}
