//! In-memory template store.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{SaveTemplate, SavedTemplate, TemplateStore, UserId};
use crate::document::CanvasDocument;
use crate::error::{CanvasError, Result};

type Key = (UserId, String);

/// The record map shared by the in-memory and file backends.
///
/// All methods are synchronous; callers hold the lock around them so each
/// operation is atomic per key.
#[derive(Debug, Clone, Default)]
pub(crate) struct Records {
    map: BTreeMap<Key, SavedTemplate>,
}

impl Records {
    pub(crate) fn from_records(records: Vec<SavedTemplate>) -> Self {
        let map = records
            .into_iter()
            .map(|r| ((r.user_id.clone(), r.template_id.clone()), r))
            .collect();
        Self { map }
    }

    pub(crate) fn all(&self) -> Vec<&SavedTemplate> {
        self.map.values().collect()
    }

    pub(crate) fn upsert(&mut self, request: SaveTemplate) -> Result<SavedTemplate> {
        request.validate()?;
        let now = Utc::now();
        let key = (request.user_id.clone(), request.template_id.clone());

        let record = match self.map.get_mut(&key) {
            Some(existing) => {
                existing.name = request.name;
                if request.category.is_some() {
                    existing.category = request.category;
                }
                if request.preview.is_some() {
                    existing.preview = request.preview;
                }
                existing.content = request.content;
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let record = SavedTemplate {
                    user_id: request.user_id,
                    template_id: request.template_id,
                    name: request.name,
                    category: request.category,
                    preview: request.preview,
                    content: request.content,
                    created_at: now,
                    updated_at: now,
                };
                self.map.insert(key, record.clone());
                record
            }
        };
        Ok(record)
    }

    pub(crate) fn list(&self, user_id: &UserId) -> Vec<SavedTemplate> {
        self.map
            .values()
            .filter(|r| &r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub(crate) fn get(&self, user_id: &UserId, template_id: &str) -> Option<SavedTemplate> {
        self.map
            .get(&(user_id.clone(), template_id.to_string()))
            .cloned()
    }

    pub(crate) fn delete(&mut self, user_id: &UserId, template_id: &str) -> usize {
        let removed = self.map.remove(&(user_id.clone(), template_id.to_string()));
        usize::from(removed.is_some())
    }

    pub(crate) fn update(
        &mut self,
        user_id: &UserId,
        template_id: &str,
        name: &str,
        content: CanvasDocument,
    ) -> Result<usize> {
        if name.trim().is_empty() {
            return Err(CanvasError::validation("missing required field(s): name"));
        }
        match self.map.get_mut(&(user_id.clone(), template_id.to_string())) {
            Some(record) => {
                record.name = name.to_string();
                record.content = content;
                record.updated_at = Utc::now();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for MemoryStore {
    async fn save(&self, request: SaveTemplate) -> Result<SavedTemplate> {
        self.records.write().await.upsert(request)
    }

    async fn list(&self, user_id: &UserId) -> Result<Vec<SavedTemplate>> {
        Ok(self.records.read().await.list(user_id))
    }

    async fn get(&self, user_id: &UserId, template_id: &str) -> Result<Option<SavedTemplate>> {
        Ok(self.records.read().await.get(user_id, template_id))
    }

    async fn delete(&self, user_id: &UserId, template_id: &str) -> Result<usize> {
        Ok(self.records.write().await.delete(user_id, template_id))
    }

    async fn update(
        &self,
        user_id: &UserId,
        template_id: &str,
        name: &str,
        content: CanvasDocument,
    ) -> Result<usize> {
        self.records
            .write()
            .await
            .update(user_id, template_id, name, content)
    }
}
