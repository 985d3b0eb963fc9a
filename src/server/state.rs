//! Server state and configuration.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::store::{FileStore, MemoryStore, TemplateStore};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8080")
    pub listen_addr: String,
    /// JSON file for saved templates. `None` keeps them in memory only.
    pub data_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            data_path: None,
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<dyn TemplateStore>,
}

impl AppState {
    /// Open the store the config asks for.
    pub async fn open(config: ServerConfig) -> Result<Self> {
        let store: Arc<dyn TemplateStore> = match &config.data_path {
            Some(path) => Arc::new(FileStore::open(path.clone()).await?),
            None => {
                tracing::warn!("No data file configured; saved templates live in memory only");
                Arc::new(MemoryStore::new())
            }
        };
        Ok(Self { config, store })
    }

    /// State over an existing store (tests, embedding).
    pub fn with_store(config: ServerConfig, store: Arc<dyn TemplateStore>) -> Self {
        Self { config, store }
    }
}
