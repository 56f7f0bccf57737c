use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::catalog::{CatalogSource, FileCatalog, HttpCatalog, RetryPolicy};
use crate::error::LoadError;
use crate::query::paginate::DEFAULT_PAGE_SIZE;

/// Runtime settings, read from an optional JSON file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the catalog JSON, or an http(s) URL serving it
    pub catalog: String,
    /// File backing the key-value store
    pub store_path: PathBuf,
    pub page_size: usize,
    /// Quiet period before filter edits trigger a search
    pub debounce_ms: u64,
    /// Simulated result latency; 0 disables it
    pub latency_ms: u64,
    pub retry: RetryPolicy,
    pub log_level: String,
    pub user_id: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: "data/properties.json".to_string(),
            store_path: PathBuf::from("data/store.json"),
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: 500,
            latency_ms: 800,
            retry: RetryPolicy::default(),
            log_level: "info".to_string(),
            user_id: None,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    /// Catalog backend matching the configured location
    pub fn catalog_source(&self) -> Result<Box<dyn CatalogSource>, LoadError> {
        if self.catalog.starts_with("http://") || self.catalog.starts_with("https://") {
            Ok(Box::new(HttpCatalog::new(self.catalog.clone())?))
        } else {
            Ok(Box::new(FileCatalog::new(&self.catalog)))
        }
    }
}
