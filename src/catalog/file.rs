use crate::catalog::traits::CatalogSource;
use crate::catalog::Catalog;
use crate::error::LoadError;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Catalog read from a JSON file on disk
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn load(&self) -> Result<Catalog, LoadError> {
        debug!(path = %self.path.display(), "reading catalog file");
        let json = tokio::fs::read_to_string(&self.path).await?;
        let catalog = Catalog::from_json(&json)?;
        info!(
            path = %self.path.display(),
            count = catalog.len(),
            "📊 catalog loaded"
        );
        Ok(catalog)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::retry::{load_with_retry, RetryPolicy};
    use std::io::Write;

    #[tokio::test]
    async fn loads_listing_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "title": "Studio", "location": "Plateau, Abidjan", "type": "Studio", "price": 150000}}]"#
        )
        .unwrap();

        let catalog = FileCatalog::new(file.path()).load().await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(1).unwrap().title, "Studio");
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileCatalog::new(dir.path().join("nope.json"))
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn missing_file_fails_without_backoff() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileCatalog::new(dir.path().join("properties.json"));
        let started = std::time::Instant::now();
        let err = load_with_retry(&source, &RetryPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
        assert!(started.elapsed() < std::time::Duration::from_millis(500));
    }
}
