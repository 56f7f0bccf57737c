use crate::catalog::traits::CatalogSource;
use crate::catalog::Catalog;
use crate::error::LoadError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Catalog served as a static JSON document over HTTP
pub struct HttpCatalog {
    client: Client,
    url: String,
}

impl HttpCatalog {
    pub fn new(url: impl Into<String>) -> Result<Self, LoadError> {
        Self::with_timeout(url, Duration::from_secs(30))
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rental-scout/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    async fn load(&self) -> Result<Catalog, LoadError> {
        debug!("Fetching catalog: {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            warn!("Catalog source returned status: {}", response.status());
            return Err(LoadError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        debug!("Downloaded {} bytes of catalog JSON", body.len());

        let catalog = Catalog::from_json(&body)?;
        info!("📊 {} listings loaded from {}", catalog.len(), self.url);
        Ok(catalog)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_host_is_transient() {
        // port 9 on loopback: nothing listens there
        let source =
            HttpCatalog::with_timeout("http://127.0.0.1:9/properties.json", Duration::from_secs(2))
                .unwrap();
        assert_eq!(source.url(), "http://127.0.0.1:9/properties.json");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, LoadError::Http(_)));
        assert!(err.is_transient());
    }
}
