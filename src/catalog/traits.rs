use crate::catalog::Catalog;
use crate::error::LoadError;
use async_trait::async_trait;

/// Common trait for all catalog backends
/// A static JSON file today; anything that can produce the listing array later
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load and validate the full catalog
    async fn load(&self) -> Result<Catalog, LoadError>;

    /// Get the name of the catalog source
    fn source_name(&self) -> &'static str;
}
