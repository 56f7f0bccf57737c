pub mod account;
pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod models;
pub mod query;
pub mod session;
pub mod store;

pub use catalog::Catalog;
pub use error::{LoadError, StoreError, ValidationError};
pub use models::{Listing, PropertyType, ViewMode};
pub use query::{FilterCriteria, QueryEngine, SortKey};
