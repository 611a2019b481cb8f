//! The state behind a browsable directory of useful websites: the site
//! catalog, the user's favorites, the listing query, and the admin toggle,
//! all persisted to a client-local key-value store.

pub mod access;
pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
pub mod favorites;
pub mod query;
pub mod session;
pub mod storage;

pub use access::{AccessGate, AccessState, CredentialVerifier, FixedCredentials};
pub use catalog::{BulkReport, CatalogStore};
pub use config::Config;
pub use data::{CategoriesTable, Category, CategoryId, NewSite, Provenance, Seed, SiteEntry, SiteId, SitePatch};
pub use error::{AccessDenied, ConfigError, StorageError, ValidationError};
pub use favorites::FavoritesStore;
pub use query::{CategoryFilter, Criteria, QueryView, SortKey};
pub use session::Session;
pub use storage::{FileStorage, MemoryStorage, Storage};
