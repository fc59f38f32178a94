//! Catalog sources backed by the remote backend or a local export.
//!
//! This module provides:
//!
//! - [`AsyncCatalogSource`]: the asynchronous counterpart of
//!   [`eventwise_core::CatalogSource`].
//! - [`HttpCatalogClient`] and [`HttpCatalogSource`]: REST access to the
//!   backend's `events` and `categories` tables.
//! - [`FileCatalogSource`]: a JSON export of event rows on disk.
//! - [`CatalogTask`]: a spawned fetch exposing its [`LoadState`].

use async_trait::async_trait;
use eventwise_core::{Catalog, CatalogError, Category};

mod file;
mod http;
mod task;

pub use file::FileCatalogSource;
pub use http::{
    DEFAULT_USER_AGENT, HttpCatalogClient, HttpCatalogSource, HttpCatalogSourceConfig,
    HttpSourceBuildError,
};
pub use task::{CatalogTask, LoadState};

/// Asynchronous access to the event catalog.
#[async_trait]
pub trait AsyncCatalogSource: Send + Sync {
    /// Fetch every event in backend order.
    async fn fetch_events(&self) -> Result<Catalog, CatalogError>;

    /// Fetch every category ordered by name.
    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError>;
}
