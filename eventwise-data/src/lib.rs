//! Catalog access for the Eventwise engine.
//!
//! Responsibilities:
//! - Fetch events and categories from the remote backend over HTTP.
//! - Load the same rows from a local JSON export.
//! - Run catalog fetches in the background with an observable load state.
//!
//! Boundaries:
//! - Do not encode scoring or preference rules (live in `eventwise-scorer`).
//! - Normalise rows through `eventwise_core::EventRecord` only.
//!
//! Invariants:
//! - A failed request is retried at most once, and only when transient.
//! - No global mutable state.

pub mod catalog;
#[doc(hidden)]
pub mod test_support;

pub use catalog::{
    AsyncCatalogSource, CatalogTask, DEFAULT_USER_AGENT, FileCatalogSource, HttpCatalogClient,
    HttpCatalogSource, HttpCatalogSourceConfig, HttpSourceBuildError, LoadState,
};
