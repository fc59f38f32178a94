//! Facade crate for the Eventwise campus event recommender.
//!
//! This crate re-exports the core domain types and the scoring engine, and
//! exposes the HTTP catalog client and the `SQLite` preference store behind
//! feature flags.

#![forbid(unsafe_code)]

pub use eventwise_core::{
    Catalog, CatalogError, CatalogSource, Category, DateRange, Event, EventId, KeyValueStore,
    PreferenceSnapshot, SearchFilters, SortOrder, Stars, StarsError, StorageError,
};

#[cfg(feature = "serde")]
pub use eventwise_core::{CategoryRef, EventRecord, RecordId};

pub use eventwise_scorer::{
    DEFAULT_LIMIT, FileKeyValueStore, PreferenceStore, RecencyPolicy, Recommender, ScoreWeights,
    ScoredEvent, SimilarityWeights, similar_to,
};

#[cfg(feature = "store-sqlite")]
pub use eventwise_scorer::{SqliteKeyValueStore, SqliteStoreError};

#[cfg(feature = "http-catalog")]
pub use eventwise_data::{
    AsyncCatalogSource, CatalogTask, FileCatalogSource, HttpCatalogSource,
    HttpCatalogSourceConfig, LoadState,
};
