//! Core domain types for the Eventwise recommendation engine.
//!
//! Events arrive from the backend as loosely typed rows and are normalised
//! once into [`Event`]. Everything downstream (scoring, search, the
//! preference store) works on the normalised form and never has to handle
//! missing fields again.

#![forbid(unsafe_code)]

pub mod catalog;
mod category;
pub mod event;
pub mod preferences;
#[cfg(feature = "serde")]
pub mod record;
pub mod search;
pub mod storage;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use catalog::{Catalog, CatalogError, CatalogSource};
pub use category::Category;
pub use event::{Event, EventId, MAX_EVENT_RATING};
pub use preferences::{PreferenceSnapshot, Stars, StarsError};
#[cfg(feature = "serde")]
pub use record::{CategoryRef, EventRecord, RecordId, parse_event_date};
pub use search::{DateRange, SearchFilters, SortOrder};
pub use storage::{KeyValueStore, StorageError};
