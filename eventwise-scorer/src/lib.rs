//! Recommendation scoring and preference storage for Eventwise.
//!
//! The crate provides two complementary capabilities:
//! - **Preference storage**: [`PreferenceStore`] records one user's
//!   registrations, attendance, ratings and feedback, and rewrites the whole
//!   snapshot to a [`KeyValueStore`](eventwise_core::KeyValueStore) after
//!   each change. [`FileKeyValueStore`] and, with the `store-sqlite` feature,
//!   [`SqliteKeyValueStore`] provide durable backends.
//! - **Recommendation scoring**: [`Recommender`] ranks the in-memory catalog
//!   against a [`PreferenceSnapshot`](eventwise_core::PreferenceSnapshot),
//!   and [`similar_to`] finds events resembling a given one without looking
//!   at any history.
//!
//! # Examples
//!
//! ```
//! use eventwise_core::Stars;
//! use eventwise_core::test_support::{MemoryKeyValueStore, campus_catalog, reference_day};
//! use eventwise_scorer::{DEFAULT_LIMIT, PreferenceStore, Recommender};
//!
//! let catalog = campus_catalog();
//! let mut store = PreferenceStore::load(MemoryKeyValueStore::default());
//! store.register_event("2");
//! store.rate_event("2", Stars::new(5)?, &catalog);
//!
//! let ranked = Recommender::default().rank(&catalog, store.snapshot(), DEFAULT_LIMIT, reference_day());
//! let ids: Vec<&str> = ranked.iter().map(|event| event.id.as_str()).collect();
//! assert_eq!(ids, ["1"]);
//! # Ok::<(), eventwise_core::StarsError>(())
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod prefs;
mod recency;
mod recommend;
mod similar;
mod weights;

#[cfg(feature = "store-sqlite")]
pub use error::SqliteStoreError;
pub use error::ScoreWeightsError;
#[cfg(feature = "store-sqlite")]
pub use prefs::SqliteKeyValueStore;
pub use prefs::{FileKeyValueStore, GENERAL_CATEGORY, PreferenceStore, SNAPSHOT_KEY};
pub use recency::RecencyPolicy;
pub use recommend::{
    DEFAULT_LIMIT, POSITIVE_THRESHOLD, REGISTERED_SCORE, Recommender, ScoredEvent,
};
pub use similar::similar_to;
pub use weights::{ScoreWeights, SimilarityWeights};
