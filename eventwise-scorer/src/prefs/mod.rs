//! The preference store: one user's interaction history and its durable
//! copy.
//!
//! [`PreferenceStore`] owns a [`PreferenceSnapshot`] and a [`KeyValueStore`]
//! backend. Every mutation that changes the snapshot rewrites the whole
//! snapshot as JSON under a single key. Storage is best effort: a failed
//! write is logged and the in-memory snapshot stays authoritative for the
//! session.

#![forbid(unsafe_code)]

use eventwise_core::{Catalog, EventId, KeyValueStore, PreferenceSnapshot, Stars};
use log::{debug, warn};

mod file;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use file::FileKeyValueStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::SqliteKeyValueStore;

/// Key the snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "userEventData";

/// Category bucket credited by feedback on unknown or uncategorised events.
pub const GENERAL_CATEGORY: &str = "General";

/// Session-scoped owner of a user's preference snapshot.
///
/// # Examples
/// ```
/// use eventwise_core::test_support::{MemoryKeyValueStore, campus_catalog};
/// use eventwise_core::Stars;
/// use eventwise_scorer::PreferenceStore;
///
/// let catalog = campus_catalog();
/// let mut store = PreferenceStore::load(MemoryKeyValueStore::default());
///
/// store.rate_event("1", Stars::new(5)?, &catalog);
/// assert_eq!(store.snapshot().rating("1"), Some(5));
/// assert_eq!(store.snapshot().category_weight(Some("Technical")), 5.0);
/// # Ok::<(), eventwise_core::StarsError>(())
/// ```
#[derive(Debug)]
pub struct PreferenceStore<B> {
    backend: B,
    key: String,
    snapshot: PreferenceSnapshot,
}

impl<B: KeyValueStore> PreferenceStore<B> {
    /// Load the snapshot stored under [`SNAPSHOT_KEY`].
    ///
    /// Missing, unreadable or corrupt data yields an empty snapshot.
    #[must_use]
    pub fn load(backend: B) -> Self {
        Self::load_with_key(backend, SNAPSHOT_KEY)
    }

    /// Load the snapshot stored under a custom key.
    #[must_use]
    pub fn load_with_key(backend: B, key: impl Into<String>) -> Self {
        let storage_key = key.into();
        let snapshot = read_snapshot(&backend, &storage_key);
        Self {
            backend,
            key: storage_key,
            snapshot,
        }
    }

    /// Borrow the current snapshot.
    #[must_use]
    pub const fn snapshot(&self) -> &PreferenceSnapshot {
        &self.snapshot
    }

    /// Borrow the storage backend.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Consume the store and return the backend.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Record a registration. Returns `false` when already registered, in
    /// which case nothing is written.
    pub fn register_event(&mut self, id: impl Into<EventId>) -> bool {
        let changed = self.snapshot.registered_events.insert(id.into());
        if changed {
            self.persist();
        }
        changed
    }

    /// Record a star rating and credit the event's category.
    ///
    /// The rating is kept even when the event is missing from `catalog` or
    /// uncategorised; only the category credit is skipped then.
    pub fn rate_event(&mut self, id: impl Into<EventId>, stars: Stars, catalog: &Catalog) {
        let event_id = id.into();
        if let Some(category) = catalog.category_of(event_id.as_str()) {
            self.credit_category(category, f64::from(stars.get()));
        } else {
            debug!("rating for {event_id} has no category to credit");
        }
        self.snapshot.ratings.insert(event_id, stars.get());
        self.persist();
    }

    /// Record post-event feedback and credit twice the stars to the event's
    /// category, or to [`GENERAL_CATEGORY`] when it cannot be resolved.
    pub fn submit_feedback(&mut self, id: impl Into<EventId>, stars: Stars, catalog: &Catalog) {
        let event_id = id.into();
        let category = catalog
            .category_of(event_id.as_str())
            .unwrap_or(GENERAL_CATEGORY);
        self.credit_category(category, f64::from(u16::from(stars.get()) * 2));
        self.snapshot.feedback_scores.insert(event_id, stars.get());
        self.persist();
    }

    /// Record attendance. Returns `false` when already recorded, in which
    /// case nothing is written.
    pub fn mark_attended(&mut self, id: impl Into<EventId>) -> bool {
        let changed = self.snapshot.attended_events.insert(id.into());
        if changed {
            self.persist();
        }
        changed
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "category preferences accumulate star credits"
    )]
    fn credit_category(&mut self, category: &str, credit: f64) {
        *self
            .snapshot
            .category_preferences
            .entry(category.to_owned())
            .or_insert(0.0) += credit;
    }

    fn persist(&mut self) {
        let encoded = match serde_json::to_string(&self.snapshot) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!("failed to encode preference snapshot: {err}");
                return;
            }
        };
        if let Err(err) = self.backend.set(&self.key, &encoded) {
            warn!("failed to persist preference snapshot under {}: {err}", self.key);
        }
    }
}

fn read_snapshot<B: KeyValueStore>(backend: &B, key: &str) -> PreferenceSnapshot {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("no stored preferences under {key}; starting empty");
            return PreferenceSnapshot::default();
        }
        Err(err) => {
            warn!("failed to read preferences under {key}: {err}; starting empty");
            return PreferenceSnapshot::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!("discarding corrupt preferences under {key}: {err}");
        PreferenceSnapshot::default()
    })
}
