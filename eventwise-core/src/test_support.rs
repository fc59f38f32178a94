//! Test-only storage backends, catalog sources and sample data shared by unit
//! and behaviour tests.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{Days, NaiveDate};

use crate::{
    Catalog, CatalogError, CatalogSource, Category, Event, KeyValueStore, PreferenceSnapshot,
    StorageError,
};

/// In-memory `KeyValueStore` that counts successful writes.
///
/// The write counter lets tests assert that no-op mutations skip
/// persistence.
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyValueStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryKeyValueStore {
    /// Create a store pre-populated with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self { entries, writes: 0 }
    }

    /// Number of `set` calls served since construction.
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// Borrow the raw value stored under `key`.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.writes += 1;
        Ok(())
    }
}

/// `KeyValueStore` whose reads and writes always fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingKeyValueStore;

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Backend {
            key: key.to_owned(),
            message: "storage unavailable".into(),
        })
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Backend {
            key: key.to_owned(),
            message: "storage unavailable".into(),
        })
    }
}

/// `CatalogSource` serving a fixed catalog or a fixed error.
#[derive(Debug, Clone)]
pub struct StaticCatalogSource {
    events: Result<Catalog, CatalogError>,
    categories: Vec<Category>,
    calls: Cell<usize>,
}

impl StaticCatalogSource {
    /// Serve `catalog` with no categories.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            events: Ok(catalog),
            categories: Vec::new(),
            calls: Cell::new(0),
        }
    }

    /// Fail every event fetch with `error`.
    pub fn failing(error: CatalogError) -> Self {
        Self {
            events: Err(error),
            categories: Vec::new(),
            calls: Cell::new(0),
        }
    }

    /// Serve `categories` from [`CatalogSource::fetch_categories`].
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    /// Number of event fetches served.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl CatalogSource for StaticCatalogSource {
    fn fetch_events(&self) -> Result<Catalog, CatalogError> {
        self.calls.set(self.calls.get() + 1);
        self.events.clone()
    }

    fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        match &self.events {
            Ok(_) => Ok(self.categories.clone()),
            Err(error) => Err(error.clone()),
        }
    }
}

/// Fixed evaluation day used by date-sensitive tests: 2025-03-10.
pub fn reference_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap_or_default()
}

/// Two-event technical catalog used across scoring tests.
///
/// Event `1` happens three days after [`reference_day`], event `2` forty days
/// after it. Both share the `AI` tag and the `TechSoc` society.
pub fn campus_catalog() -> Catalog {
    Catalog::new(vec![
        Event::new("1", "TechFest")
            .with_category("Technical")
            .with_tags(["AI", "Robotics"])
            .with_rating(4.5)
            .with_registrations(100)
            .with_society("TechSoc")
            .with_date(reference_day() + Days::new(3)),
        Event::new("2", "AI Hackathon")
            .with_category("Technical")
            .with_tags(["AI", "Coding"])
            .with_rating(5.0)
            .with_registrations(50)
            .with_society("TechSoc")
            .with_date(reference_day() + Days::new(40)),
    ])
}

/// History matching [`campus_catalog`]: event `2` rated five stars and a
/// `Technical` affinity of `10`.
pub fn technical_history() -> PreferenceSnapshot {
    let mut snapshot = PreferenceSnapshot::default();
    snapshot.ratings.insert("2".into(), 5);
    snapshot
        .category_preferences
        .insert("Technical".into(), 10.0);
    snapshot
}
