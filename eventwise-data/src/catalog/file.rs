//! Catalog loaded from a JSON export of backend rows.

use std::collections::BTreeMap;

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use eventwise_core::{Catalog, CatalogError, CatalogSource, Category, Event, EventRecord};
use log::debug;

use super::AsyncCatalogSource;

/// Reads a JSON array of event rows, shaped like the backend's joined
/// `events` query.
///
/// Categories are derived from the rows: one per distinct name, ordered by
/// name, with the id and icon of the first row that mentions it.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    path: Utf8PathBuf,
}

impl FileCatalogSource {
    /// Create a source reading `path` on every fetch.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the export.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read_records(&self) -> Result<Vec<EventRecord>, CatalogError> {
        let contents = eventwise_fs::read_to_string_if_exists(&self.path)
            .map_err(|err| self.read_error(err.to_string()))?
            .ok_or_else(|| self.read_error("file not found".to_owned()))?;
        let records: Vec<EventRecord> =
            serde_json::from_str(&contents).map_err(|err| CatalogError::ParseError {
                message: format!("{}: {err}", self.path),
            })?;
        debug!("read {} event rows from {}", records.len(), self.path);
        Ok(records)
    }

    fn read_error(&self, message: String) -> CatalogError {
        CatalogError::ReadError {
            path: self.path.to_string(),
            message,
        }
    }
}

fn categories_from(records: Vec<EventRecord>) -> Vec<Category> {
    let mut by_name: BTreeMap<String, Category> = BTreeMap::new();
    for record in records {
        let (joined_name, icon) = record
            .categories
            .map_or((None, None), |joined| (joined.name, joined.icon));
        let Some(name) = joined_name
            .or(record.category)
            .filter(|name| !name.trim().is_empty())
        else {
            continue;
        };
        by_name.entry(name.clone()).or_insert_with(|| Category {
            id: record.category_id.unwrap_or_else(|| name.clone()),
            name,
            icon,
        });
    }
    by_name.into_values().collect()
}

impl CatalogSource for FileCatalogSource {
    fn fetch_events(&self) -> Result<Catalog, CatalogError> {
        Ok(self.read_records()?.into_iter().map(Event::from).collect())
    }

    fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.read_records().map(categories_from)
    }
}

#[async_trait]
impl AsyncCatalogSource for FileCatalogSource {
    async fn fetch_events(&self) -> Result<Catalog, CatalogError> {
        CatalogSource::fetch_events(self)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        CatalogSource::fetch_categories(self)
    }
}
