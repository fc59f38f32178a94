//! Test utilities for catalog sources.
//!
//! This module provides [`StubCatalogSource`], a deterministic test double
//! for both [`CatalogSource`] and [`AsyncCatalogSource`] that returns
//! pre-configured responses without making HTTP requests.

use async_trait::async_trait;
use eventwise_core::{Catalog, CatalogError, CatalogSource, Category};

use crate::catalog::AsyncCatalogSource;

/// Stub catalog source for testing.
///
/// # Example
///
/// ```
/// use eventwise_core::{Catalog, CatalogError, CatalogSource, Event};
/// use eventwise_data::test_support::StubCatalogSource;
///
/// let source = StubCatalogSource::with_catalog(Catalog::new(vec![Event::new("1", "TechFest")]));
/// assert_eq!(source.fetch_events().map(|catalog| catalog.len()), Ok(1));
///
/// let failing = StubCatalogSource::with_error(CatalogError::Interrupted);
/// assert_eq!(failing.fetch_events(), Err(CatalogError::Interrupted));
/// ```
#[derive(Debug, Clone)]
pub struct StubCatalogSource {
    response: StubResponse,
    categories: Vec<Category>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Catalog(Catalog),
    Error(CatalogError),
}

impl StubCatalogSource {
    /// Create a source that returns the given catalog.
    #[must_use]
    pub const fn with_catalog(catalog: Catalog) -> Self {
        Self {
            response: StubResponse::Catalog(catalog),
            categories: Vec::new(),
        }
    }

    /// Create a source whose fetches all fail with `error`.
    #[must_use]
    pub const fn with_error(error: CatalogError) -> Self {
        Self {
            response: StubResponse::Error(error),
            categories: Vec::new(),
        }
    }

    /// Categories returned when the stub is not failing.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    fn events(&self) -> Result<Catalog, CatalogError> {
        match &self.response {
            StubResponse::Catalog(catalog) => Ok(catalog.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }

    fn category_list(&self) -> Result<Vec<Category>, CatalogError> {
        match &self.response {
            StubResponse::Catalog(_) => Ok(self.categories.clone()),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}

impl CatalogSource for StubCatalogSource {
    fn fetch_events(&self) -> Result<Catalog, CatalogError> {
        self.events()
    }

    fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.category_list()
    }
}

#[async_trait]
impl AsyncCatalogSource for StubCatalogSource {
    async fn fetch_events(&self) -> Result<Catalog, CatalogError> {
        self.events()
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        self.category_list()
    }
}
