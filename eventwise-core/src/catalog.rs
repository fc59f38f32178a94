//! The in-memory event catalog and the read interface that produces it.
//!
//! A [`Catalog`] keeps events in the order the backend returned them. That
//! order is the tie-break for every ranking computed over the catalog, so it
//! is never reshuffled here.

use thiserror::Error;

use crate::{Category, Event};

/// Ordered collection of events available for scoring.
///
/// Lookups scan linearly and return the first matching event; catalogs are
/// expected to stay in the low hundreds of entries.
///
/// # Examples
/// ```
/// use eventwise_core::{Catalog, Event};
///
/// let catalog = Catalog::new(vec![
///     Event::new("1", "TechFest").with_category("Technical"),
///     Event::new("2", "Open Mic"),
/// ]);
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.category_of("1"), Some("Technical"));
/// assert_eq!(catalog.category_of("2"), None);
/// assert!(catalog.get("3").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    /// Wrap a list of events, keeping their order.
    pub const fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Construct an empty catalog.
    pub const fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Find an event by identifier.
    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id.as_str() == id)
    }

    /// Resolve the category of the event with the given identifier.
    ///
    /// Returns `None` when the event is unknown or uncategorised.
    pub fn category_of(&self, id: &str) -> Option<&str> {
        self.get(id).and_then(Event::category)
    }

    /// Iterate over events in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    /// Borrow the events as a slice.
    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    /// Number of events in the catalog.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Report whether the catalog holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Consume the catalog and return the events.
    pub fn into_inner(self) -> Vec<Event> {
        self.events
    }
}

impl FromIterator<Event> for Catalog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Vec<Event>> for Catalog {
    fn from(events: Vec<Event>) -> Self {
        Self::new(events)
    }
}

/// Errors raised while fetching the catalog from its source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The request could not reach the backend.
    #[error("network error fetching {url}: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The backend did not answer within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The backend answered with a non-success status.
    #[error("backend returned HTTP {status} for {url}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error body or reason phrase.
        message: String,
    },
    /// The payload could not be decoded into event records.
    #[error("failed to decode catalog payload: {message}")]
    ParseError {
        /// Decoder error description.
        message: String,
    },
    /// A local catalog export could not be read.
    #[error("failed to read catalog file {path}: {message}")]
    ReadError {
        /// Requested file path.
        path: String,
        /// I/O error description.
        message: String,
    },
    /// The background load stopped before producing a result.
    #[error("catalog load was interrupted before completing")]
    Interrupted,
}

impl CatalogError {
    /// Report whether retrying the request could plausibly succeed.
    ///
    /// Only transport failures and timeouts are transient.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::Timeout { .. })
    }
}

/// Read interface over the remote event backend.
///
/// The trait is synchronous so the scoring core stays embeddable in
/// synchronous callers; network-backed implementations block internally.
///
/// # Examples
///
/// ```rust
/// use eventwise_core::{Catalog, CatalogError, CatalogSource, Category, Event};
///
/// struct Fixed;
///
/// impl CatalogSource for Fixed {
///     fn fetch_events(&self) -> Result<Catalog, CatalogError> {
///         Ok(Catalog::new(vec![Event::new("1", "TechFest")]))
///     }
///
///     fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
///         Ok(Vec::new())
///     }
/// }
///
/// let catalog = Fixed.fetch_events()?;
/// assert_eq!(catalog.len(), 1);
/// # Ok::<(), CatalogError>(())
/// ```
pub trait CatalogSource {
    /// Fetch the full event list, ordered by date.
    fn fetch_events(&self) -> Result<Catalog, CatalogError>;

    /// Fetch the category list, ordered by name.
    fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn catalog() -> Catalog {
        Catalog::new(vec![
            Event::new("1", "First").with_category("Technical"),
            Event::new("1", "Shadowed").with_category("Cultural"),
            Event::new("2", "Second"),
        ])
    }

    #[rstest]
    fn lookup_returns_first_match(catalog: Catalog) {
        let event = catalog.get("1").expect("event 1");
        assert_eq!(event.title, "First");
    }

    #[rstest]
    fn iteration_keeps_backend_order(catalog: Catalog) {
        let titles: Vec<&str> = catalog.iter().map(|event| event.title.as_str()).collect();
        assert_eq!(titles, ["First", "Shadowed", "Second"]);
    }

    #[rstest]
    #[case(CatalogError::NetworkError { url: "u".into(), message: "m".into() }, true)]
    #[case(CatalogError::Timeout { url: "u".into(), timeout_secs: 5 }, true)]
    #[case(CatalogError::HttpError { url: "u".into(), status: 500, message: "m".into() }, false)]
    #[case(CatalogError::ParseError { message: "m".into() }, false)]
    #[case(CatalogError::ReadError { path: "p".into(), message: "m".into() }, false)]
    #[case(CatalogError::Interrupted, false)]
    fn transient_errors_are_classified(#[case] error: CatalogError, #[case] transient: bool) {
        assert_eq!(error.is_transient(), transient);
    }
}
