//! Loosely typed backend rows and their normalisation into [`Event`].
//!
//! The backend returns `events` rows joined with `categories(name, icon)`.
//! Nearly every column may be `null` or missing, so [`EventRecord`] keeps them
//! optional and [`From<EventRecord> for Event`](Event) applies the defaulting
//! rules in one place:
//!
//! - absent rating → `0.0` (non-finite values too, then clamped to `0..=5`);
//! - absent tags → empty;
//! - absent or negative registrations → `0`;
//! - absent society, description or venue → empty string;
//! - absent or unparsable date → undated;
//! - category → the joined category name, else an inline `category` name.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::event::sanitise_rating;
use crate::{Event, EventId};

/// Event row as returned by the backend query client.
///
/// # Examples
/// ```
/// use eventwise_core::{Event, EventRecord};
///
/// let json = r#"{
///     "id": "1",
///     "title": "TechFest",
///     "categories": { "name": "Technical", "icon": "💻" },
///     "tags": ["AI"],
///     "rating": null,
///     "registrations": 100,
///     "society": "TechSoc",
///     "date": "2025-03-14"
/// }"#;
/// let record: EventRecord = serde_json::from_str(json)?;
/// let event = Event::from(record);
/// assert_eq!(event.category(), Some("Technical"));
/// assert_eq!(event.rating, 0.0);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EventRecord {
    /// Row identifier. Accepts strings or integers.
    pub id: RecordId,
    /// Event title.
    #[serde(default)]
    pub title: Option<String>,
    /// Long-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Foreign key into `categories`.
    #[serde(default)]
    pub category_id: Option<String>,
    /// Joined category row.
    #[serde(default)]
    pub categories: Option<CategoryRef>,
    /// Inline category name used by flat exports.
    #[serde(default)]
    pub category: Option<String>,
    /// Venue name.
    #[serde(default)]
    pub venue: Option<String>,
    /// Event date, `YYYY-MM-DD` or an ISO timestamp.
    #[serde(default)]
    pub date: Option<String>,
    /// Free-form start time.
    #[serde(default)]
    pub time: Option<String>,
    /// Tag list.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// Average rating.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of ratings contributing to `rating`.
    #[serde(default)]
    pub rating_count: Option<i64>,
    /// Registration count.
    #[serde(default)]
    pub registrations: Option<i64>,
    /// Organising society.
    #[serde(default)]
    pub society: Option<String>,
}

/// Identifier column that some exports encode as a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Textual identifier (UUIDs, slugs).
    Text(String),
    /// Numeric identifier.
    Number(i64),
}

impl From<RecordId> for EventId {
    fn from(id: RecordId) -> Self {
        match id {
            RecordId::Text(text) => Self::new(text),
            RecordId::Number(number) => Self::new(number.to_string()),
        }
    }
}

/// Joined `categories(name, icon)` sub-object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryRef {
    /// Category display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Category icon glyph.
    #[serde(default)]
    pub icon: Option<String>,
}

impl From<EventRecord> for Event {
    fn from(record: EventRecord) -> Self {
        let category = record
            .categories
            .and_then(|joined| joined.name)
            .or(record.category)
            .filter(|name| !name.trim().is_empty());
        let registrations = record.registrations.map_or(0, clamp_registrations);

        Self {
            id: record.id.into(),
            title: record.title.unwrap_or_default(),
            category,
            tags: record.tags.unwrap_or_default(),
            rating: record.rating.map_or(0.0, sanitise_rating),
            registrations,
            society: record.society.unwrap_or_default(),
            date: record.date.as_deref().and_then(parse_event_date),
            description: record.description.unwrap_or_default(),
            venue: record.venue.unwrap_or_default(),
        }
    }
}

fn clamp_registrations(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

/// Parse a backend date column.
///
/// Accepts plain dates and timestamps whose first ten characters form a date.
pub fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    trimmed
        .parse::<NaiveDate>()
        .ok()
        .or_else(|| trimmed.get(..10).and_then(|prefix| prefix.parse().ok()))
}
