use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;

/// Highest rating an event can carry.
pub const MAX_EVENT_RATING: f64 = 5.0;

/// Opaque identifier of an event as issued by the backend.
///
/// # Examples
/// ```
/// use eventwise_core::EventId;
///
/// let id = EventId::from("42");
/// assert_eq!(id.as_str(), "42");
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct EventId(String);

impl EventId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(raw: &str) -> Self {
        Self(raw.to_owned())
    }
}

impl From<String> for EventId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl std::borrow::Borrow<str> for EventId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A campus event as seen by the recommendation engine.
///
/// Events are read-only snapshots of backend rows. Optional backend fields are
/// already defaulted: a missing rating is `0.0`, missing tags are empty and a
/// missing society is the empty string. See
/// [`EventRecord`](crate::EventRecord) for the conversion rules.
///
/// # Examples
/// ```
/// use eventwise_core::Event;
///
/// let event = Event::new("1", "TechFest")
///     .with_category("Technical")
///     .with_tags(["AI", "Robotics"])
///     .with_rating(4.5)
///     .with_registrations(120)
///     .with_society("TechSoc");
///
/// assert_eq!(event.category(), Some("Technical"));
/// assert_eq!(event.tags.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// Display title.
    pub title: String,
    /// Category name, when the event is categorised.
    pub category: Option<String>,
    /// Free-form tags in backend order. Duplicates are kept.
    pub tags: Vec<String>,
    /// Average rating in `0.0..=5.0`.
    pub rating: f64,
    /// Number of registered attendees.
    pub registrations: u32,
    /// Organising society.
    pub society: String,
    /// Calendar date of the event, if known.
    pub date: Option<NaiveDate>,
    /// Long-form description.
    pub description: String,
    /// Venue name.
    pub venue: String,
}

impl Event {
    /// Construct an event with the given identifier and title and every other
    /// field defaulted.
    pub fn new(id: impl Into<EventId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: None,
            tags: Vec::new(),
            rating: 0.0,
            registrations: 0,
            society: String::new(),
            date: None,
            description: String::new(),
            venue: String::new(),
        }
    }

    /// Set the category name.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Replace the tag list.
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the rating. Non-finite values become `0.0` and the result is
    /// clamped into `0.0..=5.0`.
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = sanitise_rating(rating);
        self
    }

    /// Set the registration count.
    #[must_use]
    pub fn with_registrations(mut self, registrations: u32) -> Self {
        self.registrations = registrations;
        self
    }

    /// Set the organising society.
    #[must_use]
    pub fn with_society(mut self, society: impl Into<String>) -> Self {
        self.society = society.into();
        self
    }

    /// Set the event date.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the venue.
    #[must_use]
    pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    /// Return the category name, if any.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Report whether both events carry the same, present, category.
    ///
    /// # Examples
    /// ```
    /// use eventwise_core::Event;
    ///
    /// let a = Event::new("1", "A").with_category("Sports");
    /// let b = Event::new("2", "B").with_category("Sports");
    /// let c = Event::new("3", "C");
    /// assert!(a.shares_category_with(&b));
    /// assert!(!a.shares_category_with(&c));
    /// assert!(!c.shares_category_with(&c.clone()));
    /// ```
    pub fn shares_category_with(&self, other: &Self) -> bool {
        matches!((self.category(), other.category()), (Some(a), Some(b)) if a == b)
    }

    /// Count the distinct tag values this event shares with `other`.
    ///
    /// Duplicate tags on either side are counted once.
    ///
    /// # Examples
    /// ```
    /// use eventwise_core::Event;
    ///
    /// let a = Event::new("1", "A").with_tags(["AI", "AI", "ML"]);
    /// let b = Event::new("2", "B").with_tags(["AI", "Cloud"]);
    /// assert_eq!(a.shared_tag_count(&b), 1);
    /// ```
    pub fn shared_tag_count(&self, other: &Self) -> usize {
        let own: BTreeSet<&str> = self.tags.iter().map(String::as_str).collect();
        own.into_iter()
            .filter(|tag| other.tags.iter().any(|candidate| candidate == tag))
            .count()
    }

    /// Whole days from `today` until the event, negative for past events.
    ///
    /// Returns `None` for undated events.
    pub fn days_until(&self, today: NaiveDate) -> Option<i64> {
        self.date
            .map(|date| date.signed_duration_since(today).num_days())
    }
}

pub(crate) fn sanitise_rating(rating: f64) -> f64 {
    if rating.is_finite() {
        rating.clamp(0.0, MAX_EVENT_RATING)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(4.5, 4.5)]
    #[case(-1.0, 0.0)]
    #[case(7.0, 5.0)]
    #[case(f64::NAN, 0.0)]
    #[case(f64::INFINITY, 0.0)]
    fn rating_is_sanitised(#[case] raw: f64, #[case] expected: f64) {
        let event = Event::new("1", "Talk").with_rating(raw);
        assert_eq!(event.rating, expected);
    }

    #[rstest]
    fn shared_tags_ignore_duplicates_on_both_sides() {
        let a = Event::new("1", "A").with_tags(["AI", "AI", "ML"]);
        let b = Event::new("2", "B").with_tags(["ML", "ML", "AI", "Web"]);
        assert_eq!(a.shared_tag_count(&b), 2);
        assert_eq!(b.shared_tag_count(&a), 2);
    }

    #[rstest]
    fn shared_tags_are_case_sensitive() {
        let a = Event::new("1", "A").with_tags(["ai"]);
        let b = Event::new("2", "B").with_tags(["AI"]);
        assert_eq!(a.shared_tag_count(&b), 0);
    }

    #[rstest]
    #[case(13, Some(3))]
    #[case(8, Some(-2))]
    #[case(10, Some(0))]
    fn days_until_counts_calendar_days(#[case] day: u32, #[case] expected: Option<i64>) {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date");
        let date = NaiveDate::from_ymd_opt(2025, 3, day).expect("valid date");
        let event = Event::new("1", "A").with_date(date);
        assert_eq!(event.days_until(today), expected);
    }

    #[rstest]
    fn undated_event_has_no_countdown() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date");
        assert_eq!(Event::new("1", "A").days_until(today), None);
    }

    #[rstest]
    fn event_id_borrows_as_str() {
        let mut ids = std::collections::BTreeSet::new();
        ids.insert(EventId::from("7"));
        assert!(ids.contains("7"));
    }
}
