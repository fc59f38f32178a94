//! Catalog search with the filter panel's query, category, date and sort
//! controls.
//!
//! # Examples
//! ```
//! use chrono::NaiveDate;
//! use eventwise_core::{Catalog, DateRange, Event, SearchFilters, SortOrder};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
//! let catalog = Catalog::new(vec![
//!     Event::new("1", "Robotics Workshop").with_category("Workshop").with_rating(4.0),
//!     Event::new("2", "AI Hackathon").with_category("Technical").with_rating(4.8),
//!     Event::new("3", "AI Ethics Panel").with_category("Technical").with_rating(3.9),
//! ]);
//!
//! let filters = SearchFilters::new()
//!     .with_query("ai")
//!     .with_category("technical")
//!     .with_sort(SortOrder::Rating);
//! let ids: Vec<&str> = filters
//!     .apply(&catalog, today)
//!     .into_iter()
//!     .map(|event| event.id.as_str())
//!     .collect();
//! assert_eq!(ids, ["2", "3"]);
//! assert_eq!(filters.active_filter_count(), 2);
//! assert_eq!(DateRange::default(), DateRange::AnyTime);
//! ```

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::{Catalog, Event};

/// Category label meaning "no category filter".
const ALL_CATEGORIES: &str = "All";

/// Window of event dates to keep, relative to the evaluation day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    /// Keep every event, including undated ones.
    #[default]
    AnyTime,
    /// Events happening today.
    Today,
    /// Events within the next seven days, today included.
    ThisWeek,
    /// Events within the next thirty days, today included.
    ThisMonth,
    /// Events today or later.
    Upcoming,
}

impl DateRange {
    /// Return the range as a kebab-case `&str`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AnyTime => "any-time",
            Self::Today => "today",
            Self::ThisWeek => "this-week",
            Self::ThisMonth => "this-month",
            Self::Upcoming => "upcoming",
        }
    }

    fn contains(self, days_until: Option<i64>) -> bool {
        match (self, days_until) {
            (Self::AnyTime, _) => true,
            (_, None) => false,
            (Self::Today, Some(days)) => days == 0,
            (Self::ThisWeek, Some(days)) => (0..=7).contains(&days),
            (Self::ThisMonth, Some(days)) => (0..=30).contains(&days),
            (Self::Upcoming, Some(days)) => days >= 0,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DateRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_label(s).as_str() {
            "anytime" => Ok(Self::AnyTime),
            "today" => Ok(Self::Today),
            "thisweek" => Ok(Self::ThisWeek),
            "thismonth" => Ok(Self::ThisMonth),
            "upcoming" => Ok(Self::Upcoming),
            _ => Err(format!("unknown date range '{s}'")),
        }
    }
}

/// Ordering applied after filtering. Every order is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Keep catalog order.
    #[default]
    Relevance,
    /// Soonest first; undated events last.
    Date,
    /// Highest rated first.
    Rating,
    /// Most registrations first.
    Popularity,
}

impl SortOrder {
    /// Return the order as a lowercase `&str`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Date => "date",
            Self::Rating => "rating",
            Self::Popularity => "popularity",
        }
    }

    fn compare(self, a: &Event, b: &Event) -> Ordering {
        match self {
            Self::Relevance => Ordering::Equal,
            Self::Date => match (a.date, b.date) {
                (Some(left), Some(right)) => left.cmp(&right),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::Rating => b.rating.total_cmp(&a.rating),
            Self::Popularity => b.registrations.cmp(&a.registrations),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise_label(s).as_str() {
            "relevance" => Ok(Self::Relevance),
            "date" => Ok(Self::Date),
            "rating" => Ok(Self::Rating),
            "popularity" => Ok(Self::Popularity),
            _ => Err(format!("unknown sort order '{s}'")),
        }
    }
}

fn normalise_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Search and filter settings for browsing the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFilters {
    /// Free-text query; blank matches everything.
    pub query: String,
    /// Category name to keep; `None` or `"All"` keeps every category.
    pub category: Option<String>,
    /// Date window to keep.
    pub date_range: DateRange,
    /// Result ordering.
    pub sort_by: SortOrder,
}

impl SearchFilters {
    /// Filters that keep the whole catalog in its original order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text query.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Restrict results to a category (case-insensitive).
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict results to a date window.
    #[must_use]
    pub const fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    /// Set the result ordering.
    #[must_use]
    pub const fn with_sort(mut self, sort_by: SortOrder) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Number of non-default panel settings, excluding the query.
    pub fn active_filter_count(&self) -> usize {
        [
            self.category_filter().is_some(),
            self.date_range != DateRange::AnyTime,
            self.sort_by != SortOrder::Relevance,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Apply the filters to `catalog`, evaluating date windows against
    /// `today`.
    pub fn apply<'a>(&self, catalog: &'a Catalog, today: NaiveDate) -> Vec<&'a Event> {
        let needle = self.query.trim().to_lowercase();
        let category = self.category_filter().map(str::to_lowercase);

        let mut matches: Vec<&Event> = catalog
            .iter()
            .filter(|event| matches_query(event, &needle))
            .filter(|event| match &category {
                Some(wanted) => event
                    .category()
                    .is_some_and(|name| name.to_lowercase() == *wanted),
                None => true,
            })
            .filter(|event| self.date_range.contains(event.days_until(today)))
            .collect();
        matches.sort_by(|a, b| self.sort_by.compare(a, b));
        matches
    }

    fn category_filter(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case(ALL_CATEGORIES))
    }
}

fn matches_query(event: &Event, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    [
        event.title.as_str(),
        event.description.as_str(),
        event.society.as_str(),
        event.venue.as_str(),
    ]
    .into_iter()
    .chain(event.tags.iter().map(String::as_str))
    .any(|field| field.to_lowercase().contains(needle))
}
