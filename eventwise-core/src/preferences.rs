//! Per-user interaction history used to personalise recommendations.
//!
//! [`PreferenceSnapshot`] is a plain aggregate. Scoring code reads it through
//! the lookup helpers, which treat anything missing as absent rather than
//! failing. Mutation and persistence live with the preference store in
//! `eventwise-scorer`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use thiserror::Error;

use crate::EventId;

/// Aggregate of a user's recorded interactions.
///
/// Serialised with camelCase keys (`registeredEvents`, `attendedEvents`,
/// `ratings`, `feedbackScores`, `categoryPreferences`). Missing keys
/// deserialise as empty collections.
///
/// # Examples
/// ```
/// use eventwise_core::PreferenceSnapshot;
///
/// let mut snapshot = PreferenceSnapshot::default();
/// snapshot.ratings.insert("2".into(), 5);
/// snapshot.category_preferences.insert("Technical".into(), 10.0);
///
/// assert_eq!(snapshot.rating("2"), Some(5));
/// assert_eq!(snapshot.category_weight(Some("Technical")), 10.0);
/// assert_eq!(snapshot.category_weight(Some("Sports")), 0.0);
/// assert_eq!(snapshot.category_weight(None), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct PreferenceSnapshot {
    /// Events the user registered for.
    pub registered_events: BTreeSet<EventId>,
    /// Events the user attended.
    pub attended_events: BTreeSet<EventId>,
    /// Star ratings keyed by event, `1..=5`.
    pub ratings: BTreeMap<EventId, u8>,
    /// Post-event feedback scores keyed by event, `1..=5`.
    pub feedback_scores: BTreeMap<EventId, u8>,
    /// Accumulated affinity per category name.
    pub category_preferences: BTreeMap<String, f64>,
}

impl PreferenceSnapshot {
    /// Report whether the user registered for `id`.
    pub fn is_registered(&self, id: &str) -> bool {
        self.registered_events.contains(id)
    }

    /// Report whether the user attended `id`.
    pub fn has_attended(&self, id: &str) -> bool {
        self.attended_events.contains(id)
    }

    /// Return the user's rating for `id`, if any.
    pub fn rating(&self, id: &str) -> Option<u8> {
        self.ratings.get(id).copied()
    }

    /// Return the user's feedback score for `id`, if any.
    pub fn feedback(&self, id: &str) -> Option<u8> {
        self.feedback_scores.get(id).copied()
    }

    /// Return the accumulated weight for a category, `0.0` when unknown.
    pub fn category_weight(&self, category: Option<&str>) -> f64 {
        category
            .and_then(|name| self.category_preferences.get(name))
            .copied()
            .unwrap_or(0.0)
    }

    /// Iterate over events whose feedback score is at least `threshold`.
    pub fn feedback_at_least(&self, threshold: u8) -> impl Iterator<Item = &EventId> + '_ {
        self.feedback_scores
            .iter()
            .filter(move |(_, score)| **score >= threshold)
            .map(|(id, _)| id)
    }

    /// Report whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.registered_events.is_empty()
            && self.attended_events.is_empty()
            && self.ratings.is_empty()
            && self.feedback_scores.is_empty()
            && self.category_preferences.is_empty()
    }
}

/// A validated star value in `1..=5`, used for ratings and feedback.
///
/// # Examples
/// ```
/// use eventwise_core::Stars;
///
/// let stars = Stars::new(4)?;
/// assert_eq!(stars.get(), 4);
/// assert!(Stars::new(0).is_err());
/// assert!(Stars::new(6).is_err());
/// # Ok::<(), eventwise_core::StarsError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stars(u8);

impl Stars {
    /// Lowest accepted value.
    pub const MIN: u8 = 1;
    /// Highest accepted value.
    pub const MAX: u8 = 5;

    /// Validate and wrap a star value.
    pub const fn new(value: u8) -> Result<Self, StarsError> {
        if value >= Self::MIN && value <= Self::MAX {
            Ok(Self(value))
        } else {
            Err(StarsError::OutOfRange { value })
        }
    }

    /// Return the raw value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = StarsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors returned by [`Stars::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StarsError {
    /// The value was outside `1..=5`.
    #[error("star value {value} is outside 1..=5")]
    OutOfRange {
        /// Rejected value.
        value: u8,
    },
}
