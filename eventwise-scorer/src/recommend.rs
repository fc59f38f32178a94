//! Personalised event ranking over the in-memory catalog.
//!
//! Every catalog event is scored against the user's [`PreferenceSnapshot`]
//! as a sum of independent terms: category affinity, attended-category bonus,
//! similarity to highly rated events, positive-feedback propagation,
//! popularity, quality and an optional urgency boost. Registered events are
//! pinned to [`REGISTERED_SCORE`] so they never surface.

#![forbid(unsafe_code)]

use chrono::NaiveDate;
use eventwise_core::{Catalog, Event, PreferenceSnapshot};
use log::debug;

use crate::{RecencyPolicy, ScoreWeights, ScoreWeightsError, SimilarityWeights, similar};

/// Score assigned to events the user is already registered for.
pub const REGISTERED_SCORE: f64 = -1.0;

/// Number of events returned when callers do not ask for a specific limit.
pub const DEFAULT_LIMIT: usize = 4;

/// Lowest star value that marks a rating or feedback as positive.
pub const POSITIVE_THRESHOLD: u8 = 4;

/// An event paired with its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEvent<'a> {
    /// Catalog event.
    pub event: &'a Event,
    /// Additive score; higher is better.
    pub score: f64,
}

/// Scores and ranks catalog events for one user's history.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use eventwise_core::{Catalog, Event, PreferenceSnapshot};
/// use eventwise_scorer::Recommender;
///
/// let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
/// let catalog = Catalog::new(vec![
///     Event::new("1", "TechFest").with_category("Technical").with_rating(4.5),
///     Event::new("2", "Open Mic").with_category("Cultural").with_rating(3.0),
/// ]);
/// let mut history = PreferenceSnapshot::default();
/// history.category_preferences.insert("Cultural".into(), 4.0);
///
/// let ranked = Recommender::default().rank(&catalog, &history, 1, today);
/// let ids: Vec<&str> = ranked.iter().map(|event| event.id.as_str()).collect();
/// assert_eq!(ids, ["2"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Recommender {
    weights: ScoreWeights,
    similarity: SimilarityWeights,
    recency: RecencyPolicy,
}

impl Recommender {
    /// Construct a recommender from validated weights.
    ///
    /// # Errors
    /// Returns [`ScoreWeightsError`] when any weight is negative or not
    /// finite.
    pub fn new(
        weights: ScoreWeights,
        similarity: SimilarityWeights,
        recency: RecencyPolicy,
    ) -> Result<Self, ScoreWeightsError> {
        Ok(Self {
            weights: weights.validate()?,
            similarity: similarity.validate()?,
            recency,
        })
    }

    /// Replace the recency policy.
    #[must_use]
    pub const fn with_recency(mut self, recency: RecencyPolicy) -> Self {
        self.recency = recency;
        self
    }

    /// Active recommendation weights.
    #[must_use]
    pub const fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Active recency policy.
    #[must_use]
    pub const fn recency(&self) -> RecencyPolicy {
        self.recency
    }

    /// Score a single event.
    ///
    /// Deterministic and side-effect free. Returns exactly
    /// [`REGISTERED_SCORE`] when the user is registered for `event`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the recommendation score is a sum of weighted terms"
    )]
    pub fn score(
        &self,
        event: &Event,
        snapshot: &PreferenceSnapshot,
        catalog: &Catalog,
        today: NaiveDate,
    ) -> f64 {
        if snapshot.is_registered(event.id.as_str()) {
            return REGISTERED_SCORE;
        }
        self.affinity(event, snapshot)
            + self.attended_bonus(event, snapshot, catalog)
            + self.rated_similarity(event, snapshot, catalog)
            + self.feedback_propagation(event, snapshot, catalog)
            + self.popularity(event)
            + self.quality(event)
            + self.recency.boost(event, today, &self.weights)
    }

    /// Rank the catalog and return at most `limit` positively scored events.
    ///
    /// Ties keep catalog order.
    #[must_use]
    pub fn rank<'a>(
        &self,
        catalog: &'a Catalog,
        snapshot: &PreferenceSnapshot,
        limit: usize,
        today: NaiveDate,
    ) -> Vec<&'a Event> {
        self.rank_scored(catalog, snapshot, limit, today)
            .into_iter()
            .map(|scored| scored.event)
            .collect()
    }

    /// Like [`Self::rank`] but keeps the scores alongside the events.
    #[must_use]
    pub fn rank_scored<'a>(
        &self,
        catalog: &'a Catalog,
        snapshot: &PreferenceSnapshot,
        limit: usize,
        today: NaiveDate,
    ) -> Vec<ScoredEvent<'a>> {
        let mut scored: Vec<ScoredEvent<'a>> = catalog
            .iter()
            .map(|event| ScoredEvent {
                event,
                score: self.score(event, snapshot, catalog, today),
            })
            .filter(|candidate| candidate.score > 0.0)
            .collect();
        sort_descending(&mut scored);
        scored.truncate(limit);
        debug!(
            "ranked {} of {} catalog events (limit {limit})",
            scored.len(),
            catalog.len()
        );
        scored
    }

    /// Events most similar to `event`, independent of any user history.
    ///
    /// See [`similar_to`](crate::similar_to).
    #[must_use]
    pub fn similar_to<'a>(
        &self,
        event: &Event,
        catalog: &'a Catalog,
        limit: usize,
    ) -> Vec<&'a Event> {
        similar::rank_similar(event, catalog, limit, &self.similarity)
            .into_iter()
            .map(|scored| scored.event)
            .collect()
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "affinity scales the accumulated category weight"
    )]
    fn affinity(&self, event: &Event, snapshot: &PreferenceSnapshot) -> f64 {
        snapshot.category_weight(event.category()) * self.weights.category_affinity
    }

    fn attended_bonus(&self, event: &Event, snapshot: &PreferenceSnapshot, catalog: &Catalog) -> f64 {
        let Some(category) = event.category() else {
            return 0.0;
        };
        let attended_same_category = catalog.iter().any(|candidate| {
            snapshot.has_attended(candidate.id.as_str()) && candidate.category() == Some(category)
        });
        if attended_same_category {
            self.weights.attended_category_bonus
        } else {
            0.0
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "similarity to rated events accumulates weighted overlaps"
    )]
    fn rated_similarity(
        &self,
        event: &Event,
        snapshot: &PreferenceSnapshot,
        catalog: &Catalog,
    ) -> f64 {
        catalog
            .iter()
            .filter(|rated| {
                snapshot
                    .rating(rated.id.as_str())
                    .is_some_and(|stars| stars >= POSITIVE_THRESHOLD)
            })
            .map(|rated| {
                let tags = count_as_f64(event.shared_tag_count(rated)) * self.weights.rated_tag_overlap;
                let society = if event.society == rated.society {
                    self.weights.rated_same_society
                } else {
                    0.0
                };
                tags + society
            })
            .sum()
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "feedback propagation multiplies a flat bonus by a match count"
    )]
    fn feedback_propagation(
        &self,
        event: &Event,
        snapshot: &PreferenceSnapshot,
        catalog: &Catalog,
    ) -> f64 {
        let matches = snapshot
            .feedback_at_least(POSITIVE_THRESHOLD)
            .filter_map(|id| catalog.get(id.as_str()))
            .filter(|positive| positive.shares_category_with(event))
            .count();
        count_as_f64(matches) * self.weights.positive_feedback
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "popularity grows logarithmically with registrations"
    )]
    fn popularity(&self, event: &Event) -> f64 {
        (f64::from(event.registrations) + 1.0).ln() * self.weights.popularity
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "quality scales the average rating"
    )]
    fn quality(&self, event: &Event) -> f64 {
        event.rating * self.weights.quality
    }
}

/// Stable descending sort by score.
pub(crate) fn sort_descending(scored: &mut [ScoredEvent<'_>]) {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Convert a small count to `f64`, saturating at `u32::MAX`.
pub(crate) fn count_as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}
