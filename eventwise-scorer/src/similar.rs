//! "Similar events" rail for the event detail page.
#![forbid(unsafe_code)]

use eventwise_core::{Catalog, Event};

use crate::recommend::{ScoredEvent, count_as_f64, sort_descending};
use crate::{Recommender, SimilarityWeights};

/// Return up to `limit` catalog events most similar to `event`.
///
/// The score ignores any user history: same category, shared tags, same
/// society and a close average rating all count. The source event itself is
/// never returned, matched by identifier. Unlike
/// [`Recommender::rank`], zero-scored events are kept, so a catalog with
/// enough events always fills the rail.
///
/// # Examples
/// ```
/// use eventwise_core::{Catalog, Event};
/// use eventwise_scorer::similar_to;
///
/// let catalog = Catalog::new(vec![
///     Event::new("1", "TechFest").with_category("Technical").with_tags(["AI"]),
///     Event::new("2", "Jazz Night").with_category("Cultural"),
///     Event::new("3", "ML Meetup").with_category("Technical").with_tags(["AI"]),
/// ]);
/// let source = catalog.get("1").unwrap();
///
/// let ids: Vec<&str> = similar_to(source, &catalog, 4)
///     .iter()
///     .map(|event| event.id.as_str())
///     .collect();
/// assert_eq!(ids, ["3", "2"]);
/// ```
#[must_use]
pub fn similar_to<'a>(event: &Event, catalog: &'a Catalog, limit: usize) -> Vec<&'a Event> {
    Recommender::default().similar_to(event, catalog, limit)
}

pub(crate) fn rank_similar<'a>(
    event: &Event,
    catalog: &'a Catalog,
    limit: usize,
    weights: &SimilarityWeights,
) -> Vec<ScoredEvent<'a>> {
    let mut scored: Vec<ScoredEvent<'a>> = catalog
        .iter()
        .filter(|candidate| candidate.id != event.id)
        .map(|candidate| ScoredEvent {
            event: candidate,
            score: similarity(event, candidate, weights),
        })
        .collect();
    sort_descending(&mut scored);
    scored.truncate(limit);
    scored
}

#[expect(
    clippy::float_arithmetic,
    reason = "similarity is a sum of weighted matches"
)]
fn similarity(source: &Event, candidate: &Event, weights: &SimilarityWeights) -> f64 {
    let mut score = 0.0;
    if candidate.shares_category_with(source) {
        score += weights.same_category;
    }
    score += count_as_f64(candidate.shared_tag_count(source)) * weights.tag_overlap;
    if candidate.society == source.society {
        score += weights.same_society;
    }
    if (candidate.rating - source.rating).abs() < SimilarityWeights::RATING_TOLERANCE {
        score += weights.close_rating;
    }
    score
}
