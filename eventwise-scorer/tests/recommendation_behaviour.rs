#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural coverage for personalised ranking and the similar-events rail.

use std::cell::RefCell;

use eventwise_core::test_support::{campus_catalog, reference_day};
use eventwise_core::{Catalog, Event, PreferenceSnapshot};
use eventwise_scorer::{REGISTERED_SCORE, Recommender, similar_to};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// World state for recommendation scenarios.
#[derive(Debug, Default)]
struct RecommendationWorld {
    catalog: RefCell<Catalog>,
    history: RefCell<PreferenceSnapshot>,
    results: RefCell<Vec<String>>,
}

#[fixture]
fn world() -> RecommendationWorld {
    RecommendationWorld::default()
}

fn ids_of(events: &[&Event]) -> Vec<String> {
    events.iter().map(|event| event.id.to_string()).collect()
}

fn expected_ids(raw: &str) -> Vec<String> {
    raw.trim()
        .trim_matches('"')
        .split(',')
        .map(str::to_owned)
        .collect()
}

#[given("the technical campus catalog")]
fn given_campus_catalog(world: &RecommendationWorld) {
    world.catalog.replace(campus_catalog());
}

#[given("an empty catalog")]
fn given_empty_catalog(world: &RecommendationWorld) {
    world.catalog.replace(Catalog::empty());
}

#[given("a history with a five star rating for event 2 and Technical affinity 10")]
fn given_technical_history(world: &RecommendationWorld) {
    let mut history = world.history.borrow_mut();
    history.ratings.insert("2".into(), 5);
    history
        .category_preferences
        .insert("Technical".into(), 10.0);
}

#[given("the student is registered for event {id}")]
fn given_registered(world: &RecommendationWorld, id: String) {
    world.history.borrow_mut().registered_events.insert(id.into());
}

#[when("I ask for recommendations limited to {limit}")]
fn when_recommend(world: &RecommendationWorld, limit: usize) {
    let catalog = world.catalog.borrow();
    let history = world.history.borrow();
    let ranked = Recommender::default().rank(&catalog, &history, limit, reference_day());
    world.results.replace(ids_of(&ranked));
}

#[when("I ask for events similar to event {id}")]
fn when_similar(world: &RecommendationWorld, id: String) {
    let catalog = world.catalog.borrow();
    let source = catalog.get(&id).expect("source event in catalog");
    world.results.replace(ids_of(&similar_to(source, &catalog, 4)));
}

#[then("the recommendations are {ids}")]
fn then_recommendations(world: &RecommendationWorld, ids: String) {
    assert_eq!(*world.results.borrow(), expected_ids(&ids));
}

#[then("the similar events are {ids}")]
fn then_similar(world: &RecommendationWorld, ids: String) {
    assert_eq!(*world.results.borrow(), expected_ids(&ids));
}

#[then("there are no recommendations")]
fn then_none(world: &RecommendationWorld) {
    assert!(world.results.borrow().is_empty());
}

#[then("event {id} scores exactly -1")]
#[expect(clippy::float_cmp, reason = "the registered sentinel is exact")]
fn then_sentinel(world: &RecommendationWorld, id: String) {
    let catalog = world.catalog.borrow();
    let history = world.history.borrow();
    let event = catalog.get(&id).expect("event in catalog");
    let score = Recommender::default().score(event, &history, &catalog, reference_day());
    assert_eq!(score, REGISTERED_SCORE);
}

#[scenario(path = "tests/features/recommendations.feature", index = 0)]
fn upcoming_event_ranks_first(world: RecommendationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/recommendations.feature", index = 1)]
fn registered_events_excluded(world: RecommendationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/recommendations.feature", index = 2)]
fn empty_catalog(world: RecommendationWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/recommendations.feature", index = 3)]
fn similar_events_exclude_source(world: RecommendationWorld) {
    let _ = world;
}
