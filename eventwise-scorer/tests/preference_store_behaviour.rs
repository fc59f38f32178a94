#![expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]

//! Behavioural coverage for the file-backed preference store.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use eventwise_core::Stars;
use eventwise_core::test_support::campus_catalog;
use eventwise_scorer::{FileKeyValueStore, PreferenceStore, SNAPSHOT_KEY};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

/// World state for preference store scenarios.
#[derive(Debug)]
struct PreferenceWorld {
    temp: TempDir,
    store: RefCell<Option<PreferenceStore<FileKeyValueStore>>>,
}

impl PreferenceWorld {
    fn state_dir(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.temp.path().join("state")).expect("utf8 state dir")
    }

    fn open(&self) {
        let store = PreferenceStore::load(FileKeyValueStore::new(self.state_dir()));
        self.store.replace(Some(store));
    }

    fn with_store<T>(&self, f: impl FnOnce(&mut PreferenceStore<FileKeyValueStore>) -> T) -> T {
        let mut slot = self.store.borrow_mut();
        let store = slot.as_mut().expect("store opened");
        f(store)
    }
}

#[fixture]
fn world() -> PreferenceWorld {
    PreferenceWorld {
        temp: TempDir::new().expect("create temporary directory"),
        store: RefCell::new(None),
    }
}

fn stars(raw: u8) -> Stars {
    Stars::new(raw).expect("valid star value")
}

#[given("a preference store in a fresh state directory")]
fn given_fresh_store(world: &PreferenceWorld) {
    world.open();
}

#[given("a corrupt preference file in a fresh state directory")]
fn given_corrupt_file(world: &PreferenceWorld) {
    let dir = world.state_dir();
    std::fs::create_dir_all(&dir).expect("create state dir");
    std::fs::write(dir.join(format!("{SNAPSHOT_KEY}.json")), "{ not json").expect("write file");
}

#[when("the student rates event {id} with {count} stars")]
fn when_rates(world: &PreferenceWorld, id: String, count: u8) {
    world.with_store(|store| store.rate_event(id, stars(count), &campus_catalog()));
}

#[when("the student gives event {id} feedback of {count} stars")]
fn when_feedback(world: &PreferenceWorld, id: String, count: u8) {
    world.with_store(|store| store.submit_feedback(id, stars(count), &campus_catalog()));
}

#[when("the student attends event {id}")]
fn when_attends(world: &PreferenceWorld, id: String) {
    world.with_store(|store| store.mark_attended(id));
}

#[when("the store is reloaded from the state directory")]
fn when_reloaded(world: &PreferenceWorld) {
    world.open();
}

#[then("event {id} has rating {count}")]
fn then_rating(world: &PreferenceWorld, id: String, count: u8) {
    let rating = world.with_store(|store| store.snapshot().rating(&id));
    assert_eq!(rating, Some(count));
}

#[then("category {name} has weight {weight}")]
#[expect(clippy::float_cmp, reason = "star credits are small integers")]
fn then_weight(world: &PreferenceWorld, name: String, weight: f64) {
    let actual = world.with_store(|store| store.snapshot().category_weight(Some(&name)));
    assert_eq!(actual, weight);
}

#[then("the student has {count} attended event")]
fn then_attended(world: &PreferenceWorld, count: usize) {
    let attended = world.with_store(|store| store.snapshot().attended_events.len());
    assert_eq!(attended, count);
}

#[then("the history is empty")]
fn then_empty(world: &PreferenceWorld) {
    assert!(world.with_store(|store| store.snapshot().is_empty()));
}

#[scenario(path = "tests/features/preference_store.feature", index = 0)]
fn ratings_survive_restart(world: PreferenceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/preference_store.feature", index = 1)]
fn unknown_feedback_credits_general(world: PreferenceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/preference_store.feature", index = 2)]
fn attendance_is_deduplicated(world: PreferenceWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/preference_store.feature", index = 3)]
fn corrupt_file_starts_empty(world: PreferenceWorld) {
    let _ = world;
}
