//! Focused unit tests covering CLI configuration resolution and command output.

use super::helpers::{
    CAMPUS_EXPORT, StubSessionBuilder, TODAY, Workspace, printed_ids, run_cli, write_utf8,
};
use super::*;
use crate::recommend::{RecommendArgs, RecommendConfig, recommend_config_from_layers_for_test};
use crate::search::{SearchArgs, SearchConfig};
use crate::session::{CatalogConfig, StoreBackend, StoreConfig, env_var};
use camino::Utf8PathBuf;
use chrono::NaiveDate;
use eventwise_core::test_support::campus_catalog;
use eventwise_core::{CatalogError, Category, DateRange, SortOrder, StarsError};
use eventwise_scorer::RecencyPolicy;
use rstest::rstest;

fn backend_args() -> RecommendArgs {
    RecommendArgs {
        backend_url: Some("https://campus.example.com".to_owned()),
        api_key: Some("anon".to_owned()),
        today: Some(TODAY.to_owned()),
        ..RecommendArgs::default()
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    std::iter::once("eventwise")
        .chain(parts.iter().copied())
        .map(str::to_owned)
        .collect()
}

#[rstest]
fn env_var_names_follow_the_subcommand_layout() {
    assert_eq!(
        env_var("recommend", ARG_API_KEY),
        "EVENTWISE_CMDS_RECOMMEND_API_KEY"
    );
    assert_eq!(env_var("rate", ARG_STARS), "EVENTWISE_CMDS_RATE_STARS");
}

#[rstest]
fn recommend_without_a_catalog_source_errors() {
    let err = RecommendConfig::try_from(RecommendArgs::default())
        .expect_err("missing catalog should error");
    match err {
        CliError::MissingCatalogSource { command } => assert_eq!(command, "recommend"),
        other => panic!("expected MissingCatalogSource, found {other:?}"),
    }
}

#[rstest]
fn backend_without_api_key_errors() {
    let args = RecommendArgs {
        api_key: None,
        ..backend_args()
    };
    let err = RecommendConfig::try_from(args).expect_err("missing key should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_API_KEY);
            assert_eq!(env, "EVENTWISE_CMDS_RECOMMEND_API_KEY");
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn recommend_config_applies_defaults() {
    let config = RecommendConfig::try_from(backend_args()).expect("config should build");
    assert_eq!(
        config.catalog,
        CatalogConfig::Backend {
            base_url: "https://campus.example.com".to_owned(),
            api_key: "anon".to_owned(),
        }
    );
    assert_eq!(
        config.store,
        StoreConfig {
            state_dir: Utf8PathBuf::from(".eventwise"),
            backend: StoreBackend::File,
        }
    );
    assert_eq!(config.limit, eventwise_scorer::DEFAULT_LIMIT);
    assert_eq!(config.today, NaiveDate::from_ymd_opt(2025, 3, 10).expect("date"));
    assert_eq!(config.recency, RecencyPolicy::UpcomingBoost);
}

#[rstest]
fn catalog_file_wins_over_backend() {
    let args = RecommendArgs {
        catalog: Some(Utf8PathBuf::from("events.json")),
        ..backend_args()
    };
    let config = RecommendConfig::try_from(args).expect("config should build");
    assert_eq!(
        config.catalog,
        CatalogConfig::File(Utf8PathBuf::from("events.json"))
    );
}

#[rstest]
#[case::recency(
    RecommendArgs { recency: Some("sometimes".to_owned()), ..backend_args() },
    ARG_RECENCY
)]
#[case::today(
    RecommendArgs { today: Some("next tuesday".to_owned()), ..backend_args() },
    ARG_TODAY
)]
#[case::store(
    RecommendArgs { store: Some("postgres".to_owned()), ..backend_args() },
    ARG_STORE
)]
fn invalid_recommend_options_are_rejected(
    #[case] args: RecommendArgs,
    #[case] expected_field: &'static str,
) {
    let err = RecommendConfig::try_from(args).expect_err("invalid option should error");
    match err {
        CliError::InvalidValue { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected InvalidValue, found {other:?}"),
    }
}

#[rstest]
fn search_config_parses_panel_labels() {
    let args = SearchArgs {
        category: Some("Technical".to_owned()),
        date_range: Some("This Week".to_owned()),
        sort: Some("rating".to_owned()),
        today: Some(TODAY.to_owned()),
        backend_url: Some("https://campus.example.com".to_owned()),
        api_key: Some("anon".to_owned()),
        ..SearchArgs::default()
    };
    let config = SearchConfig::try_from(args).expect("config should build");
    assert_eq!(config.filters.date_range, DateRange::ThisWeek);
    assert_eq!(config.filters.sort_by, SortOrder::Rating);
    assert_eq!(config.filters.active_filter_count(), 3);
}

#[rstest]
fn validate_sources_reports_missing_catalog_file() {
    let workspace = Workspace::new();
    let config = CatalogConfig::File(workspace.catalog_path());
    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_CATALOG);
            assert_eq!(path, workspace.catalog_path());
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn validate_sources_rejects_directories() {
    let workspace = Workspace::new();
    write_utf8(&workspace.state_dir().join("marker"), b"x");
    let config = CatalogConfig::File(workspace.state_dir());
    let err = config.validate_sources().expect_err("expected failure");
    match err {
        CliError::SourcePathNotFile { field, .. } => assert_eq!(field, ARG_CATALOG),
        other => panic!("expected SourcePathNotFile, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "limit": "many" }));

    let err = recommend_config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "backend_url": "https://from-file.example.com",
            "api_key": "file-key",
            "limit": 10,
            "recency": "disabled",
        }),
        None,
    );
    composer.push_environment(json!({
        "api_key": "env-key",
        "limit": 6,
    }));
    composer.push_cli(json!({
        "limit": 2,
        "today": TODAY,
    }));

    let config =
        recommend_config_from_layers_for_test(composer.layers()).expect("merged config builds");
    assert_eq!(
        config.catalog,
        CatalogConfig::Backend {
            base_url: "https://from-file.example.com".to_owned(),
            api_key: "env-key".to_owned(),
        }
    );
    assert_eq!(config.limit, 2);
    assert_eq!(config.recency, RecencyPolicy::Disabled);
}

#[rstest]
fn recommend_reports_fetch_failures_as_a_notice() {
    let workspace = Workspace::new();
    let builder = StubSessionBuilder::failing(CatalogError::Timeout {
        url: "https://campus.example.com/rest/v1/events".to_owned(),
        timeout_secs: 30,
    });
    let output = run_cli(
        &argv(&[
            "recommend",
            "--backend-url",
            "https://campus.example.com",
            "--api-key",
            "anon",
            "--state-dir",
            workspace.state_dir().as_str(),
            "--today",
            TODAY,
        ]),
        &builder,
    )
    .expect("fetch failure is not fatal");

    assert!(printed_ids(&output).is_empty());
    let notice = output["notice"].as_str().expect("notice present");
    assert!(notice.contains("campus.example.com"), "{notice}");
}

#[rstest]
fn recommend_prints_scores() {
    let workspace = Workspace::new();
    let builder = StubSessionBuilder::with_catalog(campus_catalog());
    let output = run_cli(
        &argv(&[
            "recommend",
            "--backend-url",
            "https://campus.example.com",
            "--api-key",
            "anon",
            "--state-dir",
            workspace.state_dir().as_str(),
            "--today",
            TODAY,
        ]),
        &builder,
    )
    .expect("recommend succeeds");

    let events = output["events"].as_array().expect("events array");
    assert!(!events.is_empty());
    assert!(events.iter().all(|event| event["score"].as_f64() > Some(0.0)));
    assert!(output.get("notice").is_none());
}

#[rstest]
fn similar_requires_a_known_event() {
    let builder = StubSessionBuilder::with_catalog(campus_catalog());
    let err = run_cli(
        &argv(&[
            "similar",
            "404",
            "--backend-url",
            "https://campus.example.com",
            "--api-key",
            "anon",
        ]),
        &builder,
    )
    .expect_err("unknown event should error");
    match err {
        CliError::UnknownEvent { id } => assert_eq!(id, "404"),
        other => panic!("expected UnknownEvent, found {other:?}"),
    }
}

#[rstest]
fn categories_are_printed_from_the_source() {
    let builder = StubSessionBuilder::with_catalog(campus_catalog())
        .with_categories(vec![Category::new("c1", "Technical").with_icon("💻")]);
    let output = run_cli(
        &argv(&[
            "categories",
            "--backend-url",
            "https://campus.example.com",
            "--api-key",
            "anon",
        ]),
        &builder,
    )
    .expect("categories succeed");

    assert_eq!(output[0]["name"], "Technical");
    assert_eq!(output[0]["icon"], "💻");
}

#[rstest]
#[case::zero("0")]
#[case::six("6")]
fn out_of_range_stars_are_rejected(#[case] stars: &str) {
    let workspace = Workspace::new();
    workspace.write_catalog(CAMPUS_EXPORT);
    let err = run_cli(
        &argv(&[
            "rate",
            "1",
            stars,
            "--state-dir",
            workspace.state_dir().as_str(),
        ]),
        &DefaultSessionBuilder,
    )
    .expect_err("stars outside 1..=5 should error");
    match err {
        CliError::InvalidStars(StarsError::OutOfRange { value }) => {
            assert_eq!(value.to_string(), stars);
        }
        other => panic!("expected InvalidStars, found {other:?}"),
    }
}

#[rstest]
#[case::rate("rate", "EVENTWISE_CMDS_RATE_STARS")]
#[case::feedback("feedback", "EVENTWISE_CMDS_FEEDBACK_STARS")]
fn stars_commands_require_stars(#[case] command: &str, #[case] expected_env: &str) {
    let workspace = Workspace::new();
    let err = run_cli(
        &argv(&[command, "1", "--state-dir", workspace.state_dir().as_str()]),
        &DefaultSessionBuilder,
    )
    .expect_err("missing stars should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_STARS);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

fn backend_stars_argv(command: &str, workspace: &Workspace) -> Vec<String> {
    argv(&[
        command,
        "1",
        "5",
        "--backend-url",
        "https://campus.example.com",
        "--api-key",
        "anon",
        "--state-dir",
        workspace.state_dir().as_str(),
    ])
}

#[rstest]
#[case::rate("rate")]
#[case::feedback("feedback")]
fn stars_commands_fail_without_writing_when_the_fetch_fails(#[case] command: &str) {
    let workspace = Workspace::new();
    let builder = StubSessionBuilder::failing(CatalogError::Timeout {
        url: "https://campus.example.com/rest/v1/events".to_owned(),
        timeout_secs: 30,
    });

    let err = run_cli(&backend_stars_argv(command, &workspace), &builder)
        .expect_err("an unreachable catalog should fail the command");
    match err {
        CliError::FetchCatalog(CatalogError::Timeout { .. }) => {}
        other => panic!("expected FetchCatalog, found {other:?}"),
    }
    let snapshot = workspace
        .state_dir()
        .join(format!("{}.json", eventwise_scorer::SNAPSHOT_KEY));
    assert!(!snapshot.exists(), "nothing should be persisted");
}

#[rstest]
fn feedback_credits_the_fetched_category() {
    let workspace = Workspace::new();
    let builder = StubSessionBuilder::with_catalog(campus_catalog());
    let output = run_cli(&backend_stars_argv("feedback", &workspace), &builder)
        .expect("feedback succeeds");

    let weights = &output["preferences"]["categoryPreferences"];
    assert_eq!(weights["Technical"], serde_json::json!(10.0));
    assert!(weights.get("General").is_none());
}
