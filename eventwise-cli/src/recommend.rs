//! `recommend` and `similar` command implementations.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::Parser;
use eventwise_core::EventId;
use eventwise_scorer::{DEFAULT_LIMIT, PreferenceStore, RecencyPolicy, Recommender};
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::{EventListing, EventSummary, write_json};
use crate::session::{
    CatalogConfig, SessionBuilder, StoreConfig, env_var, fetch_catalog, fetch_catalog_or_empty,
    resolve_today,
};
use crate::{
    ARG_API_KEY, ARG_BACKEND_URL, ARG_CATALOG, ARG_EVENT, ARG_LIMIT, ARG_RECENCY, ARG_STATE_DIR,
    ARG_STORE, ARG_TODAY, CliError,
};

pub(crate) const CMD_RECOMMEND: &str = "recommend";
pub(crate) const CMD_SIMILAR: &str = "similar";

/// CLI arguments for the `recommend` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "recommend",
    long_about = "Rank the event catalog against the stored preference \
                 history and print the top events as JSON. Registered events \
                 are never recommended.",
    about = "Recommend events from the stored preference history"
)]
#[ortho_config(prefix = "EVENTWISE")]
pub(crate) struct RecommendArgs {
    /// Path to a JSON export of event rows.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Backend base URL used when no catalog file is given.
    #[arg(long = ARG_BACKEND_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) backend_url: Option<String>,
    /// Backend API key.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Directory holding the preference snapshot.
    #[arg(long = ARG_STATE_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) state_dir: Option<Utf8PathBuf>,
    /// Preference backend: `file` or `sqlite`.
    #[arg(long = ARG_STORE, value_name = "backend")]
    #[serde(default)]
    pub(crate) store: Option<String>,
    /// Maximum number of events to print.
    #[arg(long = ARG_LIMIT, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Evaluation date (YYYY-MM-DD); defaults to today.
    #[arg(long = ARG_TODAY, value_name = "date")]
    #[serde(default)]
    pub(crate) today: Option<String>,
    /// Recency policy: `upcoming-boost` or `disabled`.
    #[arg(long = ARG_RECENCY, value_name = "policy")]
    #[serde(default)]
    pub(crate) recency: Option<String>,
}

impl RecommendArgs {
    pub(crate) fn into_config(self) -> Result<RecommendConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RecommendConfig::try_from(merged)
    }
}

/// Resolved `recommend` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecommendConfig {
    pub(crate) catalog: CatalogConfig,
    pub(crate) store: StoreConfig,
    pub(crate) limit: usize,
    pub(crate) today: NaiveDate,
    pub(crate) recency: RecencyPolicy,
}

impl TryFrom<RecommendArgs> for RecommendConfig {
    type Error = CliError;

    fn try_from(args: RecommendArgs) -> Result<Self, Self::Error> {
        let catalog =
            CatalogConfig::require(CMD_RECOMMEND, args.catalog, args.backend_url, args.api_key)?;
        let store = StoreConfig::resolve(args.state_dir, args.store.as_deref())?;
        let recency = args
            .recency
            .as_deref()
            .map_or(Ok(RecencyPolicy::default()), |raw| {
                raw.parse().map_err(|message| CliError::InvalidValue {
                    field: ARG_RECENCY,
                    value: raw.to_owned(),
                    message,
                })
            })?;
        Ok(Self {
            catalog,
            store,
            limit: args.limit.unwrap_or(DEFAULT_LIMIT),
            today: resolve_today(args.today.as_deref())?,
            recency,
        })
    }
}

pub(crate) fn run_recommend_with(
    args: RecommendArgs,
    builder: &dyn SessionBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_recommend(&config, builder, writer)
}

pub(crate) fn execute_recommend(
    config: &RecommendConfig,
    builder: &dyn SessionBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let (catalog, notice) = fetch_catalog_or_empty(builder, &config.catalog)?;
    let store = PreferenceStore::load(builder.preference_backend(&config.store)?);
    let recommender = Recommender::default().with_recency(config.recency);
    let ranked = recommender.rank_scored(&catalog, store.snapshot(), config.limit, config.today);
    debug!("recommending {} events for {}", ranked.len(), config.today);

    let mut listing = EventListing::new(
        ranked
            .iter()
            .map(|scored| EventSummary::new(scored.event).with_score(scored.score))
            .collect(),
    );
    listing.notice = notice;
    write_json(writer, &listing)
}

/// CLI arguments for the `similar` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "similar",
    long_about = "List catalog events resembling the given event by \
                 category, tags, society and rating. The preference history \
                 is not consulted.",
    about = "List events similar to an event"
)]
#[ortho_config(prefix = "EVENTWISE")]
pub(crate) struct SimilarArgs {
    /// Identifier of the source event.
    #[arg(value_name = "event")]
    #[serde(default)]
    pub(crate) event: Option<String>,
    /// Path to a JSON export of event rows.
    #[arg(long = ARG_CATALOG, value_name = "path")]
    #[serde(default)]
    pub(crate) catalog: Option<Utf8PathBuf>,
    /// Backend base URL used when no catalog file is given.
    #[arg(long = ARG_BACKEND_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) backend_url: Option<String>,
    /// Backend API key.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Maximum number of events to print.
    #[arg(long = ARG_LIMIT, value_name = "n")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
}

impl SimilarArgs {
    pub(crate) fn into_config(self) -> Result<SimilarConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SimilarConfig::try_from(merged)
    }
}

/// Resolved `similar` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SimilarConfig {
    pub(crate) event: EventId,
    pub(crate) catalog: CatalogConfig,
    pub(crate) limit: usize,
}

impl TryFrom<SimilarArgs> for SimilarConfig {
    type Error = CliError;

    fn try_from(args: SimilarArgs) -> Result<Self, Self::Error> {
        let event = args.event.ok_or_else(|| CliError::MissingArgument {
            field: ARG_EVENT,
            env: env_var(CMD_SIMILAR, ARG_EVENT),
        })?;
        Ok(Self {
            event: EventId::new(event),
            catalog: CatalogConfig::require(
                CMD_SIMILAR,
                args.catalog,
                args.backend_url,
                args.api_key,
            )?,
            limit: args.limit.unwrap_or(DEFAULT_LIMIT),
        })
    }
}

pub(crate) fn run_similar_with(
    args: SimilarArgs,
    builder: &dyn SessionBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let catalog = fetch_catalog(builder, &config.catalog)?;
    let source = catalog
        .get(config.event.as_str())
        .ok_or_else(|| CliError::UnknownEvent {
            id: config.event.to_string(),
        })?;
    let similar = eventwise_scorer::similar_to(source, &catalog, config.limit);
    let listing = EventListing::new(similar.into_iter().map(EventSummary::new).collect());
    write_json(writer, &listing)
}

#[cfg(test)]
pub(crate) fn recommend_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RecommendConfig, CliError> {
    let merged = RecommendArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RecommendConfig::try_from(merged)
}
