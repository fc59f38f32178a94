//! `search` and `categories` command implementations.

use std::io::Write;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use clap::Parser;
use eventwise_core::{DateRange, SearchFilters, SortOrder};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::output::{EventListing, EventSummary, write_json};
use crate::session::{CatalogConfig, SessionBuilder, fetch_catalog, resolve_today};
use crate::{
    ARG_API_KEY, ARG_BACKEND_URL, ARG_CATALOG, ARG_CATEGORY, ARG_DATE_RANGE, ARG_QUERY, ARG_SORT,
    ARG_TODAY, CliError,
};

pub(crate) const CMD_SEARCH: &str = "search";
pub(crate) const CMD_CATEGORIES: &str = "categories";

/// CLI arguments for the `search` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "search",
    long_about = "Filter the event catalog by free text, category and date \
                 range, then sort it. Prints the matching events and the \
                 number of active filters as JSON.",
    about = "Search the event catalog"
)]
#[ortho_config(prefix = "EVENTWISE")]
pub(crate) struct SearchArgs {
    /// Case-insensitive text matched against titles, descriptions,
    /// societies, venues and tags.
    #[arg(long = ARG_QUERY, value_name = "text")]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Category name; `All` disables the filter.
    #[arg(long = ARG_CATEGORY, value_name = "name")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// `any-time`, `today`, `this-week`, `this-month` or `upcoming`.
    #[arg(long = ARG_DATE_RANGE, value_name = "range")]
    #[serde(default)]
    pub(crate) date_range: Option<String>,
    /// `relevance`, `date`, `rating` or `popularity`.
    #[arg(long = ARG_SORT, value_name = "order")]
    #[serde(default)]
    pub(crate) sort: Option<String>,
    /// Evaluation date (YYYY-MM-DD); defaults to today.
    #[arg(long = ARG_TODAY, value_name = "date")]
    #[serde(default)]
    pub(crate) today: Option<String>,
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
}

impl SearchArgs {
    pub(crate) fn into_config(self) -> Result<SearchConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SearchConfig::try_from(merged)
    }
}

/// Resolved `search` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchConfig {
    pub(crate) catalog: CatalogConfig,
    pub(crate) filters: SearchFilters,
    pub(crate) today: NaiveDate,
}

fn parse_option<T>(field: &'static str, raw: Option<&str>) -> Result<T, CliError>
where
    T: std::str::FromStr<Err = String> + Default,
{
    raw.map_or(Ok(T::default()), |value| {
        value.parse().map_err(|message| CliError::InvalidValue {
            field,
            value: value.to_owned(),
            message,
        })
    })
}

impl TryFrom<SearchArgs> for SearchConfig {
    type Error = CliError;

    fn try_from(args: SearchArgs) -> Result<Self, Self::Error> {
        let date_range: DateRange = parse_option(ARG_DATE_RANGE, args.date_range.as_deref())?;
        let sort: SortOrder = parse_option(ARG_SORT, args.sort.as_deref())?;
        let mut filters = SearchFilters::new()
            .with_query(args.query.unwrap_or_default())
            .with_date_range(date_range)
            .with_sort(sort);
        if let Some(category) = args.category {
            filters = filters.with_category(category);
        }
        Ok(Self {
            catalog: CatalogConfig::require(
                CMD_SEARCH,
                args.catalog,
                args.backend_url,
                args.api_key,
            )?,
            filters,
            today: resolve_today(args.today.as_deref())?,
        })
    }
}

pub(crate) fn run_search_with(
    args: SearchArgs,
    builder: &dyn SessionBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let catalog = fetch_catalog(builder, &config.catalog)?;
    let matches = config.filters.apply(&catalog, config.today);
    let mut listing = EventListing::new(matches.into_iter().map(EventSummary::new).collect());
    listing.active_filters = Some(config.filters.active_filter_count());
    write_json(writer, &listing)
}

/// CLI arguments for the `categories` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "categories", about = "List event categories")]
#[ortho_config(prefix = "EVENTWISE")]
pub(crate) struct CategoriesArgs {
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
}

pub(crate) fn run_categories_with(
    args: CategoriesArgs,
    builder: &dyn SessionBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = CatalogConfig::require(
        CMD_CATEGORIES,
        merged.catalog,
        merged.backend_url,
        merged.api_key,
    )?;
    config.validate_sources()?;
    let categories = builder
        .catalog_source(&config)?
        .fetch_categories()
        .map_err(CliError::FetchCatalog)?;
    write_json(writer, &categories)
}
