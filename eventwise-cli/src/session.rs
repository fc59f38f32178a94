//! Catalog and preference-store wiring shared by every command.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::NaiveDate;
use eventwise_core::{Catalog, CatalogSource, KeyValueStore};
use eventwise_data::{FileCatalogSource, HttpCatalogSource};
use eventwise_scorer::FileKeyValueStore;
use log::warn;

use crate::{ARG_API_KEY, ARG_CATALOG, ARG_STORE, ARG_TODAY, CliError};

/// Default directory holding the preference snapshot.
pub(crate) const DEFAULT_STATE_DIR: &str = ".eventwise";
/// File name of the SQLite preference database inside the state directory.
pub(crate) const SQLITE_FILE_NAME: &str = "preferences.db";

/// Environment variable ortho-config reads for a subcommand option.
pub(crate) fn env_var(command: &str, field: &str) -> String {
    format!(
        "EVENTWISE_CMDS_{}_{}",
        command.to_ascii_uppercase(),
        field.replace('-', "_").to_ascii_uppercase()
    )
}

/// Where the event catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CatalogConfig {
    /// JSON export of backend rows.
    File(Utf8PathBuf),
    /// Remote backend.
    Backend { base_url: String, api_key: String },
}

impl CatalogConfig {
    /// Pick the catalog source from merged options. A file wins over a
    /// backend URL.
    pub(crate) fn resolve(
        command: &'static str,
        catalog: Option<Utf8PathBuf>,
        backend_url: Option<String>,
        api_key: Option<String>,
    ) -> Result<Option<Self>, CliError> {
        if let Some(path) = catalog {
            return Ok(Some(Self::File(path)));
        }
        let Some(base_url) = backend_url else {
            return Ok(None);
        };
        let api_key = api_key.ok_or_else(|| CliError::MissingArgument {
            field: ARG_API_KEY,
            env: env_var(command, ARG_API_KEY),
        })?;
        Ok(Some(Self::Backend { base_url, api_key }))
    }

    /// Like [`Self::resolve`] but fails when nothing is configured.
    pub(crate) fn require(
        command: &'static str,
        catalog: Option<Utf8PathBuf>,
        backend_url: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self, CliError> {
        Self::resolve(command, catalog, backend_url, api_key)?
            .ok_or(CliError::MissingCatalogSource { command })
    }

    /// Check that a catalog file exists before any command work starts.
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match self {
            Self::File(path) => require_existing(path, ARG_CATALOG),
            Self::Backend { .. } => Ok(()),
        }
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match eventwise_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Durable backend for the preference snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum StoreBackend {
    /// One JSON file per key.
    #[default]
    File,
    /// SQLite `key_value` table.
    Sqlite,
}

impl StoreBackend {
    fn parse(raw: &str) -> Result<Self, CliError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(Self::File),
            "sqlite" => Ok(Self::Sqlite),
            _ => Err(CliError::InvalidValue {
                field: ARG_STORE,
                value: raw.to_owned(),
                message: "expected `file` or `sqlite`".to_owned(),
            }),
        }
    }
}

/// Where the preference snapshot lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoreConfig {
    pub(crate) state_dir: Utf8PathBuf,
    pub(crate) backend: StoreBackend,
}

impl StoreConfig {
    pub(crate) fn resolve(
        state_dir: Option<Utf8PathBuf>,
        store: Option<&str>,
    ) -> Result<Self, CliError> {
        let backend = store.map_or(Ok(StoreBackend::default()), StoreBackend::parse)?;
        Ok(Self {
            state_dir: state_dir.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_STATE_DIR)),
            backend,
        })
    }
}

/// Parse `--today`, defaulting to the local calendar date.
pub(crate) fn resolve_today(raw: Option<&str>) -> Result<NaiveDate, CliError> {
    raw.map_or_else(
        || Ok(chrono::Local::now().date_naive()),
        |value| {
            value
                .trim()
                .parse()
                .map_err(|err: chrono::ParseError| CliError::InvalidValue {
                    field: ARG_TODAY,
                    value: value.to_owned(),
                    message: err.to_string(),
                })
        },
    )
}

/// Builds the collaborators for one command invocation.
pub(crate) trait SessionBuilder {
    /// Open the configured catalog source.
    fn catalog_source(&self, config: &CatalogConfig) -> Result<Box<dyn CatalogSource>, CliError>;

    /// Open the configured preference backend.
    fn preference_backend(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, CliError>;
}

pub(crate) struct DefaultSessionBuilder;

impl SessionBuilder for DefaultSessionBuilder {
    fn catalog_source(&self, config: &CatalogConfig) -> Result<Box<dyn CatalogSource>, CliError> {
        match config {
            CatalogConfig::File(path) => Ok(Box::new(FileCatalogSource::new(path.clone()))),
            CatalogConfig::Backend { base_url, api_key } => {
                let source = HttpCatalogSource::new(base_url.clone(), api_key.clone()).map_err(
                    |source| CliError::BuildCatalogSource {
                        base_url: base_url.clone(),
                        source,
                    },
                )?;
                Ok(Box::new(source))
            }
        }
    }

    fn preference_backend(
        &self,
        config: &StoreConfig,
    ) -> Result<Box<dyn KeyValueStore>, CliError> {
        match config.backend {
            StoreBackend::File => Ok(Box::new(FileKeyValueStore::new(config.state_dir.clone()))),
            StoreBackend::Sqlite => open_sqlite(&config.state_dir),
        }
    }
}

#[cfg(feature = "store-sqlite")]
fn open_sqlite(state_dir: &Utf8Path) -> Result<Box<dyn KeyValueStore>, CliError> {
    let store = eventwise_scorer::SqliteKeyValueStore::open(&state_dir.join(SQLITE_FILE_NAME))?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_sqlite(_state_dir: &Utf8Path) -> Result<Box<dyn KeyValueStore>, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "--store sqlite",
    })
}

/// Fetch the catalog, failing the command on error.
pub(crate) fn fetch_catalog(
    builder: &dyn SessionBuilder,
    config: &CatalogConfig,
) -> Result<Catalog, CliError> {
    config.validate_sources()?;
    builder
        .catalog_source(config)?
        .fetch_events()
        .map_err(CliError::FetchCatalog)
}

/// Fetch the catalog, degrading to an empty one when the fetch fails.
///
/// Returns the catalog and, on failure, a notice for the caller to report.
pub(crate) fn fetch_catalog_or_empty(
    builder: &dyn SessionBuilder,
    config: &CatalogConfig,
) -> Result<(Catalog, Option<String>), CliError> {
    match fetch_catalog(builder, config) {
        Ok(catalog) => Ok((catalog, None)),
        Err(CliError::FetchCatalog(err)) => {
            warn!("continuing with an empty catalog: {err}");
            Ok((Catalog::empty(), Some(err.to_string())))
        }
        Err(other) => Err(other),
    }
}
