//! Error types emitted by the Eventwise CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use eventwise_core::{CatalogError, StarsError};
use eventwise_data::HttpSourceBuildError;
#[cfg(feature = "store-sqlite")]
use eventwise_scorer::SqliteStoreError;
use thiserror::Error;

/// Errors emitted by the Eventwise CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument { field: &'static str, env: String },
    /// Neither a catalog file nor a backend URL was configured.
    #[error("`{command}` needs an event catalog (set --catalog or --backend-url)")]
    MissingCatalogSource { command: &'static str },
    /// An option could not be interpreted.
    #[error("invalid {field} {value:?}: {message}")]
    InvalidValue {
        field: &'static str,
        value: String,
        message: String,
    },
    /// A star value fell outside 1 to 5.
    #[error(transparent)]
    InvalidStars(#[from] StarsError),
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        feature: &'static str,
        action: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Constructing the HTTP catalog source failed.
    #[error("failed to build catalog client for {base_url:?}: {source}")]
    BuildCatalogSource {
        base_url: String,
        #[source]
        source: HttpSourceBuildError,
    },
    /// Loading the catalog failed.
    #[error("failed to load the event catalog: {0}")]
    FetchCatalog(#[source] CatalogError),
    /// The referenced event is not in the catalog.
    #[error("event {id:?} is not in the catalog")]
    UnknownEvent { id: String },
    /// Opening the SQLite preference store failed.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    OpenSqliteStore(#[from] SqliteStoreError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
