//! Error types raised while configuring scorers and preference backends.
#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors returned when validating [`ScoreWeights`](crate::ScoreWeights) or
/// [`SimilarityWeights`](crate::SimilarityWeights).
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ScoreWeightsError {
    /// A weight was NaN or infinite.
    #[error("weight {name} must be finite, got {value}")]
    NonFinite {
        /// Field name of the rejected weight.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A weight was below zero.
    #[error("weight {name} must not be negative, got {value}")]
    Negative {
        /// Field name of the rejected weight.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Errors raised while opening the `SQLite` preference backend.
#[cfg(feature = "store-sqlite")]
#[cfg_attr(docsrs, doc(cfg(feature = "store-sqlite")))]
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Creating the parent directory for the database failed.
    #[error("failed to create parent directory for {path}")]
    CreateParent {
        /// Requested database path.
        path: camino::Utf8PathBuf,
        /// Source error from std I/O.
        #[source]
        source: std::io::Error,
    },
    /// Opening the database failed.
    #[error("failed to open SQLite database at {path}")]
    OpenDatabase {
        /// Requested database path.
        path: camino::Utf8PathBuf,
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the `key_value` table failed.
    #[error("failed to initialise the key_value table")]
    InitialiseSchema {
        /// Source error from `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}
