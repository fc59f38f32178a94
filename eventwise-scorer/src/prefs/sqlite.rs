//! `SQLite`-backed key-value storage.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use eventwise_core::{KeyValueStore, StorageError};
use eventwise_fs::ensure_parent_dir;
use rusqlite::{Connection, OptionalExtension, params};

use crate::SqliteStoreError;

const CREATE_TABLE_SQL: &str =
    "CREATE TABLE IF NOT EXISTS key_value (key TEXT PRIMARY KEY, value TEXT NOT NULL)";
const SELECT_SQL: &str = "SELECT value FROM key_value WHERE key = ?1";
const UPSERT_SQL: &str = "INSERT INTO key_value (key, value) VALUES (?1, ?2) \
     ON CONFLICT(key) DO UPDATE SET value = excluded.value";

/// Stores keys in a `key_value` table of a `SQLite` database.
#[derive(Debug)]
pub struct SqliteKeyValueStore {
    connection: Connection,
}

impl SqliteKeyValueStore {
    /// Open (or create) the database at `path` and ensure the table exists.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when the parent directory cannot be
    /// created, the database cannot be opened or the schema cannot be
    /// initialised.
    pub fn open(path: &Utf8Path) -> Result<Self, SqliteStoreError> {
        ensure_parent_dir(path).map_err(|source| SqliteStoreError::CreateParent {
            path: path.to_path_buf(),
            source,
        })?;
        let connection = Connection::open(path.as_std_path()).map_err(|source| {
            SqliteStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_connection(connection)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when the schema cannot be initialised.
    pub fn in_memory() -> Result<Self, SqliteStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteStoreError::OpenDatabase {
                path: ":memory:".into(),
                source,
            })?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, SqliteStoreError> {
        connection
            .execute(CREATE_TABLE_SQL, [])
            .map_err(|source| SqliteStoreError::InitialiseSchema { source })?;
        Ok(Self { connection })
    }
}

fn backend_error(key: &str, err: &rusqlite::Error) -> StorageError {
    StorageError::Backend {
        key: key.to_owned(),
        message: err.to_string(),
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.connection
            .query_row(SELECT_SQL, params![key], |row| row.get(0))
            .optional()
            .map_err(|err| backend_error(key, &err))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.connection
            .execute(UPSERT_SQL, params![key, value])
            .map(|_| ())
            .map_err(|err| backend_error(key, &err))
    }
}
