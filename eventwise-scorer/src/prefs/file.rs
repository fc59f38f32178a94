//! File-backed key-value storage: one `<key>.json` file per key.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use eventwise_core::{KeyValueStore, StorageError};
use eventwise_fs::{read_to_string_if_exists, write_atomic};

const FILE_EXTENSION: &str = "json";

/// Stores each key as `<state_dir>/<key>.json`.
///
/// The state directory is created on the first write. Writes go to a
/// staging file that is renamed over the target, so readers never observe a
/// partially written snapshot.
///
/// # Examples
/// ```no_run
/// use eventwise_core::KeyValueStore;
/// use eventwise_scorer::FileKeyValueStore;
///
/// let mut store = FileKeyValueStore::new("state");
/// store.set("userEventData", "{}")?;
/// assert_eq!(store.get("userEventData")?.as_deref(), Some("{}"));
/// # Ok::<(), eventwise_core::StorageError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileKeyValueStore {
    dir: Utf8PathBuf,
}

impl FileKeyValueStore {
    /// Use `dir` as the state directory.
    #[must_use]
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// State directory holding the key files.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    /// Returns [`StorageError::Backend`] when `key` is empty or is not a
    /// plain file name.
    pub fn path_for(&self, key: &str) -> Result<Utf8PathBuf, StorageError> {
        let is_plain = !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains(['/', '\\']);
        if !is_plain {
            return Err(StorageError::Backend {
                key: key.to_owned(),
                message: "key must be a plain file name".into(),
            });
        }
        Ok(self.dir.join(format!("{key}.{FILE_EXTENSION}")))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        read_to_string_if_exists(&path).map_err(|source| StorageError::Io {
            key: key.to_owned(),
            source,
        })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        write_atomic(&path, value.as_bytes()).map_err(|source| StorageError::Io {
            key: key.to_owned(),
            source,
        })
    }
}
