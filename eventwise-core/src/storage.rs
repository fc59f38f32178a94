//! Local durable key-value storage.
//!
//! The preference store persists one serialised snapshot under a fixed key.
//! Backends only need string get/set; absence is `Ok(None)`, never an error.

use thiserror::Error;

/// Errors raised by [`KeyValueStore`] implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed.
    #[error("I/O error accessing key {key}: {source}")]
    Io {
        /// Key being read or written.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A database or other backend rejected the operation.
    #[error("storage backend error for key {key}: {message}")]
    Backend {
        /// Key being read or written.
        key: String,
        /// Backend error description.
        message: String,
    },
}

/// String key-value storage that survives the process.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use eventwise_core::{KeyValueStore, StorageError};
///
/// #[derive(Default)]
/// struct MapStore(HashMap<String, String>);
///
/// impl KeyValueStore for MapStore {
///     fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
///         Ok(self.0.get(key).cloned())
///     }
///
///     fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
///         self.0.insert(key.to_owned(), value.to_owned());
///         Ok(())
///     }
/// }
///
/// let mut store = MapStore::default();
/// assert_eq!(store.get("userEventData")?, None);
/// store.set("userEventData", "{}")?;
/// assert_eq!(store.get("userEventData")?.as_deref(), Some("{}"));
/// # Ok::<(), StorageError>(())
/// ```
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}
