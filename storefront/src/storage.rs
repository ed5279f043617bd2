//! Cart persistence.
//!
//! The cart lives as one JSON array under a fixed key of a
//! [`KeyValueStore`]. Reads and writes are best effort: every failure is
//! logged and swallowed, and a missing or corrupt blob restores as an empty
//! cart.

use crate::cart::{CartState, Reservation};
use crate::error::StorefrontError;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use vitrine_core::environment::{KeyValueStore, StorageError};
use vitrine_core::state::Revision;

/// The reservations to write, tagged with the cart revision they came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Cart revision at capture time
    pub revision: Revision,
    /// Reservations in display order
    pub reservations: Vec<Reservation>,
}

/// Outcome of [`CartRepository::save`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The snapshot is now the stored cart
    Written,
    /// A newer snapshot was already written
    Superseded,
    /// Serialisation or storage failed; logged
    Failed,
}

/// Reads and writes the persisted cart
pub struct CartRepository {
    store: Arc<dyn KeyValueStore>,
    key: String,
    last_written: Mutex<Option<Revision>>,
}

impl std::fmt::Debug for CartRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartRepository")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CartRepository {
    /// Creates a repository over `store` using `key`
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            last_written: Mutex::new(None),
        }
    }

    /// The storage key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Restores the persisted cart, empty when missing or unreadable
    #[must_use]
    pub fn load(&self) -> CartState {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %self.key, "No stored cart, starting empty");
                return CartState::new();
            },
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "Cart storage unreadable, starting empty");
                return CartState::new();
            },
        };

        match serde_json::from_str::<Vec<Reservation>>(&raw) {
            Ok(reservations) => {
                let cart = CartState::from_reservations(reservations);
                tracing::debug!(
                    key = %self.key,
                    items = cart.total_item_count(),
                    "Restored stored cart"
                );
                cart
            },
            Err(error) => {
                let error = StorefrontError::PersistenceCorrupt(error.to_string());
                tracing::warn!(key = %self.key, %error, "Discarding stored cart");
                CartState::new()
            },
        }
    }

    /// Writes `snapshot` unless a newer revision has been written already
    pub fn save(&self, snapshot: &CartSnapshot) -> SaveOutcome {
        let mut last_written = self
            .last_written
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if last_written.is_some_and(|last| snapshot.revision <= last) {
            tracing::trace!(revision = %snapshot.revision, "Skipping superseded cart snapshot");
            return SaveOutcome::Superseded;
        }

        let json = match serde_json::to_string(&snapshot.reservations) {
            Ok(json) => json,
            Err(error) => {
                tracing::warn!(%error, "Could not serialise cart");
                return SaveOutcome::Failed;
            },
        };

        match self.store.set(&self.key, &json) {
            Ok(()) => {
                *last_written = Some(snapshot.revision);
                tracing::trace!(key = %self.key, revision = %snapshot.revision, "Cart persisted");
                SaveOutcome::Written
            },
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "Cart write failed");
                SaveOutcome::Failed
            },
        }
    }
}

/// Production [`KeyValueStore`]: one JSON file per key under a directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `dir`; the directory is created on first write
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');

        if valid {
            Ok(self.dir.join(format!("{key}.json")))
        } else {
            Err(StorageError::Unavailable(format!("invalid key {key:?}")))
        }
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_error = |source: std::io::Error| StorageError::Io {
            key: key.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_error)?;

        // Write beside the target, then rename over it
        let tmp = path.with_extension("json.tmp");
        let mut file = std::fs::File::create(&tmp).map_err(io_error)?;
        file.write_all(value.as_bytes()).map_err(io_error)?;
        file.sync_all().map_err(io_error)?;
        drop(file);
        std::fs::rename(&tmp, &path).map_err(io_error)
    }
}
