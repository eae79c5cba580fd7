//! Persistence boundary for client-side state.
//!
//! The stores persist snapshots through a [`StorageBackend`], a key-value
//! contract shaped like the web storage APIs our hosts provide. Snapshots are
//! wrapped in a versioned [`Envelope`] so state written by an incompatible
//! release is detected and discarded instead of half-parsed.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Well-known storage keys.
pub mod keys {
    /// Key for the persisted cart snapshot.
    pub const CART_STORAGE: &str = "cart-storage";

    /// Key for the persisted wishlist snapshot.
    pub const WISHLIST_STORAGE: &str = "wishlist-storage";

    /// Key for the persisted auth snapshot.
    pub const AUTH_STORAGE: &str = "auth-storage";

    /// Key for the location to return to after a login prompt.
    pub const REDIRECT_AFTER_LOGIN: &str = "redirect_after_login";

    /// Key for a one-shot message shown on the login screen.
    pub const LOGIN_MESSAGE: &str = "login_message";
}

/// Errors a storage backend can report.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend refused the write for lack of space.
    #[error("storage quota exceeded")]
    QuotaExceeded,
    /// The backend is not usable in this environment.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Errors loading a persisted snapshot.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The stored payload is not a valid snapshot.
    #[error("malformed snapshot: {0}")]
    Decode(#[from] serde_json::Error),
    /// The stored payload was written with a different format version.
    #[error("unsupported snapshot version {found} (expected {expected})", expected = SNAPSHOT_VERSION)]
    Version {
        /// Version found in the stored payload.
        found: u32,
    },
}

/// A key-value store for string payloads.
///
/// Implementations wrap whatever the host environment offers: web local
/// storage, a settings file, or an in-memory map for tests. `get` must
/// return exactly what the last `set` stored under the key.
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory [`StorageBackend`] for tests and hosts without native storage.
///
/// Never fails.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A poisoned lock still holds the last written state
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Versioned wrapper around a persisted snapshot.
///
/// The stored layout is `{"state": {...}, "version": 0}`. Snapshots from
/// earlier web clients use this exact shape, so it is kept stable; a version
/// bump invalidates them deliberately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The wrapped snapshot.
    pub state: T,
    /// Snapshot format version.
    pub version: u32,
}

/// Load and unwrap a versioned snapshot stored under `key`.
///
/// Returns `Ok(None)` when nothing is stored under the key.
///
/// # Errors
///
/// Returns [`PersistError`] if the backend fails, the payload does not
/// decode, or the payload carries a different format version.
pub fn load_envelope<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> Result<Option<T>, PersistError> {
    let Some(raw) = backend.get(key)? else {
        return Ok(None);
    };

    let envelope: Envelope<T> = serde_json::from_str(&raw)?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(PersistError::Version {
            found: envelope.version,
        });
    }

    Ok(Some(envelope.state))
}

/// Wrap `state` in a current-version envelope and write it under `key`.
///
/// # Errors
///
/// Returns [`PersistError`] if serialization or the backend write fails.
pub fn store_envelope<T: Serialize>(
    backend: &dyn StorageBackend,
    key: &str,
    state: &T,
) -> Result<(), PersistError> {
    let envelope = Envelope {
        state,
        version: SNAPSHOT_VERSION,
    };
    let raw = serde_json::to_string(&envelope)?;
    backend.set(key, &raw)?;
    Ok(())
}
