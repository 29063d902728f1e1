//! Key-value blob storage seam
//!
//! Platform shells implement [`StateStorage`]; the engine only ever reads and
//! writes one blob under [`STORAGE_KEY`].
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::constants::STORAGE_KEY;
use crate::error::PersistenceError;
use crate::state::{PersistedState, Restored};

/// Trait for abstracting blob persistence.
/// Platform-specific implementations should provide this
pub trait StateStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn load_blob(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn save_blob(&self, key: &str, blob: &str) -> Result<(), Self::Error>;
}

/// Load persisted state, degrading to the default on any failure. A failed
/// read is reported as [`Restored::Fallback`] so the stored blob is not
/// overwritten.
pub fn read_state<S: StateStorage>(storage: &S) -> Restored {
    match storage.load_blob(STORAGE_KEY) {
        Ok(blob) => PersistedState::restore(blob.as_deref()),
        Err(err) => {
            log::error!("could not read saved state: {err}");
            Restored::Fallback(PersistedState::default())
        }
    }
}

/// Write persisted state.
///
/// # Errors
///
/// Returns an error if serialization or the underlying store fails.
pub fn write_state<S: StateStorage>(
    storage: &S,
    state: &PersistedState,
) -> Result<(), PersistenceError> {
    let blob = state.to_json()?;
    storage
        .save_blob(STORAGE_KEY, &blob)
        .map_err(|err| PersistenceError::Storage(err.to_string()))
}

/// In-process store. Clones share the same map, so a test can keep a handle
/// while the engine owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Store pre-populated with a raw blob under the engine's key.
    #[must_use]
    pub fn with_blob(blob: &str) -> Self {
        let storage = Self::default();
        storage
            .blobs
            .borrow_mut()
            .insert(STORAGE_KEY.to_string(), blob.to_string());
        storage
    }

    /// Raw blob under the engine's key.
    #[must_use]
    pub fn blob(&self) -> Option<String> {
        self.blobs.borrow().get(STORAGE_KEY).cloned()
    }
}

impl StateStorage for MemoryStorage {
    type Error = Infallible;

    fn load_blob(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.blobs.borrow().get(key).cloned())
    }

    fn save_blob(&self, key: &str, blob: &str) -> Result<(), Self::Error> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
