//! `localStorage`-backed persistence for the engine
use tallyking_game::StateStorage;

use crate::dom;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Web-specific state storage using localStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct WebStorage;

impl WebStorage {
    fn handle() -> Result<web_sys::Storage, WebStorageError> {
        dom::local_storage().map_err(|e| WebStorageError::Unavailable(dom::js_error_message(&e)))
    }
}

impl StateStorage for WebStorage {
    type Error = WebStorageError;

    fn load_blob(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Self::handle()?
            .get_item(key)
            .map_err(|e| WebStorageError::Storage(dom::js_error_message(&e)))
    }

    fn save_blob(&self, key: &str, blob: &str) -> Result<(), Self::Error> {
        Self::handle()?
            .set_item(key, blob)
            .map_err(|e| WebStorageError::Storage(dom::js_error_message(&e)))
    }
}
