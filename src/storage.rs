use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex},
};

use crate::StorageError;

/// Key under which the bearer credential is persisted.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Synchronous key-value persistence provided by the host.
///
/// Browser builds use [`BrowserStorage`](crate::BrowserStorage); tests and
/// native processes can use [`MemoryStore`] or their own backend.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items().remove(key);
        Ok(())
    }
}

/// Single-slot bearer credential backed by an optional [`KeyValueStore`].
///
/// Without a backend every operation is a no-op and [`TokenStore::get`]
/// always returns `None`. Backend failures are logged and never returned.
/// The token is read through on every call, never cached.
#[derive(Clone, Default)]
pub struct TokenStore {
    backend: Option<Arc<dyn KeyValueStore>>,
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("persistent", &self.backend.is_some())
            .finish()
    }
}

impl TokenStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Store with no persistence; used when the host offers none.
    pub fn detached() -> Self {
        Self { backend: None }
    }

    pub fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    pub fn set(&self, token: &str) {
        let Some(backend) = &self.backend else {
            return;
        };
        if let Err(_err) = backend.set_item(AUTH_TOKEN_KEY, token) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "failed to persist auth token");
        }
    }

    pub fn clear(&self) {
        let Some(backend) = &self.backend else {
            return;
        };
        if let Err(_err) = backend.remove_item(AUTH_TOKEN_KEY) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_err, "failed to remove auth token");
        }
    }

    pub fn get(&self) -> Option<String> {
        let backend = self.backend.as_ref()?;
        match backend.get_item(AUTH_TOKEN_KEY) {
            Ok(token) => token,
            Err(_err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_err, "failed to read auth token");
                None
            }
        }
    }
}
