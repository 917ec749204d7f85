use std::sync::Arc;

use tracing::warn;

use crate::storage::{KeyValueStore, StorageError};

const TOKEN_KEY: &str = "auth_token";

/// Bearer token held in the durable key-value space between invocations.
#[derive(Debug)]
pub struct SessionStore<K> {
    storage: Arc<K>,
}

impl<K> Clone for SessionStore<K> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<K: KeyValueStore> SessionStore<K> {
    pub fn new(storage: Arc<K>) -> Self {
        Self { storage }
    }

    /// Current token. An unreadable store counts as signed out.
    pub fn token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.trim().is_empty()),
            Err(err) => {
                warn!(error = %err, "session storage unreadable; treating as signed out");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token.trim())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)
    }
}
