//! Durable Key-Value Storage
//!
//! The persistence seam shared by the template store and the access gate.
//! Production uses the SQLite-backed [`Database`](super::Database); tests use
//! [`MemoryStore`].
//!
//! There is exactly one writer per process. Two processes sharing the same
//! database see last-write-wins with no synchronization between them.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::utils::error::{AppError, AppResult};

/// Key under which the editor state (document, templates, presets) is stored
pub const STUDIO_STATE_KEY: &str = "prompt-storage";

/// Key holding the access gate's authenticated flag
pub const AUTH_FLAG_KEY: &str = "prompt-studio-auth";

/// Key holding the access gate's attempt counter and lockout expiry
pub const LOCKOUT_KEY: &str = "auth-lockout";

/// String-keyed durable storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::internal("memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}
