//! Application State
//!
//! Global state shared by every command: the template store and the access
//! gate, both backed by the same key-value store.

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::settings::AppConfig;
use crate::services::access_gate::AccessGate;
use crate::services::templates::TemplateStore;
use crate::storage::kv::{KeyValueStore, STUDIO_STATE_KEY};
use crate::utils::error::{AppError, AppResult};

/// Application state handed to every command
pub struct AppState {
    /// Durable key-value backend
    storage: Arc<RwLock<Option<Arc<dyn KeyValueStore>>>>,
    /// Editor state (document, templates, presets, wizard)
    store: Arc<RwLock<Option<TemplateStore>>>,
    /// Passcode gate
    gate: Arc<RwLock<Option<AccessGate>>>,
    /// Whether the state has been initialized
    initialized: Arc<RwLock<bool>>,
}

impl AppState {
    /// Create a new uninitialized app state
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(None)),
            store: Arc::new(RwLock::new(None)),
            gate: Arc::new(RwLock::new(None)),
            initialized: Arc::new(RwLock::new(false)),
        }
    }

    /// Hydrate the store and build the gate. Calling twice is a no-op.
    pub async fn initialize(
        &self,
        storage: Arc<dyn KeyValueStore>,
        config: &AppConfig,
    ) -> AppResult<()> {
        let mut initialized = self.initialized.write().await;
        if *initialized {
            return Ok(());
        }

        {
            let store = TemplateStore::load(storage.clone())?;
            let mut store_lock = self.store.write().await;
            *store_lock = Some(store);
        }

        {
            let gate = AccessGate::from_config(storage.clone(), config);
            let mut gate_lock = self.gate.write().await;
            *gate_lock = Some(gate);
        }

        {
            let mut storage_lock = self.storage.write().await;
            *storage_lock = Some(storage);
        }

        *initialized = true;
        tracing::debug!("application state initialized");
        Ok(())
    }

    pub async fn is_initialized(&self) -> bool {
        *self.initialized.read().await
    }

    /// Check that the storage backend answers reads
    pub fn is_storage_healthy(&self) -> bool {
        if let Ok(guard) = self.storage.try_read() {
            if let Some(ref storage) = *guard {
                return storage.get(STUDIO_STATE_KEY).is_ok();
            }
        }
        false
    }

    /// Run `f` with read access to the template store
    pub async fn with_store<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&TemplateStore) -> AppResult<T>,
    {
        let guard = self.store.read().await;
        match &*guard {
            Some(store) => f(store),
            None => Err(AppError::internal("Template store not initialized")),
        }
    }

    /// Run `f` with exclusive access to the template store
    pub async fn with_store_mut<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut TemplateStore) -> AppResult<T>,
    {
        let mut guard = self.store.write().await;
        match &mut *guard {
            Some(store) => f(store),
            None => Err(AppError::internal("Template store not initialized")),
        }
    }

    /// Run `f` with the access gate
    pub async fn with_gate<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&AccessGate) -> AppResult<T>,
    {
        let guard = self.gate.read().await;
        match &*guard {
            Some(gate) => f(gate),
            None => Err(AppError::internal("Access gate not initialized")),
        }
    }

    /// Fail with `Locked` unless the gate has been passed
    pub async fn require_authenticated(&self) -> AppResult<()> {
        if self.with_gate(|gate| gate.is_authenticated()).await? {
            Ok(())
        } else {
            Err(AppError::locked("Enter the passcode first"))
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
