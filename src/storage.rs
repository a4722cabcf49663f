//! A process-wide keyed state store.
//!
//! State is stored as YAML documents in a `StorageBackend`, and accessed through typed `GlobalState` handles.
//! Updates are read-modify-write transactions, serialized per key.
use async_trait::async_trait;
use lifeline::impl_storage_clone;
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::HashMap,
    fmt::Debug,
    marker::PhantomData,
    sync::{Arc, Mutex},
};
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("state storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state could not be encoded: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn save(&self, key: &str, value: String) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Names a piece of global state.  State is scoped to the process, not to any account.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    pub state_name: &'static str,
    pub key: &'static str,
}

impl KeyDefinition {
    pub const fn new(state_name: &'static str, key: &'static str) -> Self {
        Self { state_name, key }
    }

    pub fn storage_key(&self) -> String {
        format!("{}_{}", self.state_name, self.key)
    }
}

/// Hands out `GlobalState` handles.  Handles for the same key share an update lock.
#[derive(Clone)]
pub struct StateProvider {
    backend: Arc<dyn StorageBackend>,
    locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl_storage_clone!(StateProvider);

impl Debug for StateProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateProvider").finish()
    }
}

impl StateProvider {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    pub fn global<T>(&self, key: KeyDefinition) -> GlobalState<T> {
        let storage_key = key.storage_key();

        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|err| err.into_inner());
            locks
                .entry(storage_key.clone())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };

        GlobalState {
            key: storage_key,
            backend: self.backend.clone(),
            lock,
            _state: PhantomData,
        }
    }
}

/// A typed handle to one key of global state.  Absent state reads as `T::default()`.
pub struct GlobalState<T> {
    key: String,
    backend: Arc<dyn StorageBackend>,
    lock: Arc<tokio::sync::Mutex<()>>,
    _state: PhantomData<fn() -> T>,
}

impl<T> Debug for GlobalState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalState").field("key", &self.key).finish()
    }
}

impl<T> Clone for GlobalState<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            backend: self.backend.clone(),
            lock: self.lock.clone(),
            _state: PhantomData,
        }
    }
}

impl<T> GlobalState<T>
where
    T: Serialize + DeserializeOwned + Default + Send,
{
    pub async fn state(&self) -> Result<T, StorageError> {
        match self.backend.load(self.key.as_str()).await? {
            Some(value) => Ok(serde_yaml::from_str(value.as_str())?),
            None => Ok(T::default()),
        }
    }

    /// Reads the latest state, applies `update`, and writes the result.
    /// Concurrent updates to the same key are applied one at a time.
    pub async fn update<F, R>(&self, update: F) -> Result<R, StorageError>
    where
        F: FnOnce(&mut T) -> R + Send,
        R: Send,
    {
        let _guard = self.lock.lock().await;

        let mut state = self.state().await?;
        let ret = update(&mut state);

        let value = serde_yaml::to_string(&state)?;
        self.backend.save(self.key.as_str(), value).await?;

        Ok(ret)
    }

    /// Like `update`, but the state is only written if `update` returns `Some`.
    pub async fn update_if<F, R>(&self, update: F) -> Result<Option<R>, StorageError>
    where
        F: FnOnce(&mut T) -> Option<R> + Send,
        R: Send,
    {
        let _guard = self.lock.lock().await;

        let mut state = self.state().await?;
        let ret = match update(&mut state) {
            Some(ret) => ret,
            None => return Ok(None),
        };

        let value = serde_yaml::to_string(&state)?;
        self.backend.save(self.key.as_str(), value).await?;

        Ok(Some(ret))
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        self.backend.remove(self.key.as_str()).await
    }
}
