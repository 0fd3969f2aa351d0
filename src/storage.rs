//! Key-value persistence for favorites and the personal cookbook.

use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::RecipeError;

/// String-keyed blob store. Values are whole JSON documents written
/// wholesale; a missing key reads back as `None`, never as an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, RecipeError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), RecipeError>;
}

/// One `<key>.json` file per key under a data directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RecipeError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RecipeError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(key);
        tokio::fs::write(&path, value).await?;
        debug!("wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, RecipeError> {
        Ok(self.entries.lock().expect("store mutex poisoned").get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), RecipeError> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
