use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use super::{Storage, StorageError};

/// Single JSON object file: `{ "<key>": "<json document>", ... }`.
///
/// The whole map is cached in memory and flushed on every write through a
/// temporary file and rename, so a crash mid-write leaves the old file.
pub struct FileStorage {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStorage {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    // Start over rather than refuse to boot; collections
                    // come back through the seed path.
                    log::warn!("⚠️  Ignoring unreadable store file {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        log::debug!("📁 Loaded {} keys from {}", entries.len(), path.display());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    async fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        let mut staged = entries.clone();
        staged.insert(key.to_string(), value);
        self.flush(&staged).await?;
        *entries = staged;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut staged = entries.clone();
        staged.remove(key);
        self.flush(&staged).await?;
        *entries = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let storage = FileStorage::open(&path).await.unwrap();
        storage.set("current_user_id", "\"admin-user\"".into()).await.unwrap();
        storage.set("members", "[]".into()).await.unwrap();
        storage.remove("members").await.unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("current_user_id").await.unwrap().as_deref(),
            Some("\"admin-user\"")
        );
        assert_eq!(reopened.get("members").await.unwrap(), None);
    }

    #[tokio::test]
    async fn garbage_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let storage = FileStorage::open(&path).await.unwrap();
        assert_eq!(storage.get("clubs").await.unwrap(), None);
    }

    #[tokio::test]
    async fn failed_flush_leaves_cache_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let storage = FileStorage::open(&path).await.unwrap();
        storage.set("clubs", "[]".into()).await.unwrap();

        // An occupied directory at the store path makes the rename fail
        tokio::fs::remove_file(&path).await.unwrap();
        tokio::fs::create_dir(&path).await.unwrap();
        tokio::fs::write(path.join("occupied"), "x").await.unwrap();

        assert!(storage.set("members", "[1]".into()).await.is_err());
        assert_eq!(storage.get("members").await.unwrap(), None);

        assert!(storage.remove("clubs").await.is_err());
        assert_eq!(storage.get("clubs").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let storage = FileStorage::open(&path).await.unwrap();
        storage.set("clubs", "[]".into()).await.unwrap();
        assert!(path.exists());
    }
}
