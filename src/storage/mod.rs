//! Whole-value key/value persistence.
//!
//! Every collection (clubs, members, users) is stored as one JSON document
//! under a fixed key and rewritten wholesale on each change. Backends only
//! move strings around; typed access lives in [`repository::Repository`].

pub mod file;
pub mod memory;
pub mod mongodb;
pub mod repository;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{AppConfig, StorageBackend};

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use self::mongodb::MongoStorage;
pub use repository::Repository;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt store file: {0}")]
    Corrupt(String),
    #[error("Database failure: {0}")]
    Database(String),
}

impl From<StorageError> for crate::utils::AppError {
    fn from(err: StorageError) -> Self {
        crate::utils::AppError::Storage(err.to_string())
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Builds the backend selected in configuration
pub async fn build_storage(config: &AppConfig) -> Result<Arc<dyn Storage>, StorageError> {
    match config.storage_backend {
        StorageBackend::Memory => {
            log::warn!("⚠️  Using in-memory storage, data is lost on restart");
            Ok(Arc::new(MemoryStorage::new()))
        }
        StorageBackend::File => {
            log::info!("📁 Using file storage at {}", config.data_file.display());
            Ok(Arc::new(FileStorage::open(&config.data_file).await?))
        }
        StorageBackend::MongoDb => {
            let uri = config.database_url.as_deref().ok_or_else(|| {
                StorageError::Database("DATABASE_URL must be set for the mongodb backend".into())
            })?;
            log::info!("📊 Using MongoDB storage");
            Ok(Arc::new(MongoStorage::new(uri).await?))
        }
    }
}
