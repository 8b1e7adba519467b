use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

use super::{Storage, StorageError};

const COLLECTION: &str = "kv_store";

#[derive(Debug, Serialize, Deserialize)]
struct KvEntry {
    #[serde(rename = "_id")]
    key: String,
    value: String,
    updated_at: i64,
}

/// Key/value documents in MongoDB, one document per store key
#[derive(Clone)]
pub struct MongoStorage {
    db: Database,
}

impl MongoStorage {
    pub async fn new(uri: &str) -> Result<Self, StorageError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri)
            .await
            .map_err(db_err)?;

        // Writes are whole-collection and serialized, a small pool is enough
        client_options.max_pool_size = Some(10);
        client_options.min_pool_size = Some(1);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));
        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options).map_err(db_err)?;

        let db_name = uri
            .split('/')
            .last()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty() && !s.contains(':'))
            .unwrap_or("dues_service");

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await.map_err(db_err)?;
        log::info!("✅ MongoDB connected: database {}", db_name);

        Ok(Self { db })
    }

    fn entries(&self) -> Collection<KvEntry> {
        self.db.collection(COLLECTION)
    }
}

fn db_err(e: mongodb::error::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

#[async_trait]
impl Storage for MongoStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entry = self
            .entries()
            .find_one(doc! { "_id": key })
            .await
            .map_err(db_err)?;
        Ok(entry.map(|e| e.value))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let entry = KvEntry {
            key: key.to_string(),
            value,
            updated_at: chrono::Utc::now().timestamp(),
        };
        self.entries()
            .replace_one(doc! { "_id": key }, &entry)
            .upsert(true)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries()
            .delete_one(doc! { "_id": key })
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_round_trip() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/dues_service_test".to_string());

        let storage = MongoStorage::new(&uri).await.unwrap();
        storage.set("members", "[]".into()).await.unwrap();
        assert_eq!(storage.get("members").await.unwrap().as_deref(), Some("[]"));
        storage.remove("members").await.unwrap();
        assert_eq!(storage.get("members").await.unwrap(), None);
    }
}
