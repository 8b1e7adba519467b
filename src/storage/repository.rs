use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::{Storage, StorageError};
use crate::models::{Club, Member, User};
use crate::seeds::demo_seed;
use crate::utils::AppResult;

/// Store keys, one whole JSON document each
pub mod keys {
    pub const USERS: &str = "users";
    pub const CLUBS: &str = "clubs";
    pub const MEMBERS: &str = "members";
    pub const CURRENT_USER_ID: &str = "current_user_id";
}

/// Typed access to the persisted collections.
///
/// Reads never fail on bad data: a malformed document is logged and read
/// as an empty collection. Only backend failures surface as errors.
#[derive(Clone)]
pub struct Repository {
    storage: Arc<dyn Storage>,
    write_lock: Arc<Mutex<()>>,
    seed_lock: Arc<Mutex<()>>,
}

impl Repository {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            write_lock: Arc::new(Mutex::new(())),
            seed_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Serializes read-modify-write cycles. Hold the guard from the first
    /// read until the last save of one mutation.
    pub async fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// `None` when the key is absent, empty when the document is unreadable
    async fn read_collection<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<Vec<T>>, StorageError> {
        let raw = match self.storage.get(key).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Ok(Some(items)),
            Err(e) => {
                log::warn!("⚠️  Malformed '{}' collection, treating as empty: {}", key, e);
                Ok(Some(Vec::new()))
            }
        }
    }

    async fn write_collection<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        self.storage.set(key, raw).await
    }

    async fn read_or_seed<T, F>(&self, key: &str, seed: F) -> AppResult<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Vec<T>,
    {
        if let Some(items) = self.read_collection(key).await? {
            return Ok(items);
        }

        // Seeds are only written while the key is still absent under the
        // seed lock, so a concurrent first save is never overwritten.
        let _seeding = self.seed_lock.lock().await;
        if let Some(items) = self.read_collection(key).await? {
            return Ok(items);
        }

        let items = seed();
        log::info!("🌱 Seeding '{}' with {} demo records", key, items.len());
        self.write_collection(key, &items).await?;
        Ok(items)
    }

    pub async fn clubs(&self) -> AppResult<Vec<Club>> {
        self.read_or_seed(keys::CLUBS, demo_seed::demo_clubs).await
    }

    pub async fn save_clubs(&self, clubs: &[Club]) -> AppResult<()> {
        Ok(self.write_collection(keys::CLUBS, clubs).await?)
    }

    pub async fn club(&self, club_id: &str) -> AppResult<Option<Club>> {
        Ok(self.clubs().await?.into_iter().find(|c| c.id == club_id))
    }

    pub async fn members(&self) -> AppResult<Vec<Member>> {
        self.read_or_seed(keys::MEMBERS, demo_seed::demo_members).await
    }

    pub async fn save_members(&self, members: &[Member]) -> AppResult<()> {
        Ok(self.write_collection(keys::MEMBERS, members).await?)
    }

    pub async fn users(&self) -> AppResult<Vec<User>> {
        Ok(self.read_collection(keys::USERS).await?.unwrap_or_default())
    }

    pub async fn save_users(&self, users: &[User]) -> AppResult<()> {
        Ok(self.write_collection(keys::USERS, users).await?)
    }

    pub async fn user(&self, user_id: &str) -> AppResult<Option<User>> {
        Ok(self.users().await?.into_iter().find(|u| u.id == user_id))
    }

    /// Replaces the user with the same id, or appends it
    pub async fn save_user(&self, user: &User) -> AppResult<()> {
        let mut users = self.users().await?;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        self.save_users(&users).await
    }

    pub async fn current_user_id(&self) -> AppResult<Option<String>> {
        let raw = match self.storage.get(keys::CURRENT_USER_ID).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match serde_json::from_str::<String>(&raw) {
            Ok(id) => Ok(Some(id)),
            Err(e) => {
                log::warn!("⚠️  Malformed current session id, ignoring: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn set_current_user_id(&self, user_id: Option<&str>) -> AppResult<()> {
        match user_id {
            Some(id) => {
                let raw = serde_json::to_string(id).map_err(|e| StorageError::Corrupt(e.to_string()))?;
                self.storage.set(keys::CURRENT_USER_ID, raw).await?;
            }
            None => self.storage.remove(keys::CURRENT_USER_ID).await?,
        }
        Ok(())
    }

    /// User behind the current session id; a dangling id reads as no session
    pub async fn current_user(&self) -> AppResult<Option<User>> {
        match self.current_user_id().await? {
            Some(id) => self.user(&id).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthMethod;
    use crate::storage::MemoryStorage;

    fn repo_with(storage: Arc<MemoryStorage>) -> Repository {
        Repository::new(storage)
    }

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.into(),
            name: name.into(),
            email: None,
            phone_number: Some("0244000000".into()),
            auth_method: AuthMethod::Phone,
            role: None,
            joined_clubs: vec![],
            payment_methods: vec![],
            subscriptions: Default::default(),
            custom_amounts: Default::default(),
        }
    }

    #[tokio::test]
    async fn absent_collections_are_seeded_and_written() {
        let storage = Arc::new(MemoryStorage::new());
        let repo = repo_with(storage.clone());

        let clubs = repo.clubs().await.unwrap();
        assert_eq!(clubs, demo_seed::demo_clubs());
        assert!(storage.get(keys::CLUBS).await.unwrap().is_some());

        let members = repo.members().await.unwrap();
        assert_eq!(members.len(), 4);
        assert!(storage.get(keys::MEMBERS).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn first_save_survives_concurrent_seeding_reads() {
        let storage = Arc::new(MemoryStorage::new());
        let repo = repo_with(storage.clone());

        let writer = {
            let repo = repo.clone();
            tokio::spawn(async move {
                let _guard = repo.lock().await;
                let mut clubs = repo.clubs().await.unwrap();
                clubs.retain(|c| c.id == "c1");
                repo.save_clubs(&clubs).await.unwrap();
            })
        };
        let readers: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.clubs().await.unwrap() })
            })
            .collect();

        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }

        let stored = repo.clubs().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, "c1");
    }

    #[tokio::test]
    async fn malformed_collection_reads_as_empty_without_seeding() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(keys::CLUBS, "{broken".into()).await.unwrap();
        storage.set(keys::USERS, "42".into()).await.unwrap();
        let repo = repo_with(storage.clone());

        assert!(repo.clubs().await.unwrap().is_empty());
        assert!(repo.users().await.unwrap().is_empty());
        assert_eq!(storage.get(keys::CLUBS).await.unwrap().as_deref(), Some("{broken"));
    }

    #[tokio::test]
    async fn saved_clubs_reload_field_for_field() {
        let repo = repo_with(Arc::new(MemoryStorage::new()));
        let mut clubs = demo_seed::demo_clubs();
        clubs[1].payment_items.clear();
        clubs[0].stats.pending_dues = 12.5;

        repo.save_clubs(&clubs).await.unwrap();
        assert_eq!(repo.clubs().await.unwrap(), clubs);
    }

    #[tokio::test]
    async fn save_user_upserts_by_id() {
        let repo = repo_with(Arc::new(MemoryStorage::new()));
        repo.save_user(&user("u1", "First")).await.unwrap();
        repo.save_user(&user("u2", "Second")).await.unwrap();
        repo.save_user(&user("u1", "Renamed")).await.unwrap();

        let users = repo.users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(repo.user("u1").await.unwrap().map(|u| u.name), Some("Renamed".into()));
    }

    #[tokio::test]
    async fn current_session_id_round_trip() {
        let repo = repo_with(Arc::new(MemoryStorage::new()));
        assert_eq!(repo.current_user().await.unwrap(), None);

        repo.save_user(&user("u1", "First")).await.unwrap();
        repo.set_current_user_id(Some("u1")).await.unwrap();
        assert_eq!(repo.current_user_id().await.unwrap().as_deref(), Some("u1"));
        assert_eq!(repo.current_user().await.unwrap().map(|u| u.id), Some("u1".into()));

        repo.set_current_user_id(None).await.unwrap();
        assert_eq!(repo.current_user_id().await.unwrap(), None);
    }

    #[tokio::test]
    async fn dangling_session_id_reads_as_no_user() {
        let repo = repo_with(Arc::new(MemoryStorage::new()));
        repo.set_current_user_id(Some("ghost")).await.unwrap();
        assert_eq!(repo.current_user().await.unwrap(), None);
    }
}
