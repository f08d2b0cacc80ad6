use std::sync::Arc;

use models::{User, UserList};
use serde::Deserialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::info;

use crate::errors::ServiceError;
use crate::storage::UserRepository;

/// Body of a create request. Missing fields decode as empty strings.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CreateUserInput {
    pub display_name: String,
    pub email: String,
}

/// Body of an update request. Only the display name can change.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UpdateUserInput {
    pub display_name: String,
}

impl CreateUserInput {
    pub fn from_json(body: &[u8]) -> Result<Self, ServiceError> {
        decode_json(body)
    }

    /// Accepts every decoded payload; empty fields are stored as given.
    pub fn validate(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

impl UpdateUserInput {
    pub fn from_json(body: &[u8]) -> Result<Self, ServiceError> {
        decode_json(body)
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

fn decode_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
    serde_json::from_slice(body).map_err(|e| ServiceError::Validation(e.to_string()))
}

/// User operations over a whole-document repository.
///
/// Each call loads the store, mutates its own copy and (for writes) saves
/// the whole document back. Without a write lock two concurrent writers
/// can both load the same snapshot and the later save wins.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    write_lock: Option<Arc<Mutex<()>>>,
}

impl UserService {
    /// Unlocked service: writes race exactly as the file allows.
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo, write_lock: None }
    }

    /// Service whose writes are serialized by one process-wide lock held
    /// across load, mutate and save.
    pub fn with_serialized_writes(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo, write_lock: Some(Arc::new(Mutex::new(()))) }
    }

    pub fn serializes_writes(&self) -> bool {
        self.write_lock.is_some()
    }

    async fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }

    /// Every stored user keyed by id.
    pub async fn search(&self) -> Result<UserList, ServiceError> {
        let store = self.repo.load().await?;
        Ok(store.list)
    }

    /// Load the store and fetch one user by id.
    pub async fn resolve(&self, id: &str) -> Result<User, ServiceError> {
        let store = self.repo.load().await?;
        Ok(store.lookup(id)?.clone())
    }

    /// Create a user and return its new id.
    ///
    /// The store is loaded before `input` is evaluated, so a store failure
    /// wins over a malformed body.
    pub async fn create<F>(&self, input: F) -> Result<String, ServiceError>
    where
        F: FnOnce() -> Result<CreateUserInput, ServiceError>,
    {
        let _guard = self.write_guard().await;
        let mut store = self.repo.load().await?;
        let input = input()?;
        input.validate()?;

        let id = store.create(input.display_name, input.email)?.id.clone();
        self.repo.save(&store).await?;
        info!(user_id = %id, increment = store.increment, "user created");
        Ok(id)
    }

    /// Overwrite the display name of an already resolved user.
    ///
    /// The resolved copy is written back over whatever the fresh load holds
    /// under that id; with serialized writes a record deleted in between is
    /// reported as not found instead.
    pub async fn update<F>(&self, mut user: User, input: F) -> Result<User, ServiceError>
    where
        F: FnOnce() -> Result<UpdateUserInput, ServiceError>,
    {
        let _guard = self.write_guard().await;
        let mut store = self.repo.load().await?;
        let input = input()?;
        input.validate()?;
        if self.serializes_writes() {
            store.lookup(&user.id)?;
        }

        user.display_name = input.display_name;
        store.put(user.clone());
        self.repo.save(&store).await?;
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    /// Remove an already resolved user.
    pub async fn delete(&self, user: &User) -> Result<(), ServiceError> {
        let _guard = self.write_guard().await;
        let mut store = self.repo.load().await?;
        if self.serializes_writes() {
            store.lookup(&user.id)?;
        }

        store.remove(&user.id);
        self.repo.save(&store).await?;
        info!(user_id = %user.id, "user deleted");
        Ok(())
    }
}
