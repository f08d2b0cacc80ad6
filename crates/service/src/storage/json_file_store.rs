use std::path::{Path, PathBuf};

use async_trait::async_trait;
use models::UserStore;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::storage::repository::UserRepository;

/// User store persisted as one JSON document at a fixed path.
///
/// Every `load` reads and decodes the whole file, every `save` rewrites it.
/// Writes are not atomic: a crash mid-write can leave a truncated file.
#[derive(Clone, Debug)]
pub struct JsonFileUserRepository {
    file_path: PathBuf,
}

impl JsonFileUserRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Create the parent directory and seed an empty store if no file exists.
    /// Returns whether a file was created. An existing file is left untouched.
    pub async fn init_if_missing(&self) -> Result<bool, ServiceError> {
        if fs::metadata(&self.file_path).await.is_ok() {
            return Ok(false);
        }
        common::env::ensure_parent_dir(&self.file_path)
            .await
            .map_err(|e| ServiceError::StoreUnavailable(e.to_string()))?;

        let data = serde_json::to_vec(&UserStore::default())
            .map_err(|e| ServiceError::StoreCorrupt(e.to_string()))?;
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&self.file_path).await {
            Ok(f) => f,
            // another process seeded it first
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(ServiceError::unavailable(&self.file_path, e)),
        };
        file.write_all(&data).await.map_err(|e| ServiceError::unavailable(&self.file_path, e))?;
        file.flush().await.map_err(|e| ServiceError::unavailable(&self.file_path, e))?;
        info!(path = %self.file_path.display(), "seeded empty user store");
        Ok(true)
    }
}

#[async_trait]
impl UserRepository for JsonFileUserRepository {
    async fn load(&self) -> Result<UserStore, ServiceError> {
        let bytes = fs::read(&self.file_path)
            .await
            .map_err(|e| ServiceError::unavailable(&self.file_path, e))?;
        let store: UserStore =
            serde_json::from_slice(&bytes).map_err(|e| ServiceError::StoreCorrupt(e.to_string()))?;
        debug!(path = %self.file_path.display(), users = store.len(), increment = store.increment, "store loaded");
        Ok(store)
    }

    async fn save(&self, store: &UserStore) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(store).map_err(|e| ServiceError::StoreCorrupt(e.to_string()))?;
        fs::write(&self.file_path, data)
            .await
            .map_err(|e| ServiceError::unavailable(&self.file_path, e))?;
        debug!(path = %self.file_path.display(), users = store.len(), increment = store.increment, "store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store_path;

    #[tokio::test]
    async fn save_then_load_round_trips() -> Result<(), anyhow::Error> {
        let tmp = temp_store_path("roundtrip");
        let repo = JsonFileUserRepository::new(&tmp);
        assert!(repo.init_if_missing().await?);

        let mut store = repo.load().await?;
        assert_eq!(store, UserStore::default());
        store.create("A".into(), "a@x.com".into())?;
        store.create("B".into(), "b@x.com".into())?;
        repo.save(&store).await?;

        let reloaded = repo.load().await?;
        assert_eq!(reloaded.increment, 2);
        assert_eq!(reloaded.list, store.list);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn init_keeps_existing_file() -> Result<(), anyhow::Error> {
        let tmp = temp_store_path("keep");
        let repo = JsonFileUserRepository::new(&tmp);
        let mut store = UserStore::default();
        store.create("A".into(), "a@x.com".into())?;
        repo.save(&store).await?;

        assert!(!repo.init_if_missing().await?);
        assert_eq!(repo.load().await?.len(), 1);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let repo = JsonFileUserRepository::new(temp_store_path("missing"));
        let err = repo.load().await.unwrap_err();
        assert!(matches!(err, ServiceError::StoreUnavailable(_)), "{err:?}");
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn malformed_file_is_corrupt() -> Result<(), anyhow::Error> {
        let tmp = temp_store_path("corrupt");
        tokio::fs::write(&tmp, b"{\"increment\": ").await?;
        let err = JsonFileUserRepository::new(&tmp).load().await.unwrap_err();
        assert!(matches!(err, ServiceError::StoreCorrupt(_)), "{err:?}");

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn seeds_into_nested_directory() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("user_store_dir_{}", uuid::Uuid::new_v4()));
        let repo = JsonFileUserRepository::new(dir.join("data").join("users.json"));
        assert!(repo.init_if_missing().await?);
        let raw = tokio::fs::read_to_string(repo.path()).await?;
        assert_eq!(raw, r#"{"increment":0,"list":{}}"#);

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
