#![cfg(test)]
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use models::UserStore;
use tokio::sync::Mutex;

use crate::errors::ServiceError;
use crate::storage::UserRepository;

/// Unique scratch file path for one test.
pub fn temp_store_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("user_store_{tag}_{}.json", uuid::Uuid::new_v4()))
}

/// In-memory repository that keeps the document behind a mutex and can be
/// told to fail saves.
#[derive(Default)]
pub struct MemoryRepository {
    pub doc: Mutex<UserStore>,
    pub fail_saves: std::sync::atomic::AtomicBool,
}

impl MemoryRepository {
    pub fn shared(store: UserStore) -> Arc<Self> {
        Arc::new(Self { doc: Mutex::new(store), ..Default::default() })
    }
}

#[async_trait]
impl UserRepository for MemoryRepository {
    async fn load(&self) -> Result<UserStore, ServiceError> {
        // yield so concurrent callers interleave between load and save
        tokio::task::yield_now().await;
        Ok(self.doc.lock().await.clone())
    }

    async fn save(&self, store: &UserStore) -> Result<(), ServiceError> {
        if self.fail_saves.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(ServiceError::StoreUnavailable("users.json: read-only file system".into()));
        }
        tokio::task::yield_now().await;
        *self.doc.lock().await = store.clone();
        Ok(())
    }
}
