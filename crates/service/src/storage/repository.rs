use async_trait::async_trait;
use models::UserStore;

use crate::errors::ServiceError;

/// Whole-document persistence for the user collection.
///
/// Implementations read and write the complete store every time; there is
/// no partial update and no concurrency token.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn load(&self) -> Result<UserStore, ServiceError>;
    async fn save(&self, store: &UserStore) -> Result<(), ServiceError>;
}
