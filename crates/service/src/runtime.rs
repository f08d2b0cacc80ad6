//! Runtime environment helpers
//!
//! Builds the user service from its storage settings at startup so binary
//! crates do not need to know how the file store is prepared.

use std::sync::Arc;

use tracing::{info, warn};

use crate::storage::JsonFileUserRepository;
use crate::user_service::UserService;

/// Open the JSON file store at `path` and wrap it in a `UserService`.
///
/// With `create_if_missing` an empty store is seeded when no file exists;
/// otherwise a missing file is only reported, and every request fails until
/// the file appears.
pub async fn open_user_service(
    path: &str,
    create_if_missing: bool,
    serialize_writes: bool,
) -> anyhow::Result<UserService> {
    let repo = JsonFileUserRepository::new(path);
    if create_if_missing {
        repo.init_if_missing().await?;
    } else if tokio::fs::metadata(repo.path()).await.is_err() {
        warn!(%path, "user store file not found; requests will fail until it exists");
    }

    info!(%path, serialize_writes, "user store ready");
    let repo = Arc::new(repo);
    Ok(if serialize_writes {
        UserService::with_serialized_writes(repo)
    } else {
        UserService::new(repo)
    })
}
