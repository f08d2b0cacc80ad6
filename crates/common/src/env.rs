//! Environment/runtime helpers
//!
//! Sanity checks to ensure the directories a file-backed store needs exist at startup.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the parent directory of `file_path` exists, creating it if needed.
///
/// A bare file name (no parent component) resolves against the working
/// directory and needs nothing created.
pub async fn ensure_parent_dir(file_path: &Path) -> anyhow::Result<()> {
    let parent = match file_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };
    if tokio::fs::metadata(parent).await.is_ok() {
        return Ok(());
    }
    warn!(dir = %parent.display(), "data directory not found; creating it");
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    debug!(dir = %parent.display(), "data directory created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_parent() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("env_{}", uuid::Uuid::new_v4()));
        let file = root.join("nested").join("users.json");
        ensure_parent_dir(&file).await?;
        assert!(tokio::fs::metadata(root.join("nested")).await?.is_dir());
        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }

    #[tokio::test]
    async fn bare_file_name_is_noop() -> anyhow::Result<()> {
        ensure_parent_dir(Path::new("users.json")).await?;
        Ok(())
    }
}
