//! Filesystem infrastructure: implements the `LocalFs` port.

use std::path::Path;

use anyhow::{Context, Result};

/// Production filesystem implementation of `LocalFs`.
pub struct OsFs;

impl crate::application::ports::LocalFs for OsFs {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        // Backend error logs are not guaranteed to be valid UTF-8.
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading file {}", path.display()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
