//! Flat on-disk store of icon images, one `<icon>.png` file per identifier.
//!
//! Entries never expire: once written, a file is trusted until someone
//! deletes it by hand.

use std::{
    io::ErrorKind,
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
};

use tokio::fs;
use tracing::{debug, warn};

use crate::{Config, error::FetchError};

const ENTRY_EXTENSION: &str = "png";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct IconCache {
    dir: PathBuf,
}

impl IconCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.icon_cache_dir()?))
    }

    pub fn entry_path(&self, icon: &str) -> PathBuf {
        self.dir.join(format!("{icon}.{ENTRY_EXTENSION}"))
    }

    /// Raw bytes of the entry, or `None` when it cannot be read for any reason.
    pub async fn read(&self, icon: &str) -> Option<Vec<u8>> {
        let path = self.entry_path(icon);

        match fs::read(&path).await {
            Ok(bytes) => {
                debug!(path = %path.display(), "icon cache hit");
                Some(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "icon cache miss");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable icon cache entry");
                None
            }
        }
    }

    pub async fn contains(&self, icon: &str) -> bool {
        fs::try_exists(self.entry_path(icon)).await.unwrap_or(false)
    }

    /// Store `bytes` as the entry for `icon`, replacing any previous one.
    pub async fn write(&self, icon: &str, bytes: &[u8]) -> Result<PathBuf, FetchError> {
        let path = self.entry_path(icon);
        let cache_err = |source| FetchError::Cache {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).await.map_err(cache_err)?;

        // Each write gets its own temp file, so concurrent writers of one icon
        // never share it and readers only ever see a complete entry.
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let temp_path = self
            .dir
            .join(format!(".{icon}.{}.{seq}.tmp", std::process::id()));
        fs::write(&temp_path, bytes).await.map_err(cache_err)?;
        fs::rename(&temp_path, &path).await.map_err(cache_err)?;

        debug!(path = %path.display(), len = bytes.len(), "saved icon to cache");
        Ok(path)
    }
}
