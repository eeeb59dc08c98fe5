//! On-demand retrieval of a single sample archive

use crate::cache::CacheStore;
use crate::error::{MirrorError, MirrorResult};
use crate::transport::Transport;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// URL of a sample archive
pub fn archive_url(base_url: &str, language: &str, sample_path: &str) -> String {
    format!("{}/{}/{}.tar.gz", base_url, sample_path, language)
}

/// Fetches archives into the cache, memoized by their presence on disk.
///
/// Makes exactly one attempt per call; retry policy belongs to the caller.
#[derive(Clone)]
pub struct LazyFetcher {
    store: CacheStore,
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl LazyFetcher {
    pub fn new(store: CacheStore, transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            transport,
            base_url: base_url.into(),
        }
    }

    /// Return the local archive for `(language, path)`, downloading it if absent
    pub async fn fetch(&self, language: &str, sample_path: &str) -> MirrorResult<PathBuf> {
        let dest = self.store.archive_path(language, sample_path)?;

        if tokio::fs::try_exists(&dest).await.unwrap_or(false) {
            debug!("Archive cached: {}", dest.display());
            return Ok(dest);
        }

        if let Some(parent) = dest.parent() {
            self.store.ensure_dir(parent).await?;
        }

        let url = archive_url(&self.base_url, language, sample_path);
        self.transport
            .download(&url, &dest)
            .await
            .map_err(|e| MirrorError::SampleDownload {
                path: sample_path.to_string(),
                source: Box::new(e),
            })?;

        debug!("Fetched {}", dest.display());
        Ok(dest)
    }

    /// Whether the archive is already present, without touching the network
    pub fn is_cached(&self, language: &str, sample_path: &str) -> bool {
        self.store
            .archive_path(language, sample_path)
            .map(|p| p.exists())
            .unwrap_or(false)
    }
}
