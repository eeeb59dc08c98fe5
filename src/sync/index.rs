//! Per-language index reconciliation
//!
//! The remote index is always fetched in full and compared with the local
//! copy by digest. No conditional requests, no timestamps: a changed body
//! is the only thing that triggers a rewrite.

use crate::cache::{hash, local_hash, CacheStore};
use crate::catalog::{parse_index, Sample};
use crate::error::{MirrorError, MirrorResult};
use crate::transport::Transport;
use tracing::{debug, info, warn};

/// Outcome of syncing every configured language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Languages whose local index was (re)written
    pub updated: Vec<String>,
    /// Languages served from the local copy because the remote was unreachable
    pub offline: Vec<String>,
}

impl SyncReport {
    /// True when every language reached the remote
    pub fn is_online(&self) -> bool {
        self.offline.is_empty()
    }
}

/// URL of a language index
pub fn index_url(base_url: &str, language: &str) -> String {
    format!("{}/{}.json", base_url, language)
}

/// Brings local index files in line with the remote ones
pub struct IndexSynchronizer<'a> {
    store: &'a CacheStore,
    transport: &'a dyn Transport,
    base_url: &'a str,
}

impl<'a> IndexSynchronizer<'a> {
    pub fn new(store: &'a CacheStore, transport: &'a dyn Transport, base_url: &'a str) -> Self {
        Self {
            store,
            transport,
            base_url,
        }
    }

    /// Sync each language in order, stopping at the first fatal error
    pub async fn sync(&self, languages: &[String]) -> MirrorResult<SyncReport> {
        let mut report = SyncReport::default();
        for language in languages {
            self.sync_language(language, &mut report).await?;
        }
        Ok(report)
    }

    async fn sync_language(&self, language: &str, report: &mut SyncReport) -> MirrorResult<()> {
        let local_path = self.store.index_path(language);
        let url = index_url(self.base_url, language);

        let remote = match self.transport.get(&url).await {
            Ok(body) => Ok((hash(&body), body)),
            Err(e) => {
                warn!(
                    "Failed to reach sample index for '{}', attempting to use local cache: {}",
                    language, e
                );
                report.offline.push(language.to_string());
                Err(e)
            }
        };

        let local_exists = tokio::fs::try_exists(&local_path)
            .await
            .map_err(|e| MirrorError::io(format!("checking {}", local_path.display()), e))?;

        let body = match (remote, local_exists) {
            (Err(e), false) => {
                return Err(MirrorError::OfflineNoCache {
                    language: language.to_string(),
                    reason: e.to_string(),
                });
            }
            (Err(_), true) => None,
            (Ok((_, body)), false) => Some(body),
            (Ok((remote_digest, body)), true) => {
                let local_digest = local_hash(&local_path).await?;
                if local_digest == remote_digest {
                    debug!("Index for '{}' unchanged ({})", language, &remote_digest[..12]);
                    None
                } else {
                    Some(body)
                }
            }
        };

        if let Some(body) = body {
            tokio::fs::write(&local_path, &body)
                .await
                .map_err(|e| MirrorError::io(format!("writing {}", local_path.display()), e))?;
            info!("Updated index for '{}'", language);
            report.updated.push(language.to_string());
        }

        self.store
            .ensure_dir(&self.store.archive_dir(language))
            .await
    }
}

/// Decode the local index of a language
pub async fn load_index(store: &CacheStore, language: &str) -> MirrorResult<Vec<Sample>> {
    let path = store.index_path(language);
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        MirrorError::io(
            format!("unable to read index for configured language '{}'", language),
            e,
        )
    })?;

    parse_index(&bytes).map_err(|source| MirrorError::IndexDecode {
        language: language.to_string(),
        source,
    })
}
