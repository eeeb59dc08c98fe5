//! The mirror handle
//!
//! A [`Mirror`] is constructed once per process by its caller and owns the
//! cache store, the configured languages and the current [`Samples`].
//! Construction performs the initial sync; [`Mirror::update`] re-syncs.

use crate::cache::CacheStore;
use crate::catalog::{filter_on_os, host_os, Sample, Samples};
use crate::error::{MirrorError, MirrorResult};
use crate::sync::{
    load_index, BulkReport, IndexSynchronizer, LazyFetcher, RetrievalScheduler, SyncReport,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_RETRIES, DEFAULT_WORKERS,
};
use crate::transport::Transport;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything needed to open a mirror
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    /// Absolute http(s) URL of the remote catalog
    pub base_url: String,
    /// Cache directory; the versioned root is created below it
    pub cache_dir: PathBuf,
    /// Languages to mirror, fixed for the lifetime of the mirror
    pub languages: Vec<String>,
    /// Expose samples for every OS instead of only the host's
    pub ignore_os: bool,
    /// Host OS identifier matched against sample OS tags
    pub host_os: String,
    /// Pre-fetch every archive on each sync
    pub bulk: bool,
    pub workers: usize,
    pub retries: u32,
    pub queue_capacity: usize,
}

impl MirrorOptions {
    pub fn new(
        base_url: impl Into<String>,
        cache_dir: impl Into<PathBuf>,
        languages: Vec<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            cache_dir: cache_dir.into(),
            languages,
            ignore_os: false,
            host_os: host_os().to_string(),
            bulk: false,
            workers: DEFAULT_WORKERS,
            retries: DEFAULT_RETRIES,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Local mirror of the remote sample catalog
pub struct Mirror {
    base_url: String,
    store: CacheStore,
    languages: Vec<String>,
    fetcher: LazyFetcher,
    scheduler: RetrievalScheduler,
    transport: Arc<dyn Transport>,
    samples: Samples,
    online: bool,
    ignore_os: bool,
    host_os: String,
    bulk: bool,
}

impl Mirror {
    /// Validate options, refuse a locked cache, then run the initial sync
    pub async fn open(options: MirrorOptions, transport: Arc<dyn Transport>) -> MirrorResult<Self> {
        let base_url = validate_base_url(&options.base_url)?;

        if options.cache_dir.as_os_str().is_empty() {
            return Err(MirrorError::Config("no cache directory given".to_string()));
        }
        let store = CacheStore::new(&options.cache_dir);
        store.ensure_dir(store.root()).await?;

        if store.is_locked() {
            return Err(MirrorError::CacheLocked {
                path: store.lock_path(),
            });
        }

        validate_languages(&options.languages)?;

        let fetcher = LazyFetcher::new(store.clone(), transport.clone(), base_url.clone());
        let scheduler =
            RetrievalScheduler::new(options.workers, options.retries, options.queue_capacity);

        let mut mirror = Self {
            base_url,
            store,
            languages: options.languages,
            fetcher,
            scheduler,
            transport,
            samples: Samples::new(),
            online: false,
            ignore_os: options.ignore_os,
            host_os: options.host_os,
            bulk: options.bulk,
        };
        mirror.update().await?;
        Ok(mirror)
    }

    /// Re-sync every language index, reload the samples and, in bulk mode,
    /// retrieve every archive
    pub async fn update(&mut self) -> MirrorResult<SyncReport> {
        if self.store.is_locked() {
            return Err(MirrorError::CacheLocked {
                path: self.store.lock_path(),
            });
        }

        let report = IndexSynchronizer::new(&self.store, self.transport.as_ref(), &self.base_url)
            .sync(&self.languages)
            .await?;
        self.online = report.is_online();

        let mut samples = Samples::new();
        for language in &self.languages {
            let mut collected = load_index(&self.store, language).await?;
            if !self.ignore_os {
                collected = filter_on_os(collected, &self.host_os);
            }
            debug!("Loaded {} '{}' sample(s)", collected.len(), language);
            samples.insert(language.clone(), collected);
        }
        self.samples = samples;

        if self.bulk {
            self.retrieve_all().await?;
        }

        Ok(report)
    }

    /// Retrieve the archive of every visible sample
    pub async fn retrieve_all(&self) -> MirrorResult<BulkReport> {
        if self.store.is_locked() {
            return Err(MirrorError::CacheLocked {
                path: self.store.lock_path(),
            });
        }
        let items = self.scheduler.work_items(&self.samples);
        let report = self.scheduler.run(&self.fetcher, &self.store, items).await?;
        info!("Sample cache complete ({} archive(s))", report.total);
        Ok(report)
    }

    /// Samples of every language, OS filter applied
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Samples of one language, `None` if it is not configured
    pub fn samples_for(&self, language: &str) -> Option<&[Sample]> {
        self.samples.get(language).map(Vec::as_slice)
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The versioned cache root
    pub fn local_path(&self) -> &Path {
        self.store.root()
    }

    /// Whether the last sync reached the remote for every language
    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn is_bulk(&self) -> bool {
        self.bulk
    }

    /// On-demand archive retrieval for callers outside the bulk pass
    pub fn fetcher(&self) -> &LazyFetcher {
        &self.fetcher
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }
}

impl fmt::Debug for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mirror")
            .field("base_url", &self.base_url)
            .field("root", &self.store.root())
            .field("languages", &self.languages)
            .field("samples", &self.samples.values().map(Vec::len).sum::<usize>())
            .field("online", &self.online)
            .field("bulk", &self.bulk)
            .finish_non_exhaustive()
    }
}

/// Accept absolute http(s) URLs with a host, trimmed of trailing slashes
fn validate_base_url(raw: &str) -> MirrorResult<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(MirrorError::Config("no sample URL given".to_string()));
    }

    let parsed = url::Url::parse(raw)
        .map_err(|e| MirrorError::Config(format!("invalid sample URL '{}': {}", raw, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(MirrorError::Config(format!(
            "sample URL '{}' must be an absolute http(s) URL",
            raw
        )));
    }

    Ok(raw.trim_end_matches('/').to_string())
}

fn validate_languages(languages: &[String]) -> MirrorResult<()> {
    if languages.is_empty() {
        return Err(MirrorError::Config("no languages selected".to_string()));
    }
    if let Some(bad) = languages
        .iter()
        .find(|l| l.is_empty() || l.contains(['/', '\\']) || l.as_str() == "..")
    {
        return Err(MirrorError::Config(format!("invalid language '{}'", bad)));
    }
    Ok(())
}
