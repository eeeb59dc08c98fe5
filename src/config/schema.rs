//! Configuration schema for sample-mirror
//!
//! Configuration is stored at `~/.config/sample-mirror/config.toml`

use crate::mirror::MirrorOptions;
use crate::sync::{DEFAULT_QUEUE_CAPACITY, DEFAULT_RETRIES, DEFAULT_WORKERS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public endpoint serving the sample catalog
pub const SAMPLES_ENDPOINT: &str = "https://iotdk.intel.com/samples-iss";

/// Catalog version used when no `version.txt` sits next to the binary
pub const LATEST_VERSION_KEY: &str = "latest";

/// Cache directory name created under the home directory
pub const LOCAL_STORAGE_DEFAULT: &str = ".sample-mirror";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Remote catalog settings
    pub remote: RemoteConfig,

    /// Local cache settings
    pub cache: CacheConfig,

    /// HTTP client settings
    pub http: HttpConfig,
}

impl Config {
    /// Options for opening a mirror with this configuration
    pub fn mirror_options(&self) -> MirrorOptions {
        let base_url = self
            .remote
            .base_url
            .clone()
            .unwrap_or_else(default_base_url);
        let cache_dir = self.cache.dir.clone().unwrap_or_else(default_cache_dir);

        let mut options = MirrorOptions::new(base_url, cache_dir, self.remote.languages.clone());
        options.ignore_os = self.cache.ignore_os;
        options.bulk = self.cache.bulk;
        options.workers = self.cache.workers;
        options.retries = self.cache.retries;
        options.queue_capacity = self.cache.queue_capacity;
        options
    }

    /// Per-request HTTP timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Remote catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Base URL of the catalog (default: endpoint + version.txt or "latest")
    pub base_url: Option<String>,

    /// Languages to mirror
    pub languages: Vec<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            languages: vec!["cpp".to_string(), "python".to_string()],
        }
    }
}

/// Local cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory (default: ~/.sample-mirror)
    pub dir: Option<PathBuf>,

    /// Pre-fetch every sample archive on sync
    pub bulk: bool,

    /// Show samples for every OS, not only the host's
    pub ignore_os: bool,

    /// Concurrent download workers in bulk mode
    pub workers: usize,

    /// Attempts per archive in bulk mode
    pub retries: u32,

    /// Capacity of the bulk job queue
    pub queue_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            bulk: false,
            ignore_os: false,
            workers: DEFAULT_WORKERS,
            retries: DEFAULT_RETRIES,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Timeout for every request in seconds
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Default cache directory under the user's home
pub fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOCAL_STORAGE_DEFAULT)
}

/// Catalog URL pinned by a `version.txt` next to the executable, or the latest one
pub fn default_base_url() -> String {
    let version = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(read_version_file));
    base_url_for(version.as_deref())
}

fn base_url_for(version: Option<&str>) -> String {
    format!(
        "{}/{}/",
        SAMPLES_ENDPOINT,
        version.unwrap_or(LATEST_VERSION_KEY)
    )
}

/// First non-empty line of `{dir}/version.txt`
fn read_version_file(dir: &Path) -> Option<String> {
    let content = std::fs::read_to_string(dir.join("version.txt")).ok()?;
    let line = content.lines().next()?.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}
