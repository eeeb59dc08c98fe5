//! Error types for sample-mirror
//!
//! All modules use `MirrorResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sample-mirror operations
pub type MirrorResult<T> = Result<T, MirrorError>;

/// All errors that can occur in sample-mirror
#[derive(Error, Debug)]
pub enum MirrorError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Network errors
    #[error("HTTP-{status} on {url}")]
    Http { url: String, status: u16 },

    #[error("Request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("Operating offline and no local index exists for '{language}': {reason}")]
    OfflineNoCache { language: String, reason: String },

    // Cache errors
    #[error("Sample cache is locked: {}", path.display())]
    CacheLocked { path: PathBuf },

    #[error("Failed to create cache lock file {path}: {source}")]
    CacheLockWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode index for '{language}': {source}")]
    IndexDecode {
        language: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to download sample '{path}': {source}")]
    SampleDownload {
        path: String,
        #[source]
        source: Box<MirrorError>,
    },

    #[error("{failed} of {total} sample archive(s) could not be retrieved; cache poisoned")]
    BulkRetrieval { failed: usize, total: usize },

    // Extraction errors
    #[error("Failed to extract {archive}: {reason}")]
    Extract { archive: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid path: {path}: {reason}")]
    PathInvalid { path: PathBuf, reason: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl MirrorError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a transport-level network error
    pub fn network(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { .. } | Self::Network { .. } => true,
            Self::SampleDownload { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CacheLocked { .. } => {
                Some("The local sample cache is corrupt. Run: sample-mirror clean")
            }
            Self::BulkRetrieval { .. } => {
                Some("Run: sample-mirror clean, then retry once the network is stable")
            }
            Self::Http { .. } | Self::Network { .. } | Self::OfflineNoCache { .. } => Some(
                "This may be your network/proxy environment. Try setting http_proxy, e.g. export http_proxy=http://your.proxy:8080",
            ),
            _ => None,
        }
    }
}
