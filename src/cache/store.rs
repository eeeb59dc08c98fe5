//! Filesystem layout of the local sample cache
//!
//! Everything lives below a versioned root so that a future layout change
//! can sit next to the current one:
//!
//! ```text
//! {dir}/v1/{language}.json
//! {dir}/v1/{language}/{path}/{language}.tar.gz
//! {dir}/v1/lock
//! ```

use crate::error::{MirrorError, MirrorResult};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Version level of the on-disk layout, appended to the configured directory
pub const CACHE_API_LEVEL: &str = "v1";

/// Name of the marker file that poisons the cache
pub const LOCK_FILE_NAME: &str = "lock";

/// Trust state of the local cache, derived from the lock marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No lock marker, the cache may be used
    Trusted,
    /// A bulk run failed; unusable until an operator clears it
    Locked,
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Trusted => "trusted",
            Self::Locked => "locked",
        };
        write!(f, "{}", s)
    }
}

/// Handle on the versioned cache root. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `{dir}/v1`. Nothing is touched on disk.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            root: dir.as_ref().join(CACHE_API_LEVEL),
        }
    }

    /// The versioned root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local copy of a language index
    pub fn index_path(&self, language: &str) -> PathBuf {
        self.root.join(format!("{}.json", language))
    }

    /// Directory holding every archive of a language
    pub fn archive_dir(&self, language: &str) -> PathBuf {
        self.root.join(language)
    }

    /// Archive location for a sample, unique per `(language, path)`
    pub fn archive_path(&self, language: &str, sample_path: &str) -> MirrorResult<PathBuf> {
        let relative = checked_relative(sample_path)?;
        Ok(self
            .archive_dir(language)
            .join(relative)
            .join(format!("{}.tar.gz", language)))
    }

    /// Location of the poison marker
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE_NAME)
    }

    /// Create a directory (and parents) readable only by owner and group
    pub async fn ensure_dir(&self, path: &Path) -> MirrorResult<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| MirrorError::io(format!("creating directory {}", path.display()), e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o750);
            tokio::fs::set_permissions(path, perms).await.map_err(|e| {
                MirrorError::io(format!("setting permissions on {}", path.display()), e)
            })?;
        }

        Ok(())
    }

    /// Whether the poison marker exists
    pub fn is_locked(&self) -> bool {
        self.lock_path().exists()
    }

    /// Current trust state
    pub fn state(&self) -> CacheState {
        if self.is_locked() {
            CacheState::Locked
        } else {
            CacheState::Trusted
        }
    }

    /// Poison the cache. Only an operator clears this again.
    pub fn lock(&self) -> MirrorResult<()> {
        let path = self.lock_path();
        std::fs::File::create(&path).map_err(|source| MirrorError::CacheLockWrite {
            path: path.clone(),
            source,
        })?;
        warn!("Sample cache poisoned: {}", path.display());
        Ok(())
    }

    /// Remove the whole versioned root, lock marker included
    pub async fn clear(&self) -> MirrorResult<()> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => {
                debug!("Removed sample cache {}", self.root.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MirrorError::io(
                format!("removing {}", self.root.display()),
                e,
            )),
        }
    }
}

/// Accept only plain relative paths so an index entry cannot escape the cache
fn checked_relative(sample_path: &str) -> MirrorResult<&Path> {
    let path = Path::new(sample_path);
    if sample_path.is_empty() {
        return Err(MirrorError::PathInvalid {
            path: path.to_path_buf(),
            reason: "empty sample path".to_string(),
        });
    }
    if let Some(bad) = unsafe_component(path) {
        return Err(MirrorError::PathInvalid {
            path: path.to_path_buf(),
            reason: format!("unexpected component {:?}", bad.as_os_str()),
        });
    }
    Ok(path)
}

/// First component that would leave the directory `path` is joined onto
pub(crate) fn unsafe_component(path: &Path) -> Option<Component<'_>> {
    path.components()
        .find(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
}
