//! Network access for index and archive retrieval
//!
//! The sync engine only talks to the network through [`Transport`], so tests
//! can substitute a scripted implementation. [`HttpTransport`] is the real
//! one: a blocking `ureq` agent driven from tokio's blocking pool, with a
//! fixed timeout on every request.

use crate::error::{MirrorError, MirrorResult};
use async_trait::async_trait;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Per-request timeout used when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for an index body held in memory
const MAX_INDEX_BYTES: u64 = 64 * 1024 * 1024;

/// Abstract network interface used by the sync engine
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET a URL and return the full body
    async fn get(&self, url: &str) -> MirrorResult<Vec<u8>>;

    /// GET a URL and stream the body into `dest`.
    ///
    /// `dest` only appears once the body has been completely written.
    async fn download(&self, url: &str, dest: &Path) -> MirrorResult<()>;
}

/// HTTP(S) transport backed by `ureq`. Honors `http_proxy`/`https_proxy`.
#[derive(Clone)]
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout
    pub fn new(timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self { agent }
    }

    fn call(&self, url: &str) -> MirrorResult<ureq::http::Response<ureq::Body>> {
        debug!("GET {}", url);
        self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => MirrorError::Http {
                url: url.to_string(),
                status,
            },
            other => MirrorError::network(url, other),
        })
    }

    fn get_blocking(&self, url: &str) -> MirrorResult<Vec<u8>> {
        let mut response = self.call(url)?;
        response
            .body_mut()
            .with_config()
            .limit(MAX_INDEX_BYTES)
            .read_to_vec()
            .map_err(|e| MirrorError::network(url, e))
    }

    fn download_blocking(&self, url: &str, dest: &Path) -> MirrorResult<()> {
        let response = self.call(url)?;

        let partial = partial_path(dest);
        let result = stream_to_file(url, response.into_body().into_reader(), &partial, dest);
        if result.is_err() {
            let _ = fs::remove_file(&partial);
        }
        result
    }
}

/// Copy `reader` into `partial`, then rename it to `dest`.
///
/// Read failures are network errors and may be retried. Write failures are
/// local I/O errors and are not.
fn stream_to_file(
    url: &str,
    mut reader: impl Read,
    partial: &Path,
    dest: &Path,
) -> MirrorResult<()> {
    let write_err = |e| MirrorError::io(format!("writing {}", partial.display()), e);

    let mut out = fs::File::create(partial).map_err(write_err)?;
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(MirrorError::network(url, e)),
        };
        out.write_all(&buf[..n]).map_err(write_err)?;
    }
    out.sync_all().map_err(write_err)?;

    fs::rename(partial, dest)
        .map_err(|e| MirrorError::io(format!("moving download to {}", dest.display()), e))
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> MirrorResult<Vec<u8>> {
        let this = self.clone();
        let url = url.to_string();
        tokio::task::spawn_blocking(move || this.get_blocking(&url))
            .await
            .map_err(|e| MirrorError::Internal(format!("http worker panicked: {}", e)))?
    }

    async fn download(&self, url: &str, dest: &Path) -> MirrorResult<()> {
        let this = self.clone();
        let url = url.to_string();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || this.download_blocking(&url, &dest))
            .await
            .map_err(|e| MirrorError::Internal(format!("http worker panicked: {}", e)))?
    }
}

/// Sibling file a download is streamed into before the final rename
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}
