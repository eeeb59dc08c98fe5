//! Content digests for cache invalidation
//!
//! Digests are compared for equality only. They never authenticate content.

use crate::error::{MirrorError, MirrorResult};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Hash a byte slice with SHA256, returning lowercase hex
pub fn hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Hash the contents of a file on disk
pub async fn local_hash(path: &Path) -> MirrorResult<String> {
    let contents = tokio::fs::read(path)
        .await
        .map_err(|e| MirrorError::io(format!("reading {}", path.display()), e))?;
    Ok(hash(&contents))
}
