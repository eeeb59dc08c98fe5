//! Expansion of sample archives
//!
//! Sample tarballs are not always well formed: a file may be listed before
//! its directory, or its directory may never be listed at all. Parents are
//! created on demand and stored file modes are kept.

use crate::cache::store::unsafe_component;
use crate::error::{MirrorError, MirrorResult};
use flate2::read::GzDecoder;
use std::fs;
use std::path::Path;
use tar::{Archive, EntryType};
use tracing::debug;

/// Extract a `.tar.gz` archive into `dest`, creating `dest` if needed
pub fn extract_tar_gz(archive: &Path, dest: &Path) -> MirrorResult<()> {
    let fail = |reason: String| MirrorError::Extract {
        archive: archive.to_path_buf(),
        reason,
    };

    fs::create_dir_all(dest)
        .map_err(|e| MirrorError::io(format!("creating {}", dest.display()), e))?;

    let file = fs::File::open(archive)
        .map_err(|e| MirrorError::io(format!("opening {}", archive.display()), e))?;
    let mut tarball = Archive::new(GzDecoder::new(file));
    tarball.set_preserve_permissions(true);

    let entries = tarball.entries().map_err(|e| fail(e.to_string()))?;
    let mut count = 0usize;
    for entry in entries {
        let mut entry = entry.map_err(|e| fail(e.to_string()))?;
        let entry_path = entry.path().map_err(|e| fail(e.to_string()))?.into_owned();
        if let Some(bad) = unsafe_component(&entry_path) {
            return Err(fail(format!(
                "entry {} escapes the destination ({:?})",
                entry_path.display(),
                bad.as_os_str()
            )));
        }

        match entry.header().entry_type() {
            EntryType::Directory => {}
            EntryType::Regular => {
                if let Some(parent) = entry_path.parent() {
                    let target = dest.join(parent);
                    fs::create_dir_all(&target).map_err(|e| {
                        MirrorError::io(format!("creating {}", target.display()), e)
                    })?;
                }
            }
            other => {
                debug!("Skipping {:?} entry {}", other, entry_path.display());
                continue;
            }
        }

        // unpack_in still guards against symlinked parents
        let unpacked = entry
            .unpack_in(dest)
            .map_err(|e| fail(format!("{}: {}", entry_path.display(), e)))?;
        if !unpacked {
            return Err(fail(format!(
                "entry {} escapes the destination",
                entry_path.display()
            )));
        }
        count += 1;
    }

    debug!("Extracted {} entries into {}", count, dest.display());
    Ok(())
}
