//! CLI command implementations

pub mod clean;
pub mod config;
pub mod create;
pub mod fetch;
pub mod list;
pub mod sync;

pub use clean::execute as clean;
pub use config::execute as config;
pub use create::execute as create;
pub use fetch::execute as fetch;
pub use list::execute as list;
pub use sync::execute as sync;

use crate::config::Config;
use crate::error::{MirrorError, MirrorResult};
use crate::mirror::{Mirror, MirrorOptions};
use crate::transport::HttpTransport;
use std::sync::Arc;
use tracing::debug;

/// Open the mirror described by `options` over HTTP
pub(crate) async fn open_mirror(options: MirrorOptions, config: &Config) -> MirrorResult<Mirror> {
    debug!(
        "Opening sample mirror {} at {}",
        options.base_url,
        options.cache_dir.display()
    );
    eprintln!(
        "Connecting to the sample catalog, this may take some time depending on network conditions"
    );
    Mirror::open(options, Arc::new(HttpTransport::new(config.timeout()))).await
}

/// Fail unless `path` is a sample of `language` in the mirror's index
pub(crate) fn ensure_known_sample(
    mirror: &Mirror,
    language: &str,
    path: &str,
) -> MirrorResult<()> {
    let samples = mirror.samples_for(language).ok_or_else(|| {
        MirrorError::User(format!(
            "Invalid language '{}', available languages: {}",
            language,
            mirror.languages().join(", ")
        ))
    })?;

    if samples.iter().any(|s| s.path == path) {
        Ok(())
    } else {
        Err(MirrorError::User(format!(
            "Sample '{}' not found for '{}' (samples for other operating systems need --ignore-os)",
            path, language
        )))
    }
}
