//! Create command - expand a sample into a new project directory

use crate::cli::args::CreateArgs;
use crate::config::Config;
use crate::error::{MirrorError, MirrorResult};
use crate::extract::extract_tar_gz;
use console::style;
use tracing::info;

/// Execute the create command
pub async fn execute(args: CreateArgs, config: &Config) -> MirrorResult<()> {
    if dir_has_entries(&args.dest)? {
        return Err(MirrorError::User(format!(
            "Destination {} already exists and is not empty",
            args.dest.display()
        )));
    }

    let mut options = config.mirror_options();
    options.bulk = false;
    let mirror = super::open_mirror(options, config).await?;

    super::ensure_known_sample(&mirror, &args.language, &args.path)?;
    let archive = mirror.fetcher().fetch(&args.language, &args.path).await?;

    let dest = args.dest.clone();
    tokio::task::spawn_blocking(move || extract_tar_gz(&archive, &dest))
        .await
        .map_err(|e| MirrorError::Internal(format!("extraction task panicked: {}", e)))??;

    info!("Created {} from {}", args.dest.display(), args.path);
    println!("{} Created {}", style("✓").green(), args.dest.display());
    Ok(())
}

fn dir_has_entries(path: &std::path::Path) -> MirrorResult<bool> {
    match std::fs::read_dir(path) {
        Ok(mut entries) => Ok(entries.next().is_some()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(MirrorError::io(format!("reading {}", path.display()), e)),
    }
}
