//! Fetch command - retrieve one sample archive on demand

use crate::cli::args::FetchArgs;
use crate::config::Config;
use crate::error::MirrorResult;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, config: &Config) -> MirrorResult<()> {
    let mut options = config.mirror_options();
    options.bulk = false;
    let mirror = super::open_mirror(options, config).await?;

    super::ensure_known_sample(&mirror, &args.language, &args.path)?;
    let archive = mirror.fetcher().fetch(&args.language, &args.path).await?;

    println!("{}", archive.display());
    Ok(())
}
