//! Sync command - refresh indexes and pre-fetch every archive

use crate::config::Config;
use crate::error::MirrorResult;
use console::style;

/// Execute the sync command
pub async fn execute(config: &Config) -> MirrorResult<()> {
    let mut options = config.mirror_options();
    options.bulk = true;
    let mirror = super::open_mirror(options, config).await?;

    for (language, samples) in mirror.samples() {
        println!(
            "  {} {:<12} {} sample(s)",
            style("•").cyan(),
            language,
            samples.len()
        );
    }

    if mirror.is_online() {
        println!("{} Sample cache is up to date", style("✓").green());
    } else {
        println!(
            "{} Catalog unreachable for some languages, cached indexes were used",
            style("!").yellow()
        );
    }
    Ok(())
}
