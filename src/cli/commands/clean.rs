//! Clean command - remove the local sample cache
//!
//! This is the only way a poisoned cache is cleared.

use crate::cache::CacheStore;
use crate::cli::args::CleanArgs;
use crate::config::schema::default_cache_dir;
use crate::config::Config;
use crate::error::MirrorResult;
use console::style;
use std::io::{self, Write};

/// Execute the clean command
pub async fn execute(args: CleanArgs, config: &Config) -> MirrorResult<()> {
    let dir = config.cache.dir.clone().unwrap_or_else(default_cache_dir);
    let store = CacheStore::new(&dir);

    if !store.root().exists() {
        println!("No sample cache at {}", store.root().display());
        return Ok(());
    }

    println!(
        "This will remove the sample cache at {} ({})",
        store.root().display(),
        store.state()
    );

    if !args.yes {
        print!("Are you sure? [y/N] ");
        let _ = io::stdout().flush();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Failed to read input, aborting.");
            return Ok(());
        }

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.clear().await?;
    println!("{} Sample cache removed", style("✓").green());
    Ok(())
}
