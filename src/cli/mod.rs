//! Command-line interface

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};

use crate::config::Config;

/// Apply global command-line overrides on top of the loaded configuration
pub fn apply_overrides(cli: &Cli, config: &mut Config) {
    if let Some(ref url) = cli.url {
        config.remote.base_url = Some(url.clone());
    }
    if let Some(ref dir) = cli.directory {
        config.cache.dir = Some(dir.clone());
    }
    if let Some(ref languages) = cli.languages {
        config.remote.languages = languages.clone();
    }
    if cli.ignore_os {
        config.cache.ignore_os = true;
    }
    if cli.bulk {
        config.cache.bulk = true;
    }
    if cli.verbose > 0 {
        config.general.verbose = true;
    }
}
