//! sample-mirror - local mirror of a remote sample catalog
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use sample_mirror::cli::{apply_overrides, Cli, Commands};
use sample_mirror::config::ConfigManager;
use sample_mirror::error::MirrorResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> MirrorResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_manager = if let Some(ref path) = cli.config {
        ConfigManager::with_path(path.clone())
    } else {
        ConfigManager::new()
    };
    let mut config = config_manager.load().await?;
    apply_overrides(&cli, &mut config);

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 if config.general.verbose => EnvFilter::new("sample_mirror=info"),
        0 => EnvFilter::new("sample_mirror=warn"),
        1 => EnvFilter::new("sample_mirror=info"),
        _ => EnvFilter::new("sample_mirror=debug"),
    };

    if config.general.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }

    debug!("Using config: {}", config_manager.path().display());

    // Dispatch to command
    match cli.command {
        Commands::List(args) => sample_mirror::cli::commands::list(args, &config).await,
        Commands::Fetch(args) => sample_mirror::cli::commands::fetch(args, &config).await,
        Commands::Create(args) => sample_mirror::cli::commands::create(args, &config).await,
        Commands::Sync => sample_mirror::cli::commands::sync(&config).await,
        Commands::Clean(args) => sample_mirror::cli::commands::clean(args, &config).await,
        Commands::Config(args) => {
            sample_mirror::cli::commands::config(args, &config, &config_manager).await
        }
    }
}
