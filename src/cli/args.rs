//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sample-mirror - local mirror of a remote sample catalog
///
/// Keeps per-language sample indexes in sync with the remote catalog and
/// fetches sample archives in bulk or on demand.
#[derive(Parser, Debug)]
#[command(name = "sample-mirror")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SAMPLE_MIRROR_CONFIG")]
    pub config: Option<PathBuf>,

    /// URL of the remote sample catalog
    #[arg(short, long, global = true)]
    pub url: Option<String>,

    /// Location of the local sample cache
    #[arg(short, long, global = true)]
    pub directory: Option<PathBuf>,

    /// Enabled languages (comma separated)
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub languages: Option<Vec<String>>,

    /// Ignore host OS filtering when listing samples
    #[arg(long, global = true)]
    pub ignore_os: bool,

    /// Pre-fetch every sample archive while syncing
    #[arg(long, global = true)]
    pub bulk: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List languages, or the samples of one language
    List(ListArgs),

    /// Fetch a single sample archive into the cache
    Fetch(FetchArgs),

    /// Create a project from a sample
    Create(CreateArgs),

    /// Sync indexes and retrieve every sample archive
    Sync,

    /// Remove the local sample cache
    Clean(CleanArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Language whose samples to list
    pub language: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Sample language
    pub language: String,

    /// Sample path as listed in the index
    pub path: String,
}

/// Arguments for the create command
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Sample language
    pub language: String,

    /// Sample path as listed in the index
    pub path: String,

    /// Directory to create the project in
    pub dest: PathBuf,
}

/// Arguments for the clean command
#[derive(Parser, Debug)]
pub struct CleanArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for list commands
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
