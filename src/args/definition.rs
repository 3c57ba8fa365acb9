//! Command-line argument definition and processing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ui-core-sync - keep the vendored ui-core library pinned and installed
#[derive(Parser, Debug)]
#[command(name = "ui-core-sync")]
#[command(version)]
#[command(about = "Keep the vendored ui-core library pinned and installed", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Args {
    /// Log commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Exit with status 2 when any install command failed
    #[arg(long, global = true)]
    pub strict: bool,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Project directory containing elm-git.json (default: current directory)
    #[arg(long, default_value = ".", global = true)]
    pub project_dir: PathBuf,

    /// Configuration file (default: <project-dir>/ui-core-sync.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Manifest path override, relative to the project directory
    #[arg(long, global = true)]
    pub manifest: Option<PathBuf>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Pin ui-core to the latest upstream commit and install it
    Update,
    /// Install ui-core, pinning it to REVISION first when given
    Install {
        /// Commit hash or tag to pin
        revision: Option<String>,
    },
    /// Print the bootstrap flags derived for a page as JSON
    Flags {
        /// Document base URI, e.g. http://127.0.0.1:5858/ui/
        #[arg(long)]
        base_uri: String,
        /// Browser user agent
        #[arg(long, default_value = "")]
        user_agent: String,
        /// Browser platform string
        #[arg(long)]
        platform: Option<String>,
    },
    /// Print the dev-server configuration resolved from API_URL and ELM_DEBUG as JSON
    DevConfig,
}

/// What: Dispatch the parsed command.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Process exit code.
///
/// Details:
/// - Hard failures are logged and yield exit code 1.
/// - Install command failures only change the exit code under `--strict`.
pub async fn process_args(args: &Args) -> u8 {
    use crate::args::{flags, sync};

    match &args.command {
        Command::Update => sync::handle_update(args).await,
        Command::Install { revision } => sync::handle_install(args, revision.as_deref()).await,
        Command::Flags {
            base_uri,
            user_agent,
            platform,
        } => flags::handle_flags(base_uri, user_agent, platform.as_deref()),
        Command::DevConfig => flags::handle_dev_config(),
    }
}
