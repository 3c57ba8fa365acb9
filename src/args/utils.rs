//! Shared utilities for argument processing.

use ui_core_sync::config::SyncConfig;

/// What: Determine the log level based on command-line arguments.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Log level string (trace, debug, info, warn, error).
///
/// Details:
/// - Verbose flag overrides `log_level` argument.
/// - `RUST_LOG`, when set, is applied by the subscriber and wins over both.
pub fn determine_log_level(args: &crate::args::Args) -> String {
    if args.verbose {
        "debug".to_string()
    } else {
        args.log_level.clone()
    }
}

/// What: Resolve the sync configuration for this invocation.
///
/// Inputs:
/// - `args`: Parsed command-line arguments.
///
/// Output:
/// - Configuration with file, CLI, and `GITHUB_TOKEN` layers applied.
///
/// # Errors
/// - Config file problems from [`SyncConfig::load`].
pub fn build_config(args: &crate::args::Args) -> ui_core_sync::Result<SyncConfig> {
    let mut cfg = SyncConfig::load(&args.project_dir, args.config.as_deref())?;
    if let Some(manifest) = &args.manifest {
        cfg.manifest_path.clone_from(manifest);
    }
    cfg.apply_token(std::env::var("GITHUB_TOKEN").ok());
    Ok(cfg)
}
