//! Command-line `update` and `install` handlers.

use ui_core_sync::install::{CommandRunner, DryRunRunner, InstallReport, SystemRunner};
use ui_core_sync::pipeline;
use ui_core_sync::revision::GitHubCommits;

use crate::args::{Args, utils};

/// Exit code for hard failures.
const EXIT_FAILURE: u8 = 1;
/// Exit code under `--strict` when some install command failed.
const EXIT_INSTALL_FAILURES: u8 = 2;

/// What: Choose the process runner for this invocation.
fn runner_for(args: &Args, cfg: &ui_core_sync::config::SyncConfig) -> Box<dyn CommandRunner> {
    if args.dry_run {
        tracing::info!("dry run: commands will be logged, not executed");
        Box::new(DryRunRunner)
    } else {
        Box::new(SystemRunner::new(&cfg.project_dir, cfg.max_output_bytes))
    }
}

/// What: Map a pipeline result to an exit code.
///
/// Inputs:
/// - `result`: Pipeline outcome.
/// - `strict`: Whether failed install commands should fail the process.
///
/// Output:
/// - `0`, `1` for hard failures, `2` for install failures under `--strict`.
pub fn exit_code_for(result: ui_core_sync::Result<InstallReport>, strict: bool) -> u8 {
    match result {
        Ok(report) if strict && !report.all_succeeded() => {
            for failure in report.failures() {
                tracing::error!(command = %failure.command, status = ?failure.status, "install step failed");
            }
            EXIT_INSTALL_FAILURES
        }
        Ok(_) => 0,
        Err(err) => {
            tracing::error!(error = %err, "sync failed");
            eprintln!("ui-core-sync: {err}");
            EXIT_FAILURE
        }
    }
}

/// What: Handle `update`: pin the newest upstream commit and install.
pub async fn handle_update(args: &Args) -> u8 {
    let cfg = match utils::build_config(args) {
        Ok(cfg) => cfg,
        Err(err) => return exit_code_for(Err(err), args.strict),
    };
    let source = match GitHubCommits::new(&cfg) {
        Ok(s) => s,
        Err(err) => return exit_code_for(Err(err), args.strict),
    };
    let runner = runner_for(args, &cfg);
    tracing::info!(repository = %cfg.repository, "updating to latest revision");
    let result = pipeline::update_to_latest(&cfg, &source, runner.as_ref()).await;
    exit_code_for(result, args.strict)
}

/// What: Handle `install [REVISION]`: pin when a revision is given, then install.
pub async fn handle_install(args: &Args, revision: Option<&str>) -> u8 {
    let cfg = match utils::build_config(args) {
        Ok(cfg) => cfg,
        Err(err) => return exit_code_for(Err(err), args.strict),
    };
    let runner = runner_for(args, &cfg);
    tracing::info!(revision = revision.unwrap_or("<pinned>"), "installing");
    let result = pipeline::install_revision(&cfg, revision, runner.as_ref()).await;
    exit_code_for(result, args.strict)
}
