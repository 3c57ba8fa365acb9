//! Install orchestration for the vendored ui-core tree.
//!
//! Runs the git installer, reads the declaration file it produces, and
//! installs each declared dependency at its major version, one at a time.
//! Command failures are logged and recorded, never raised.

pub mod command;
pub mod executor;
pub mod runner;

pub use command::{ShellCommand, git_install_command, package_install_command};
pub use executor::{InstallReport, TaskList, TaskOutcome, TaskStatus, run_logged};
pub use runner::{CommandOutput, CommandRunner, DryRunRunner, SystemRunner};

use crate::config::SyncConfig;
use crate::error::{Result, off_runtime};
use crate::manifest::declaration::read_directives;

/// What: Install the vendored library and every dependency it declares.
///
/// Inputs:
/// - `cfg`: Paths and command templates.
/// - `runner`: Process capability.
///
/// Output:
/// - Report with the git installer's outcome first, then each package install.
///
/// # Errors
/// - Declaration file missing, unreadable, not JSON, or malformed.
///
/// Details:
/// - A failing git installer does not stop the run; the declaration file is read regardless.
/// - Package installs follow declaration order and never overlap.
pub async fn install_all(cfg: &SyncConfig, runner: &dyn CommandRunner) -> Result<InstallReport> {
    let mut report = InstallReport::default();
    report
        .outcomes
        .push(run_logged(runner, &git_install_command(cfg)).await);

    let declaration = cfg.declaration_file();
    let directives = off_runtime(move || read_directives(&declaration)).await?;
    tracing::info!(count = directives.len(), "installing declared dependencies");
    let tasks = TaskList::new(
        directives
            .iter()
            .map(|d| package_install_command(cfg, d))
            .collect(),
    );
    report.outcomes.extend(tasks.run_all(runner).await);

    let failed = report.failures().count();
    if failed > 0 {
        tracing::warn!(
            failed,
            total = report.outcomes.len(),
            "install finished with failures"
        );
    } else {
        tracing::info!(total = report.outcomes.len(), "install finished");
    }
    Ok(report)
}
