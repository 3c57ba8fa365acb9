//! The two sync entry points: "update to latest" and "install/pin to a revision".

use crate::config::SyncConfig;
use crate::error::{Result, off_runtime};
use crate::install::{CommandRunner, InstallReport, install_all};
use crate::manifest::pin_revision;
use crate::revision::{CommitSource, resolve_revision};

/// What: Pin ui-core to the newest upstream commit, then install.
///
/// Inputs:
/// - `cfg`: Sync configuration.
/// - `source`: Commit lookup.
/// - `runner`: Process capability.
///
/// Output:
/// - Install report; command failures are inside it, not raised.
///
/// # Errors
/// - Revision lookup, manifest, or declaration failures.
pub async fn update_to_latest(
    cfg: &SyncConfig,
    source: &dyn CommitSource,
    runner: &dyn CommandRunner,
) -> Result<InstallReport> {
    let revision = resolve_revision(None, source, &cfg.repository).await?;
    pin_off_runtime(cfg, revision).await?;
    install_all(cfg, runner).await
}

/// What: Optionally pin ui-core to `revision`, then install.
///
/// Inputs:
/// - `cfg`: Sync configuration.
/// - `revision`: Revision to pin; `None` or empty installs whatever the manifest already pins.
/// - `runner`: Process capability.
///
/// Output:
/// - Install report.
///
/// # Errors
/// - Manifest or declaration failures.
pub async fn install_revision(
    cfg: &SyncConfig,
    revision: Option<&str>,
    runner: &dyn CommandRunner,
) -> Result<InstallReport> {
    match revision.filter(|r| !r.is_empty()) {
        Some(rev) => pin_off_runtime(cfg, rev.to_string()).await?,
        None => tracing::info!("no revision given; keeping pinned revision"),
    }
    install_all(cfg, runner).await
}

/// Manifest read-modify-write on the blocking pool.
async fn pin_off_runtime(cfg: &SyncConfig, revision: String) -> Result<()> {
    let cfg = cfg.clone();
    off_runtime(move || pin_revision(&cfg, &revision)).await
}
