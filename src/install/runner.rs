//! Process-spawning capability used by the install orchestrator.

use std::path::PathBuf;
use std::process::Stdio;

use futures::future::BoxFuture;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::command::ShellCommand;

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal.
    pub exit_code: Option<i32>,
    /// Captured stdout (lossy UTF-8).
    pub stdout: String,
    /// Captured stderr (lossy UTF-8).
    pub stderr: String,
}

impl CommandOutput {
    /// `true` when the command exited with status 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Runs external commands. Swapped for a fake in tests and for [`DryRunRunner`] with `--dry-run`.
pub trait CommandRunner: Send + Sync {
    /// What: Run `cmd` to completion and capture its output.
    ///
    /// # Errors
    /// - The command could not be spawned or its output could not be collected.
    fn run<'a>(&'a self, cmd: &'a ShellCommand) -> BoxFuture<'a, std::io::Result<CommandOutput>>;
}

/// Spawns real processes in the project directory.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    /// Working directory for spawned commands.
    cwd: PathBuf,
    /// Per-stream output cap.
    max_output_bytes: usize,
}

impl SystemRunner {
    /// What: Create a runner rooted at `cwd`.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>, max_output_bytes: usize) -> Self {
        Self {
            cwd: cwd.into(),
            max_output_bytes,
        }
    }

    /// What: Spawn `cmd`, wait for it, and enforce the output cap.
    ///
    /// # Errors
    /// - Program not found on `PATH`, spawn failure, or output over the cap.
    ///
    /// Details:
    /// - Both streams are read concurrently, each through a `take(cap + 1)` limit.
    /// - As soon as either stream goes over the cap the child is killed.
    async fn spawn(&self, cmd: &ShellCommand) -> std::io::Result<CommandOutput> {
        let program = which::which_in(&cmd.program, std::env::var_os("PATH"), &self.cwd)
            .map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{}: {e}", cmd.program),
                )
            })?;
        tracing::debug!(command = %cmd, resolved = %program.display(), "spawning");
        let mut child = tokio::process::Command::new(program)
            .args(&cmd.args)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let captured = tokio::try_join!(
            read_capped(stdout, "stdout", self.max_output_bytes),
            read_capped(stderr, "stderr", self.max_output_bytes),
        );
        let (out, err) = match captured {
            Ok(streams) => streams,
            Err(e) => {
                tracing::warn!(command = %cmd, error = %e, "killing command");
                if let Err(kill_err) = child.kill().await {
                    tracing::debug!(error = %kill_err, "kill after overflow failed");
                }
                return Err(e);
            }
        };
        let status = child.wait().await?;
        Ok(CommandOutput {
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
        })
    }
}

/// What: Read a child stream to EOF, failing once it exceeds `cap` bytes.
///
/// Inputs:
/// - `stream`: Piped stdout or stderr (absent streams read as empty).
/// - `name`: Stream name for the error message.
/// - `cap`: Maximum accepted bytes.
///
/// Output:
/// - Captured bytes, or an error as soon as `cap + 1` bytes have arrived.
async fn read_capped<R>(stream: Option<R>, name: &str, cap: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(stream) = stream {
        let limit = u64::try_from(cap).unwrap_or(u64::MAX).saturating_add(1);
        stream.take(limit).read_to_end(&mut buf).await?;
    }
    if buf.len() > cap {
        return Err(std::io::Error::other(format!("{name} exceeded {cap} bytes")));
    }
    Ok(buf)
}

impl CommandRunner for SystemRunner {
    fn run<'a>(&'a self, cmd: &'a ShellCommand) -> BoxFuture<'a, std::io::Result<CommandOutput>> {
        Box::pin(self.spawn(cmd))
    }
}

/// Logs commands instead of running them; every command "succeeds".
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run<'a>(&'a self, cmd: &'a ShellCommand) -> BoxFuture<'a, std::io::Result<CommandOutput>> {
        Box::pin(async move {
            tracing::info!(command = %cmd, "dry run: not executing");
            Ok(CommandOutput {
                exit_code: Some(0),
                stdout: format!("DRY RUN: {cmd}\n"),
                stderr: String::new(),
            })
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> ShellCommand {
        ShellCommand {
            program: "sh".into(),
            args: vec!["-c".into(), script.into()],
        }
    }

    #[tokio::test]
    /// What: Exit codes and both output streams are captured.
    ///
    /// Inputs:
    /// - `sh -c` scripts exiting 0 and 3.
    ///
    /// Output:
    /// - Matching `CommandOutput` values.
    async fn system_runner_captures_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = SystemRunner::new(dir.path(), 1024);

        let ok = runner.run(&sh("echo hello")).await.expect("spawn sh");
        assert!(ok.success());
        assert_eq!(ok.stdout.trim(), "hello");

        let failed = runner
            .run(&sh("echo oops >&2; exit 3"))
            .await
            .expect("spawn sh");
        assert_eq!(failed.exit_code, Some(3));
        assert_eq!(failed.stderr.trim(), "oops");
    }

    #[tokio::test]
    /// What: Commands run inside the configured directory.
    async fn system_runner_uses_cwd() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("marker.txt"), "here").expect("write marker");
        let runner = SystemRunner::new(dir.path(), 1024);
        let out = runner.run(&sh("cat marker.txt")).await.expect("spawn sh");
        assert_eq!(out.stdout, "here");
    }

    #[tokio::test]
    /// What: Output over the cap and unknown programs are errors.
    async fn system_runner_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = SystemRunner::new(dir.path(), 4);
        assert!(runner.run(&sh("echo 0123456789")).await.is_err());

        let missing = ShellCommand {
            program: "definitely-not-a-real-binary-ui-core-sync".into(),
            args: Vec::new(),
        };
        let err = runner.run(&missing).await.expect_err("missing binary");
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[tokio::test]
    /// What: A command that floods its output is killed as soon as it passes the cap.
    ///
    /// Inputs:
    /// - Script writing 100000 bytes, then sleeping, then creating a marker file.
    /// - Runner capped at 16 bytes.
    ///
    /// Output:
    /// - Error naming stdout; the marker is never created because the child was killed.
    async fn system_runner_kills_on_overflow() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = SystemRunner::new(dir.path(), 16);
        let started = std::time::Instant::now();
        let err = runner
            .run(&sh("head -c 100000 /dev/zero; sleep 1; touch after"))
            .await
            .expect_err("overflow must fail");
        assert!(err.to_string().contains("stdout exceeded 16 bytes"));
        assert!(started.elapsed() < std::time::Duration::from_secs(1));

        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert!(!dir.path().join("after").exists());
    }

    #[tokio::test]
    /// What: Output exactly at the cap is accepted.
    async fn system_runner_accepts_output_at_cap() {
        let dir = tempfile::tempdir().expect("tempdir");
        let runner = SystemRunner::new(dir.path(), 4);
        let out = runner.run(&sh("printf abcd")).await.expect("within cap");
        assert_eq!(out.stdout, "abcd");
    }

    #[tokio::test]
    /// What: Dry runs succeed without spawning.
    async fn dry_run_reports_success() {
        let out = DryRunRunner
            .run(&sh("exit 1"))
            .await
            .expect("dry run never fails");
        assert!(out.success());
        assert!(out.stdout.contains("DRY RUN: sh -c exit 1"));
    }
}
