//! Strictly sequential task execution with per-task outcomes.

use super::command::ShellCommand;
use super::runner::CommandRunner;

/// How a single command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Exit status 0.
    Succeeded {
        /// Whether the command wrote anything to stdout.
        produced_output: bool,
    },
    /// Ran but exited non-zero (or was killed by a signal).
    Failed {
        /// Exit code if any.
        exit_code: Option<i32>,
    },
    /// Could not be spawned or its output could not be collected.
    Errored(String),
}

/// Outcome of one task in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    /// Rendered command line.
    pub command: String,
    /// How it ended.
    pub status: TaskStatus,
}

impl TaskOutcome {
    /// `true` for [`TaskStatus::Succeeded`].
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.status, TaskStatus::Succeeded { .. })
    }
}

/// Ordered outcomes of an install run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// One entry per task, in execution order.
    pub outcomes: Vec<TaskOutcome>,
}

impl InstallReport {
    /// `true` when every task succeeded (vacuously true when empty).
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(TaskOutcome::succeeded)
    }

    /// Tasks that did not succeed.
    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }
}

/// What: Run one command and log the result.
///
/// Inputs:
/// - `runner`: Process capability.
/// - `cmd`: Command to run.
///
/// Output:
/// - The task outcome. Never an error: failures are logged and recorded.
///
/// Details:
/// - Failure is logged at `warn`; otherwise stdout is logged if non-empty, else stderr.
pub async fn run_logged(runner: &dyn CommandRunner, cmd: &ShellCommand) -> TaskOutcome {
    let command = cmd.to_string();
    tracing::info!(command = %command, "running");
    let status = match runner.run(cmd).await {
        Err(e) => {
            tracing::warn!(command = %command, error = %e, "command could not be run");
            TaskStatus::Errored(e.to_string())
        }
        Ok(out) if !out.success() => {
            tracing::warn!(
                command = %command,
                exit_code = ?out.exit_code,
                stderr = %out.stderr.trim_end(),
                stdout = %out.stdout.trim_end(),
                "command failed"
            );
            TaskStatus::Failed {
                exit_code: out.exit_code,
            }
        }
        Ok(out) => {
            if out.stdout.is_empty() {
                tracing::info!(command = %command, "{}", out.stderr.trim_end());
            } else {
                tracing::info!(command = %command, "{}", out.stdout.trim_end());
            }
            TaskStatus::Succeeded {
                produced_output: !out.stdout.is_empty(),
            }
        }
    };
    TaskOutcome { command, status }
}

/// Commands executed one at a time, in order.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    /// Pending commands.
    tasks: Vec<ShellCommand>,
}

impl TaskList {
    /// Create a task list from commands in execution order.
    #[must_use]
    pub const fn new(tasks: Vec<ShellCommand>) -> Self {
        Self { tasks }
    }

    /// Number of queued tasks.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.tasks.len()
    }

    /// `true` when nothing is queued.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// What: Run every task, awaiting each before starting the next.
    ///
    /// Output:
    /// - One outcome per task. Failed tasks do not stop the list.
    pub async fn run_all(&self, runner: &dyn CommandRunner) -> Vec<TaskOutcome> {
        let mut outcomes = Vec::with_capacity(self.tasks.len());
        for cmd in &self.tasks {
            outcomes.push(run_logged(runner, cmd).await);
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::runner::CommandOutput;
    use futures::future::BoxFuture;

    /// Fails any command whose program is `fail`, errors on `boom`.
    struct ScriptedRunner;

    impl CommandRunner for ScriptedRunner {
        fn run<'a>(
            &'a self,
            cmd: &'a ShellCommand,
        ) -> BoxFuture<'a, std::io::Result<CommandOutput>> {
            Box::pin(async move {
                match cmd.program.as_str() {
                    "boom" => Err(std::io::Error::other("spawn failed")),
                    "fail" => Ok(CommandOutput {
                        exit_code: Some(1),
                        stdout: String::new(),
                        stderr: "nope".into(),
                    }),
                    "quiet" => Ok(CommandOutput {
                        exit_code: Some(0),
                        stdout: String::new(),
                        stderr: "progress".into(),
                    }),
                    _ => Ok(CommandOutput {
                        exit_code: Some(0),
                        stdout: "ok".into(),
                        stderr: String::new(),
                    }),
                }
            })
        }
    }

    fn cmd(program: &str) -> ShellCommand {
        ShellCommand {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[tokio::test]
    /// What: Failures are recorded and later tasks still run.
    ///
    /// Inputs:
    /// - Tasks `fail`, `boom`, `quiet`, `ok`.
    ///
    /// Output:
    /// - Four outcomes with matching statuses, report not all-succeeded.
    async fn failures_do_not_stop_the_list() {
        let list = TaskList::new(vec![cmd("fail"), cmd("boom"), cmd("quiet"), cmd("ok")]);
        assert_eq!(list.len(), 4);
        let outcomes = list.run_all(&ScriptedRunner).await;
        let statuses: Vec<&TaskStatus> = outcomes.iter().map(|o| &o.status).collect();
        assert_eq!(
            statuses,
            vec![
                &TaskStatus::Failed { exit_code: Some(1) },
                &TaskStatus::Errored("spawn failed".into()),
                &TaskStatus::Succeeded {
                    produced_output: false
                },
                &TaskStatus::Succeeded {
                    produced_output: true
                },
            ]
        );
        let report = InstallReport { outcomes };
        assert!(!report.all_succeeded());
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    /// What: An empty report counts as success.
    fn empty_report_succeeds() {
        assert!(InstallReport::default().all_succeeded());
        assert!(TaskList::default().is_empty());
    }
}
