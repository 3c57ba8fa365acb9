//! ui-core-sync binary entrypoint kept minimal. The pipeline lives in the library.

mod args;

use std::fmt;
use std::process::ExitCode;
use std::sync::OnceLock;

use clap::Parser;

struct SyncTimer;

impl tracing_subscriber::fmt::time::FormatTime for SyncTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        // "YYYY-MM-DD-T HH:MM:SS"
        let ts = chrono::Local::now().format("%Y-%m-%d-T %H:%M:%S");
        write!(w, "{ts}")
    }
}

static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// What: Install the global tracing subscriber.
///
/// Inputs:
/// - `args`: Parsed arguments (level, color, optional log file).
///
/// Details:
/// - `RUST_LOG` wins over `--log-level`/`--verbose`.
/// - With `--log-file`, logs are appended there through a non-blocking writer;
///   if the file cannot be opened, logging falls back to stderr.
fn init_logging(args: &args::Args) {
    let level = args::determine_log_level(args);
    let env_filter = || {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level))
    };
    if let Some(log_path) = &args.log_file {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
        {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .with_timer(SyncTimer)
                    .init();
                let _ = LOG_GUARD.set(guard);
                tracing::info!(path = %log_path.display(), "logging initialized");
                return;
            }
            Err(e) => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_target(false)
                    .with_ansi(!args.no_color)
                    .with_writer(std::io::stderr)
                    .with_timer(SyncTimer)
                    .init();
                tracing::warn!(error = %e, path = %log_path.display(), "failed to open log file; using stderr");
                return;
            }
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(!args.no_color)
        .with_writer(std::io::stderr)
        .with_timer(SyncTimer)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = args::Args::parse();
    init_logging(&args);
    tracing::debug!(command = ?args.command, dry_run = args.dry_run, "ui-core-sync starting");
    let code = args::process_args(&args).await;
    tracing::debug!(code, "ui-core-sync exited");
    ExitCode::from(code)
}
