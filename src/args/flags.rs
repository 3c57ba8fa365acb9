//! Command-line `flags` and `dev-config` handlers.

use ui_core_sync::bootstrap::{self, Flags, Host};
use ui_core_sync::devserver::DevServerConfig;

/// Host whose browser values come from the command line.
struct CliHost<'a> {
    /// `--base-uri`.
    base_uri: &'a str,
    /// `--user-agent`.
    user_agent: &'a str,
    /// `--platform`.
    platform: Option<&'a str>,
}

impl Host for CliHost<'_> {
    fn base_uri(&self) -> String {
        self.base_uri.to_string()
    }

    fn user_agent(&self) -> String {
        self.user_agent.to_string()
    }

    fn platform(&self) -> Option<String> {
        self.platform.map(str::to_string)
    }

    fn prevent_default_keyboard_events(&mut self) {
        tracing::debug!("keyboard suppression is a no-op outside the browser");
    }

    fn console_log(&mut self, message: &str) {
        tracing::debug!("{message}");
    }
}

/// What: Print a JSON value on stdout, returning the exit code.
fn print_json<T: serde::Serialize>(value: &T) -> u8 {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{s}");
            0
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize output");
            1
        }
    }
}

/// What: Handle `flags`: run the bootstrap against CLI-provided values and print the flags.
///
/// Inputs:
/// - `base_uri`, `user_agent`, `platform`: Browser values.
///
/// Output:
/// - Exit code; 1 when the base URI is invalid.
pub fn handle_flags(base_uri: &str, user_agent: &str, platform: Option<&str>) -> u8 {
    let mut host = CliHost {
        base_uri,
        user_agent,
        platform,
    };
    let mut captured: Option<Flags> = None;
    if let Err(e) = bootstrap::bootstrap(&mut host, |flags| captured = Some(flags)) {
        tracing::error!(error = %e, "bootstrap failed");
        eprintln!("ui-core-sync: {e}");
        return 1;
    }
    captured.map_or(1, |flags| print_json(&flags))
}

/// What: Handle `dev-config`: print the dev-server configuration from the environment.
pub fn handle_dev_config() -> u8 {
    let cfg = DevServerConfig::from_env();
    tracing::debug!(api_url = %cfg.api_url, elm_debug = cfg.elm_debug, "dev server config");
    print_json(&cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Valid URIs succeed; invalid ones fail.
    fn handle_flags_exit_codes() {
        assert_eq!(
            handle_flags("http://localhost:5858/ui/", "", Some("MacIntel")),
            0
        );
        assert_eq!(handle_flags("nope", "", None), 1);
    }
}
