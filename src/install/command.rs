use std::fmt;

use crate::config::SyncConfig;
use crate::manifest::declaration::InstallDirective;

/// External command: a program plus its arguments, spawned without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// Executable name or path.
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
}

impl ShellCommand {
    /// What: Build a command from a `[program, args...]` vector.
    ///
    /// Output:
    /// - `None` when `parts` is empty.
    #[must_use]
    pub fn from_parts(parts: &[String]) -> Option<Self> {
        let (program, args) = parts.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// What: Command that installs the git dependencies listed in the manifest.
///
/// Details:
/// - Falls back to `npx elm-git-install` if the configured vector is empty.
#[must_use]
pub fn git_install_command(cfg: &SyncConfig) -> ShellCommand {
    ShellCommand::from_parts(&cfg.git_installer).unwrap_or_else(|| ShellCommand {
        program: "npx".to_string(),
        args: vec!["elm-git-install".to_string()],
    })
}

/// What: Command that installs one directive via the package tool.
///
/// Inputs:
/// - `cfg`: Supplies the package tool prefix.
/// - `directive`: Name and major version.
///
/// Output:
/// - `<tool> install <name>@<major> --yes`.
#[must_use]
pub fn package_install_command(cfg: &SyncConfig, directive: &InstallDirective) -> ShellCommand {
    let mut cmd = ShellCommand::from_parts(&cfg.package_tool).unwrap_or_else(|| ShellCommand {
        program: "npx".to_string(),
        args: vec!["elm-json".to_string()],
    });
    cmd.args.push("install".to_string());
    cmd.args.push(directive.to_string());
    cmd.args.push("--yes".to_string());
    cmd
}
