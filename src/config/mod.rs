//! Runtime configuration for a sync run.
//!
//! Every pipeline stage receives a [`SyncConfig`] instead of consulting the
//! working directory or environment on its own. Values are layered: built-in
//! defaults, then the optional TOML file, then CLI overrides, then
//! `GITHUB_TOKEN`.

mod file;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use file::{ConfigFile, DEFAULT_CONFIG_FILE};

use crate::error::{Result, SyncError};

/// Manifest pinning git dependencies, relative to the project directory.
pub const DEFAULT_MANIFEST: &str = "elm-git.json";
/// Declaration file written by the git installer for the vendored library.
pub const DEFAULT_DECLARATION: &str = "elm-stuff/gitdeps/github.com/unisonweb/ui-core/elm.json";
/// Dependency-source key pinned inside the manifest.
pub const DEFAULT_SOURCE_KEY: &str = "https://github.com/unisonweb/ui-core";
/// Owner of the upstream repository queried for the latest commit.
pub const DEFAULT_OWNER: &str = "unisonweb";
/// Name of the upstream repository queried for the latest commit.
pub const DEFAULT_REPO: &str = "ui-core";
/// GitHub REST API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Cap on captured stdout/stderr per external command.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 500;

/// `owner/repo` pair on the source forge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Account or organization owning the repository.
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for RepoRef {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok(Self {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                })
            }
            _ => Err(format!("expected \"owner/repo\", got {s:?}")),
        }
    }
}

/// Explicit configuration object passed to every pipeline stage.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Directory the manifest lives in and external commands run in.
    pub project_dir: PathBuf,
    /// Manifest path, relative to `project_dir` unless absolute.
    pub manifest_path: PathBuf,
    /// Vendored declaration path, relative to `project_dir` unless absolute.
    pub declaration_path: PathBuf,
    /// Key under `git-dependencies.direct` that gets pinned.
    pub source_key: String,
    /// Repository whose newest commit is used by `update`.
    pub repository: RepoRef,
    /// Base URL of the source-forge API.
    pub api_base: String,
    /// Git-aware installer invocation (program followed by arguments).
    pub git_installer: Vec<String>,
    /// Package tool prefix; `install <name>@<major> --yes` is appended.
    pub package_tool: Vec<String>,
    /// Maximum bytes captured per output stream before a command counts as failed.
    pub max_output_bytes: usize,
    /// Optional API token sent as a bearer credential.
    pub github_token: Option<String>,
}

impl SyncConfig {
    /// What: Build the built-in defaults rooted at `project_dir`.
    ///
    /// Inputs:
    /// - `project_dir`: Directory holding `elm-git.json`.
    ///
    /// Output:
    /// - Configuration matching the stock ui-core layout.
    #[must_use]
    pub fn with_defaults(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST),
            declaration_path: PathBuf::from(DEFAULT_DECLARATION),
            source_key: DEFAULT_SOURCE_KEY.to_string(),
            repository: RepoRef {
                owner: DEFAULT_OWNER.to_string(),
                repo: DEFAULT_REPO.to_string(),
            },
            api_base: DEFAULT_API_BASE.to_string(),
            git_installer: vec!["npx".to_string(), "elm-git-install".to_string()],
            package_tool: vec!["npx".to_string(), "elm-json".to_string()],
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            github_token: None,
        }
    }

    /// What: Load configuration for `project_dir`, layering the TOML file over defaults.
    ///
    /// Inputs:
    /// - `project_dir`: Project root.
    /// - `explicit`: Config file passed on the command line, if any.
    ///
    /// Output:
    /// - Resolved configuration, or `SyncError::Config` when the file is unusable.
    ///
    /// # Errors
    /// - An explicit config file that is missing, unreadable, or malformed.
    /// - A default config file that exists but is unreadable or malformed.
    ///
    /// Details:
    /// - The default file (`ui-core-sync.toml` in `project_dir`) is optional.
    pub fn load(project_dir: impl Into<PathBuf>, explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = Self::with_defaults(project_dir);
        let (path, required) = match explicit {
            Some(p) => (cfg.project_dir.join(p), true),
            None => (cfg.project_dir.join(DEFAULT_CONFIG_FILE), false),
        };
        match ConfigFile::read(&path)? {
            Some(file) => {
                tracing::debug!(path = %path.display(), "applying config file");
                cfg.apply_file(file, &path)?;
            }
            None if required => {
                return Err(SyncError::Config {
                    path,
                    detail: "file does not exist".to_string(),
                });
            }
            None => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
            }
        }
        Ok(cfg)
    }

    /// What: Overlay values from a parsed config file.
    ///
    /// Inputs:
    /// - `file`: Parsed TOML overrides.
    /// - `path`: Where `file` came from, for error reporting.
    ///
    /// Output:
    /// - `Ok(())`, or `SyncError::Config` for values that fail validation.
    ///
    /// # Errors
    /// - `repository` not in `owner/repo` form.
    /// - Empty command vectors or a zero output cap.
    pub fn apply_file(&mut self, file: ConfigFile, path: &Path) -> Result<()> {
        let invalid = |detail: String| SyncError::Config {
            path: path.to_path_buf(),
            detail,
        };
        if let Some(p) = file.manifest {
            self.manifest_path = p;
        }
        if let Some(p) = file.declaration {
            self.declaration_path = p;
        }
        if let Some(k) = file.source_key {
            self.source_key = k;
        }
        if let Some(r) = file.repository {
            self.repository = r.parse().map_err(invalid)?;
        }
        if let Some(base) = file.api_base {
            self.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(cmd) = file.git_installer {
            if cmd.is_empty() {
                return Err(invalid("git_installer must not be empty".to_string()));
            }
            self.git_installer = cmd;
        }
        if let Some(cmd) = file.package_tool {
            if cmd.is_empty() {
                return Err(invalid("package_tool must not be empty".to_string()));
            }
            self.package_tool = cmd;
        }
        if let Some(max) = file.max_output_bytes {
            if max == 0 {
                return Err(invalid("max_output_bytes must be positive".to_string()));
            }
            self.max_output_bytes = max;
        }
        Ok(())
    }

    /// What: Pick up an API token from the environment value, ignoring blanks.
    pub fn apply_token(&mut self, token: Option<String>) {
        self.github_token = token.filter(|t| !t.trim().is_empty());
    }

    /// Absolute (or project-relative) path of the manifest.
    #[must_use]
    pub fn manifest_file(&self) -> PathBuf {
        self.project_dir.join(&self.manifest_path)
    }

    /// Absolute (or project-relative) path of the vendored declaration file.
    #[must_use]
    pub fn declaration_file(&self) -> PathBuf {
        self.project_dir.join(&self.declaration_path)
    }
}
