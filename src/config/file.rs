//! Optional TOML overrides (`ui-core-sync.toml`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SyncError};

/// File name looked up in the project directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ui-core-sync.toml";

/// Every key is optional; absent keys keep the built-in default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Manifest path override.
    pub manifest: Option<PathBuf>,
    /// Vendored declaration path override.
    pub declaration: Option<PathBuf>,
    /// Dependency-source key override.
    pub source_key: Option<String>,
    /// `owner/repo` override.
    pub repository: Option<String>,
    /// API base URL override.
    pub api_base: Option<String>,
    /// Git installer command override.
    pub git_installer: Option<Vec<String>>,
    /// Package tool prefix override.
    pub package_tool: Option<Vec<String>>,
    /// Output cap override.
    pub max_output_bytes: Option<usize>,
}

impl ConfigFile {
    /// What: Read and parse a config file if it exists.
    ///
    /// Inputs:
    /// - `path`: Candidate config file.
    ///
    /// Output:
    /// - `Ok(None)` when the file is absent, `Ok(Some(_))` when it parses.
    ///
    /// # Errors
    /// - Unreadable file or invalid TOML, reported as `SyncError::Config`.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SyncError::Config {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                });
            }
        };
        toml::from_str(&text)
            .map(Some)
            .map_err(|e| SyncError::Config {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })
    }
}
