//! Dependency manifest (`elm-git.json`) handling.
//!
//! The manifest maps repository URLs to pinned revisions under
//! `git-dependencies.direct`. Updates are a whole-document read-modify-write;
//! key order is kept because `serde_json` is built with `preserve_order`.

pub mod declaration;

use std::path::Path;

use serde_json::{Map, Value};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};

/// Top-level key holding git dependencies.
pub const GIT_DEPENDENCIES: &str = "git-dependencies";
/// Nested key holding direct git dependencies.
pub const DIRECT: &str = "direct";

/// What: Read and parse a JSON document from disk.
///
/// Inputs:
/// - `path`: File to read.
///
/// Output:
/// - Parsed `serde_json::Value`.
///
/// # Errors
/// - `NotFound` when the file is missing, `Io` for other read failures.
/// - `Parse` when the contents are not valid JSON.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| SyncError::from_read(path, e))?;
    serde_json::from_str(&text).map_err(|source| SyncError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// What: Set `git-dependencies.direct[source_key]` to `revision` inside `doc`.
///
/// Inputs:
/// - `doc`: Parsed manifest, modified in place.
/// - `source_key`: Repository URL to pin.
/// - `revision`: Commit hash or tag.
///
/// Output:
/// - Previous revision for `source_key`, if one was a string.
///
/// # Errors
/// - `Err(detail)` when the document or one of the nested values is not an object.
///
/// Details:
/// - Missing `git-dependencies` or `direct` objects are created.
/// - All other keys keep their value and position.
pub fn set_pinned_revision(
    doc: &mut Value,
    source_key: &str,
    revision: &str,
) -> std::result::Result<Option<String>, String> {
    let root = doc
        .as_object_mut()
        .ok_or_else(|| "manifest root is not an object".to_string())?;
    let git_deps = root
        .entry(GIT_DEPENDENCIES)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| format!("\"{GIT_DEPENDENCIES}\" is not an object"))?;
    let direct = git_deps
        .entry(DIRECT)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| format!("\"{GIT_DEPENDENCIES}.{DIRECT}\" is not an object"))?;
    let previous = direct.insert(source_key.to_string(), Value::String(revision.to_string()));
    Ok(previous.and_then(|v| v.as_str().map(str::to_string)))
}

/// What: Pin the configured dependency source to `revision` in the manifest file.
///
/// Inputs:
/// - `cfg`: Sync configuration (manifest path and source key).
/// - `revision`: Revision identifier; accepted as-is.
///
/// Output:
/// - `Ok(())` once the rewritten manifest has been written.
///
/// # Errors
/// - Manifest missing, unreadable, not JSON, or not shaped like a manifest.
/// - Writing the new contents fails.
///
/// Details:
/// - Nothing is written unless the new document was built and serialized.
/// - The write is in place; there is no backup or atomic rename.
pub fn pin_revision(cfg: &SyncConfig, revision: &str) -> Result<()> {
    let path = cfg.manifest_file();
    let mut doc = read_json(&path)?;
    let previous = set_pinned_revision(&mut doc, &cfg.source_key, revision).map_err(|detail| {
        SyncError::Shape {
            path: path.clone(),
            detail,
        }
    })?;
    let mut data = serde_json::to_string_pretty(&doc).map_err(|source| SyncError::Parse {
        path: path.clone(),
        source,
    })?;
    data.push('\n');
    std::fs::write(&path, data).map_err(|source| SyncError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(
        manifest = %path.display(),
        source = %cfg.source_key,
        previous = previous.as_deref().unwrap_or("<none>"),
        revision = %revision,
        "pinned revision"
    );
    Ok(())
}
