//! Frontend bootstrap: derive the flags record handed to the UI entry point.
//!
//! The browser side is abstracted behind [`Host`] so the derivation and the
//! one-shot hand-off can run (and be tested) outside a browser.

mod os;

pub use os::{OperatingSystem, detect_os};

use serde::Serialize;

/// Banner printed to the console before the UI starts.
pub const BANNER: &str = r"
 _____     _
|  |  |___|_|___ ___ ___
|  |  |   | |_ -| . |   |
|_____|_|_|_|___|___|_|_|

";

/// API path used when the UI is served from the site root.
pub const ROOT_API_URL: &str = "api";

/// Immutable flags passed to the UI entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    /// Host operating system.
    pub operating_system: OperatingSystem,
    /// Path component of the document base URI.
    pub base_path: String,
    /// API base path derived from `base_path`.
    pub api_url: String,
}

/// Browser capabilities the bootstrap needs.
pub trait Host {
    /// Document base URI (`document.baseURI`).
    fn base_uri(&self) -> String;
    /// `navigator.userAgent`.
    fn user_agent(&self) -> String;
    /// Platform string, preferring user-agent client hints.
    fn platform(&self) -> Option<String>;
    /// Install the global handler suppressing default keyboard shortcuts.
    fn prevent_default_keyboard_events(&mut self);
    /// Write a line to the console.
    fn console_log(&mut self, message: &str);
}

/// What: Extract the path component of a base URI.
///
/// Inputs:
/// - `base_uri`: Absolute URI such as `http://localhost:5858/ui/`.
///
/// Output:
/// - The URL path, or `Err` when `base_uri` is not an absolute URL.
///
/// # Errors
/// - Unparsable URI.
pub fn base_path_from_uri(base_uri: &str) -> Result<String, String> {
    reqwest::Url::parse(base_uri)
        .map(|u| u.path().to_string())
        .map_err(|e| format!("invalid base URI {base_uri:?}: {e}"))
}

/// What: Derive the API base path from the UI base path.
///
/// Inputs:
/// - `base_path`: Path the UI is served from.
///
/// Output:
/// - `"api"` for `/`; otherwise `base_path` with its first `ui` replaced by `api`.
///
/// Details:
/// - Plain substring replacement: `/uiux/ui/` becomes `/apiux/ui/`.
#[must_use]
pub fn derive_api_url(base_path: &str) -> String {
    if base_path == "/" {
        ROOT_API_URL.to_string()
    } else {
        base_path.replacen("ui", "api", 1)
    }
}

/// What: Build the flags record from host-provided values.
///
/// # Errors
/// - The host's base URI is not a valid absolute URL.
pub fn flags_from_host<H: Host + ?Sized>(host: &H) -> Result<Flags, String> {
    let base_path = base_path_from_uri(&host.base_uri())?;
    let api_url = derive_api_url(&base_path);
    let platform = host.platform();
    Ok(Flags {
        operating_system: detect_os(&host.user_agent(), platform.as_deref()),
        base_path,
        api_url,
    })
}

/// What: One-shot initialization of the UI.
///
/// Inputs:
/// - `host`: Browser capabilities.
/// - `entry`: UI entry point; called exactly once with the flags.
///
/// Output:
/// - `Ok(())` after `entry` returns.
///
/// # Errors
/// - Invalid base URI; `entry` is not called in that case.
///
/// Details:
/// - Order: banner, flags, keyboard suppression, entry point.
pub fn bootstrap<H, F>(host: &mut H, entry: F) -> Result<(), String>
where
    H: Host + ?Sized,
    F: FnOnce(Flags),
{
    host.console_log(BANNER);
    let flags = flags_from_host(host)?;
    host.prevent_default_keyboard_events();
    entry(flags);
    Ok(())
}
