//! Local development server settings (API proxy and vendored source alias).

use serde::Serialize;

/// Default API server proxied during development.
pub const DEFAULT_API_URL: &str = "127.0.0.1:8080";
/// Request path prefix forwarded to the API server.
pub const PROXY_CONTEXT: &str = "/api";
/// Source directory of the vendored ui-core tree, aliased as `ui-core`.
pub const UI_CORE_SRC: &str = "elm-stuff/gitdeps/github.com/unisonweb/ui-core/src";

/// Resolved dev-server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevServerConfig {
    /// Proxy target for `/api` requests.
    pub api_url: String,
    /// Build the Elm program in debug mode.
    pub elm_debug: bool,
    /// Path the `ui-core` import alias resolves to.
    pub ui_core_src: String,
    /// Proxied path prefix.
    pub proxy_context: String,
}

impl DevServerConfig {
    /// What: Build the configuration from raw `API_URL` / `ELM_DEBUG` values.
    ///
    /// Inputs:
    /// - `api_url`: `API_URL`, if set.
    /// - `elm_debug`: `ELM_DEBUG`, if set.
    ///
    /// Output:
    /// - Configuration with defaults for unset or blank values.
    ///
    /// Details:
    /// - `ELM_DEBUG` is true for `1` or `true` (case-insensitive); anything else is false.
    #[must_use]
    pub fn from_values(api_url: Option<String>, elm_debug: Option<String>) -> Self {
        let api_url = api_url
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let elm_debug = elm_debug.is_some_and(|v| {
            let v = v.trim();
            v == "1" || v.eq_ignore_ascii_case("true")
        });
        Self {
            api_url,
            elm_debug,
            ui_core_src: UI_CORE_SRC.to_string(),
            proxy_context: PROXY_CONTEXT.to_string(),
        }
    }

    /// Read `API_URL` and `ELM_DEBUG` from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(std::env::var("API_URL").ok(), std::env::var("ELM_DEBUG").ok())
    }

    /// What: Map a request path to its proxied URL.
    ///
    /// Inputs:
    /// - `path`: Incoming request path, e.g. `/api/list?x=1`.
    ///
    /// Output:
    /// - `Some(target)` with the `/api` prefix stripped, `None` for non-API paths.
    ///
    /// Details:
    /// - `/apix` is not under `/api`; the prefix must end at `/`, `?` or the end of the path.
    /// - A target without a scheme is treated as `http://`.
    #[must_use]
    pub fn proxy_target(&self, path: &str) -> Option<String> {
        let rest = path.strip_prefix(&self.proxy_context)?;
        if !(rest.is_empty() || rest.starts_with('/') || rest.starts_with('?')) {
            return None;
        }
        let base = self.api_url.trim_end_matches('/');
        let scheme = if base.contains("://") { "" } else { "http://" };
        Some(format!("{scheme}{base}{rest}"))
    }
}
