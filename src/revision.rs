//! Revision resolution: an explicit revision, or the newest upstream commit.

use std::time::Duration;

use futures::future::BoxFuture;
use serde::Deserialize;

use crate::config::{RepoRef, SyncConfig};
use crate::error::{Result, SyncError};

/// Source of "latest commit" lookups. Implemented over HTTP in production and faked in tests.
pub trait CommitSource: Send + Sync {
    /// What: Return the identifier of the most recent commit of `repo`.
    ///
    /// # Errors
    /// - Any transport, status, or decoding failure.
    fn latest_commit<'a>(&'a self, repo: &'a RepoRef) -> BoxFuture<'a, Result<String>>;
}

/// Single element of the commit listing; everything but `sha` is ignored.
#[derive(Debug, Deserialize)]
struct CommitEntry {
    /// Commit hash.
    sha: String,
}

/// GitHub REST commit listing.
#[derive(Debug, Clone)]
pub struct GitHubCommits {
    /// Shared HTTP client.
    client: reqwest::Client,
    /// API root without trailing slash.
    api_base: String,
    /// Optional bearer token.
    token: Option<String>,
}

impl GitHubCommits {
    /// What: Build a client for the API configured in `cfg`.
    ///
    /// Inputs:
    /// - `cfg`: Provides API base and optional token.
    ///
    /// Output:
    /// - Ready client, or `SyncError::Http` if the TLS backend cannot initialize.
    ///
    /// # Errors
    /// - `reqwest::Client` construction failure.
    pub fn new(cfg: &SyncConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .user_agent(format!("ui-core-sync/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            token: cfg.github_token.clone(),
        })
    }

    /// Commit listing URL asking for a single entry.
    fn commits_url(&self, repo: &RepoRef) -> String {
        format!(
            "{}/repos/{}/{}/commits?per_page=1",
            self.api_base, repo.owner, repo.repo
        )
    }

    /// What: Fetch the newest commit hash of `repo`.
    ///
    /// # Errors
    /// - `Http` on transport or decode failure, `Status` on non-2xx, `EmptyHistory` on `[]`.
    async fn fetch_latest(&self, repo: &RepoRef) -> Result<String> {
        let url = self.commits_url(repo);
        tracing::debug!(url = %url, "requesting latest commit");
        let mut req = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %url, "commit listing failed");
            return Err(SyncError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let commits: Vec<CommitEntry> = resp.json().await?;
        commits
            .into_iter()
            .next()
            .map(|c| c.sha)
            .ok_or_else(|| SyncError::EmptyHistory {
                repository: repo.to_string(),
            })
    }
}

impl CommitSource for GitHubCommits {
    fn latest_commit<'a>(&'a self, repo: &'a RepoRef) -> BoxFuture<'a, Result<String>> {
        Box::pin(self.fetch_latest(repo))
    }
}

/// What: Decide which revision to pin.
///
/// Inputs:
/// - `explicit`: Revision given by the caller, if any.
/// - `source`: Commit lookup used only when no explicit revision is given.
/// - `repo`: Upstream repository.
///
/// Output:
/// - The explicit revision unchanged, or the newest upstream commit.
///
/// # Errors
/// - Lookup failures propagate; there is no retry.
///
/// Details:
/// - An empty explicit revision counts as absent.
/// - No validation is applied to explicit revisions.
pub async fn resolve_revision(
    explicit: Option<&str>,
    source: &dyn CommitSource,
    repo: &RepoRef,
) -> Result<String> {
    if let Some(rev) = explicit.filter(|r| !r.is_empty()) {
        tracing::debug!(revision = %rev, "using explicit revision");
        return Ok(rev.to_string());
    }
    let sha = source.latest_commit(repo).await?;
    tracing::info!(repository = %repo, revision = %sha, "resolved latest revision");
    Ok(sha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Counts lookups and returns a fixed hash.
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl CommitSource for CountingSource {
        fn latest_commit<'a>(&'a self, _repo: &'a RepoRef) -> BoxFuture<'a, Result<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Ok("abc123".to_string()) })
        }
    }

    fn repo() -> RepoRef {
        RepoRef {
            owner: "unisonweb".into(),
            repo: "ui-core".into(),
        }
    }

    #[tokio::test]
    /// What: An explicit revision is returned as-is without any lookup.
    ///
    /// Inputs:
    /// - Explicit revision `not-even-a-sha`.
    ///
    /// Output:
    /// - Same string back; zero calls on the source.
    async fn explicit_revision_skips_lookup() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        let rev = resolve_revision(Some("not-even-a-sha"), &source, &repo())
            .await
            .expect("explicit revision");
        assert_eq!(rev, "not-even-a-sha");
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    /// What: No revision (or an empty one) triggers exactly one lookup.
    async fn missing_revision_queries_once() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        let rev = resolve_revision(None, &source, &repo()).await.expect("lookup");
        assert_eq!(rev, "abc123");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        let rev = resolve_revision(Some(""), &source, &repo()).await.expect("lookup");
        assert_eq!(rev, "abc123");
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    /// What: Serve one canned HTTP response and hand back the raw request text.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.expect("accept");
            let mut buf = vec![0u8; 8192];
            let n = sock.read(&mut buf).await.expect("read request");
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            sock.write_all(response.as_bytes()).await.expect("write response");
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    #[tokio::test]
    /// What: The HTTP source returns the `sha` of the first listed commit.
    ///
    /// Inputs:
    /// - Local server answering with two commits.
    ///
    /// Output:
    /// - First commit's hash; request targets the commit listing with a token.
    async fn github_source_reads_first_sha() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"sha":"1111","commit":{}},{"sha":"2222"}]"#,
        )
        .await;
        let mut cfg = SyncConfig::with_defaults(".");
        cfg.api_base = base;
        cfg.github_token = Some("secret".into());
        let source = GitHubCommits::new(&cfg).expect("client");

        let sha = resolve_revision(None, &source, &repo()).await.expect("lookup");
        assert_eq!(sha, "1111");

        let request = server.await.expect("server task");
        assert!(request.starts_with("GET /repos/unisonweb/ui-core/commits?per_page=1 "));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer secret"));
    }

    #[tokio::test]
    /// What: Non-success status and empty listings are hard errors.
    async fn github_source_errors() {
        let (base, server) = serve_once("404 Not Found", r#"{"message":"Not Found"}"#).await;
        let mut cfg = SyncConfig::with_defaults(".");
        cfg.api_base = base;
        let source = GitHubCommits::new(&cfg).expect("client");
        let err = resolve_revision(None, &source, &repo())
            .await
            .expect_err("404 must fail");
        assert!(matches!(err, SyncError::Status { status: 404, .. }));
        server.await.expect("server task");

        let (base, server) = serve_once("200 OK", "[]").await;
        cfg.api_base = base;
        let source = GitHubCommits::new(&cfg).expect("client");
        let err = resolve_revision(None, &source, &repo())
            .await
            .expect_err("empty history must fail");
        assert!(matches!(err, SyncError::EmptyHistory { .. }));
        server.await.expect("server task");
    }
}
