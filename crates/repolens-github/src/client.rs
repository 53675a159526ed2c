//! GitHub API client: repository metadata, language profile, recursive
//! tree listing with branch fallback, and bounded-concurrency blob
//! fetching.
//!
//! Per-file failures degrade that file to a skipped outcome; only
//! request-level failures (metadata, languages, tree) abort the ingestion.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use repolens_lang::{detect_language, is_eligible, relevant_extensions};

use crate::error::{IngestError, IngestResult};
use crate::model::{
    BlobResponse, FetchOutcome, FetchedRepository, LanguageProfile, RepoInfo, RepoRef,
    SkipReason, SourceFile, TreeEntry, TreeResponse,
};

/// Decoded files larger than this are skipped.
pub const MAX_FILE_BYTES: usize = 1024 * 1024;

/// Width of the blob fetch pool.
pub const FETCH_CONCURRENCY: usize = 5;

/// Floor and ceiling of the per-repository file budget.
const MIN_FILES: usize = 10;
const MAX_FILES: usize = 20;

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// GitHub API configuration.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// API base URL (override for testing against a stub server).
    pub api_base: String,
    /// Optional bearer token; unauthenticated requests work with lower
    /// rate limits.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_base: DEFAULT_API_BASE.to_string(),
            token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GithubConfig {
    /// Create a config from environment variables (`GITHUB_TOKEN`).
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Point the client at a different API base.
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// GitHub ingestion client.
pub struct GithubClient {
    config: GithubConfig,
    http: reqwest::Client,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("repolens/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");
        GithubClient { config, http }
    }

    pub fn from_env() -> Self {
        Self::new(GithubConfig::from_env())
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.config.token {
            req = req.bearer_auth(token);
        }
        req
    }

    /// Ingest a repository: resolve the URL, derive the allow-list and
    /// file budget from the language profile, list the default branch's
    /// tree (retrying `master` once if `main` is missing), and fetch the
    /// selected candidates through the bounded pool.
    pub async fn fetch_repository(&self, url: &str) -> IngestResult<FetchedRepository> {
        let repo = RepoRef::parse(url)?;
        let info = self.repo_info(&repo).await?;
        let languages = self.languages(&repo).await?;

        let allowed = relevant_extensions(languages.keys().map(String::as_str));
        let budget = file_budget(languages.len());
        info!(
            repo = %repo.full_name(),
            languages = languages.len(),
            budget,
            "ingesting repository"
        );

        let mut branch = info.default_branch.clone();
        let entries = match self.tree(&repo, &branch).await {
            Ok(entries) => entries,
            Err(err) if should_retry_on_master(&branch, &err) => {
                warn!(repo = %repo.full_name(), "branch main not found, retrying master");
                branch = "master".to_string();
                self.tree(&repo, &branch).await?
            }
            Err(err) => return Err(err),
        };

        let candidates = select_candidates(entries, &allowed, budget);
        debug!(candidates = candidates.len(), "candidates selected");

        let outcomes = fetch_ordered(candidates, FETCH_CONCURRENCY, |entry| {
            self.fetch_blob(&repo, entry)
        })
        .await;

        let mut files = Vec::new();
        for outcome in outcomes {
            match outcome {
                FetchOutcome::Fetched(file) => files.push(file),
                FetchOutcome::Skipped { path, reason } => {
                    debug!(%path, reason = reason.as_str(), "file skipped");
                }
            }
        }

        if files.is_empty() {
            return Err(IngestError::NoAnalyzableFiles);
        }

        info!(repo = %repo.full_name(), files = files.len(), "ingestion complete");
        Ok(FetchedRepository {
            name: repo.name.clone(),
            full_name: info.full_name,
            description: info.description,
            languages: languages.keys().cloned().collect(),
            default_branch: branch,
            files,
        })
    }

    async fn repo_info(&self, repo: &RepoRef) -> IngestResult<RepoInfo> {
        let url = format!(
            "{}/repos/{}/{}",
            self.config.api_base, repo.owner, repo.name
        );
        let resp = self.get(&url).send().await?;
        let resp = check_status(resp, repo, "repository metadata")?;
        Ok(resp.json().await?)
    }

    async fn languages(&self, repo: &RepoRef) -> IngestResult<LanguageProfile> {
        let url = format!(
            "{}/repos/{}/{}/languages",
            self.config.api_base, repo.owner, repo.name
        );
        let resp = self.get(&url).send().await?;
        let resp = check_status(resp, repo, "language profile")?;
        Ok(resp.json().await?)
    }

    async fn tree(&self, repo: &RepoRef, branch: &str) -> IngestResult<Vec<TreeEntry>> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.config.api_base, repo.owner, repo.name, branch
        );
        let resp = self.get(&url).send().await?;
        let resp = check_status(resp, repo, "repository tree")?;
        let tree: TreeResponse = resp.json().await?;
        Ok(tree.tree)
    }

    async fn fetch_blob(&self, repo: &RepoRef, entry: TreeEntry) -> FetchOutcome {
        let url = format!(
            "{}/repos/{}/{}/git/blobs/{}",
            self.config.api_base, repo.owner, repo.name, entry.sha
        );
        let resp = match self.get(&url).send().await {
            Ok(resp) => resp,
            Err(err) => {
                debug!(path = %entry.path, error = %err, "blob request failed");
                return FetchOutcome::Skipped {
                    path: entry.path,
                    reason: SkipReason::Transport,
                };
            }
        };
        if !resp.status().is_success() {
            return FetchOutcome::Skipped {
                path: entry.path,
                reason: SkipReason::Status,
            };
        }
        let blob: BlobResponse = match resp.json().await {
            Ok(blob) => blob,
            Err(_) => {
                return FetchOutcome::Skipped {
                    path: entry.path,
                    reason: SkipReason::Transport,
                }
            }
        };
        match decode_blob(&blob) {
            Ok(content) => {
                let name = entry
                    .path
                    .rsplit('/')
                    .next()
                    .unwrap_or(entry.path.as_str())
                    .to_string();
                let language = detect_language(&entry.path).map(str::to_string);
                let size = content.len() as u64;
                FetchOutcome::Fetched(SourceFile {
                    name,
                    path: entry.path,
                    content,
                    language,
                    size,
                })
            }
            Err(reason) => FetchOutcome::Skipped {
                path: entry.path,
                reason,
            },
        }
    }
}

fn check_status(
    resp: reqwest::Response,
    repo: &RepoRef,
    context: &str,
) -> IngestResult<reqwest::Response> {
    match resp.status().as_u16() {
        200..=299 => Ok(resp),
        404 => Err(IngestError::NotFound {
            owner: repo.owner.clone(),
            repo: repo.name.clone(),
        }),
        403 => Err(IngestError::RateLimited),
        status => Err(IngestError::Api {
            status,
            context: context.to_string(),
        }),
    }
}

/// The `main` tree listing falls back to `master` exactly once; any other
/// branch or error is terminal.
pub(crate) fn should_retry_on_master(branch: &str, err: &IngestError) -> bool {
    branch == "main" && matches!(err, IngestError::NotFound { .. })
}

/// File budget derived from the language profile size.
pub(crate) fn file_budget(language_count: usize) -> usize {
    (language_count * 3).clamp(MIN_FILES, MAX_FILES)
}

/// Keep eligible blob entries, truncated to the budget in tree order.
pub(crate) fn select_candidates(
    entries: Vec<TreeEntry>,
    allowed: &[String],
    budget: usize,
) -> Vec<TreeEntry> {
    entries
        .into_iter()
        .filter(|e| e.entry_type == "blob" && is_eligible(&e.path, allowed))
        .take(budget)
        .collect()
}

/// Decode a blob body into text, enforcing the size cap.
pub(crate) fn decode_blob(blob: &BlobResponse) -> Result<String, SkipReason> {
    let content = if blob.encoding == "base64" {
        // GitHub inserts newlines into base64 bodies.
        let compact: String = blob.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = BASE64
            .decode(compact.as_bytes())
            .map_err(|_| SkipReason::Binary)?;
        String::from_utf8(bytes).map_err(|_| SkipReason::Binary)?
    } else {
        blob.content.clone()
    };
    if content.len() > MAX_FILE_BYTES {
        return Err(SkipReason::TooLarge);
    }
    Ok(content)
}

/// Run `fetch` over `items` with at most `concurrency` in flight,
/// returning outputs in input order regardless of completion order.
pub(crate) async fn fetch_ordered<T, U, F, Fut>(
    items: Vec<T>,
    concurrency: usize,
    fetch: F,
) -> Vec<U>
where
    F: Fn(T) -> Fut,
    Fut: std::future::Future<Output = U>,
{
    stream::iter(items)
        .map(fetch)
        .buffered(concurrency)
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn blob_entry(path: &str) -> TreeEntry {
        TreeEntry {
            path: path.to_string(),
            sha: format!("sha-{path}"),
            entry_type: "blob".to_string(),
            size: Some(1),
        }
    }

    #[test]
    fn test_file_budget_bounds() {
        assert_eq!(file_budget(0), 10);
        assert_eq!(file_budget(1), 10);
        assert_eq!(file_budget(4), 12);
        assert_eq!(file_budget(5), 15);
        assert_eq!(file_budget(7), 20);
        assert_eq!(file_budget(50), 20);
    }

    #[test]
    fn test_select_candidates_filters_and_truncates_in_order() {
        let mut entries = vec![
            blob_entry("src/a.rs"),
            TreeEntry {
                path: "src".to_string(),
                sha: "t".to_string(),
                entry_type: "tree".to_string(),
                size: None,
            },
            blob_entry("img/logo.png"),
            blob_entry("src/b.rs"),
            blob_entry("src/c.rs"),
        ];
        entries.push(blob_entry("src/d.rs"));

        let allowed = vec!["rs".to_string()];
        let selected = select_candidates(entries, &allowed, 3);
        let paths: Vec<_> = selected.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["src/a.rs", "src/b.rs", "src/c.rs"]);
    }

    #[test]
    fn test_decode_blob_base64_with_newlines() {
        let blob = BlobResponse {
            content: "aGVs\nbG8g\nd29y\nbGQ=\n".to_string(),
            encoding: "base64".to_string(),
        };
        assert_eq!(decode_blob(&blob).unwrap(), "hello world");
    }

    #[test]
    fn test_decode_blob_plain_passthrough() {
        let blob = BlobResponse {
            content: "plain text".to_string(),
            encoding: "utf-8".to_string(),
        };
        assert_eq!(decode_blob(&blob).unwrap(), "plain text");
    }

    #[test]
    fn test_decode_blob_rejects_binary() {
        // 0xFF 0xFE is not valid UTF-8.
        let blob = BlobResponse {
            content: BASE64.encode([0xFF, 0xFE, 0x00, 0x01]),
            encoding: "base64".to_string(),
        };
        assert_eq!(decode_blob(&blob).unwrap_err(), SkipReason::Binary);

        let blob = BlobResponse {
            content: "!!not base64!!".to_string(),
            encoding: "base64".to_string(),
        };
        assert_eq!(decode_blob(&blob).unwrap_err(), SkipReason::Binary);
    }

    #[test]
    fn test_decode_blob_size_boundary() {
        let at_limit = BlobResponse {
            content: "a".repeat(MAX_FILE_BYTES),
            encoding: "utf-8".to_string(),
        };
        assert!(decode_blob(&at_limit).is_ok());

        let over_limit = BlobResponse {
            content: "a".repeat(MAX_FILE_BYTES + 1),
            encoding: "utf-8".to_string(),
        };
        assert_eq!(decode_blob(&over_limit).unwrap_err(), SkipReason::TooLarge);
    }

    #[test]
    fn test_should_retry_on_master_only_once_from_main() {
        let not_found = IngestError::NotFound {
            owner: "o".to_string(),
            repo: "r".to_string(),
        };
        assert!(should_retry_on_master("main", &not_found));
        assert!(!should_retry_on_master("master", &not_found));
        assert!(!should_retry_on_master("develop", &not_found));
        assert!(!should_retry_on_master("main", &IngestError::RateLimited));
    }

    #[tokio::test]
    async fn test_fetch_ordered_bounds_concurrency_and_keeps_order() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let items: Vec<usize> = (0..12).collect();
        let results = fetch_ordered(items, 5, |i| {
            let in_flight = Arc::clone(&in_flight);
            let max_seen = Arc::clone(&max_seen);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                // Early items sleep longer so completion order differs
                // from submission order.
                tokio::time::sleep(std::time::Duration::from_millis(20 - i as u64)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                i
            }
        })
        .await;

        assert_eq!(results, (0..12).collect::<Vec<_>>());
        assert!(max_seen.load(Ordering::SeqCst) <= 5);
        assert!(max_seen.load(Ordering::SeqCst) >= 2);
    }
}
