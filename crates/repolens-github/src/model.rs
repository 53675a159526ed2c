//! Data model for repository ingestion: identifiers, wire types for the
//! GitHub REST API, and the fetched-file domain types.

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, IngestResult};

/// A resolved `owner/name` repository reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// Parse a GitHub repository URL into an owner/name pair.
    ///
    /// Accepts `https://github.com/{owner}/{repo}` (and `www.github.com`),
    /// ignoring any trailing path segments. Both segments must be non-empty
    /// and restricted to `[A-Za-z0-9._-]`.
    pub fn parse(url: &str) -> IngestResult<Self> {
        let invalid = || IngestError::InvalidRepoUrl(url.to_string());

        let parsed = reqwest::Url::parse(url).map_err(|_| invalid())?;
        let host = parsed.host_str().unwrap_or_default().to_lowercase();
        if host != "github.com" && host != "www.github.com" {
            return Err(invalid());
        }

        let mut segments = parsed
            .path_segments()
            .ok_or_else(invalid)?
            .filter(|s| !s.is_empty());
        let owner = segments.next().ok_or_else(invalid)?;
        let name = segments.next().ok_or_else(invalid)?;

        if !is_valid_segment(owner) || !is_valid_segment(name) {
            return Err(invalid());
        }

        Ok(RepoRef {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// `GET /repos/{owner}/{repo}`: the subset of fields we consume.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RepoInfo {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub default_branch: String,
}

/// `GET /repos/{owner}/{repo}/languages`: language name to byte count.
pub type LanguageProfile = std::collections::BTreeMap<String, u64>;

/// One entry of `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    pub sha: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TreeResponse {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
}

/// `GET /repos/{owner}/{repo}/git/blobs/{sha}`.
#[derive(Debug, Deserialize)]
pub(crate) struct BlobResponse {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

/// A successfully fetched, decoded source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub path: String,
    pub content: String,
    pub language: Option<String>,
    /// Decoded size in bytes; never exceeds [`crate::client::MAX_FILE_BYTES`].
    pub size: u64,
}

/// The terminal artifact of ingestion. `files` is never empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedRepository {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub languages: Vec<String>,
    pub default_branch: String,
    pub files: Vec<SourceFile>,
}

/// Why a single candidate was dropped from the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Decoded content exceeds the per-file size cap.
    TooLarge,
    /// Content is not decodable text.
    Binary,
    /// Transport failure or unreadable body.
    Transport,
    /// The blob endpoint answered with a non-success status.
    Status,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::TooLarge => "too large",
            SkipReason::Binary => "binary or undecodable",
            SkipReason::Transport => "transport error",
            SkipReason::Status => "unexpected status",
        }
    }
}

/// Per-candidate fetch outcome. Skips are modeled, logged, and dropped;
/// they never abort the batch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Fetched(SourceFile),
    Skipped { path: String, reason: SkipReason },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_urls() {
        let repo = RepoRef::parse("https://github.com/octocat/Hello-World").unwrap();
        assert_eq!(repo.owner, "octocat");
        assert_eq!(repo.name, "Hello-World");
        assert_eq!(repo.full_name(), "octocat/Hello-World");

        let repo = RepoRef::parse("https://www.github.com/rust-lang/cargo/").unwrap();
        assert_eq!(repo.full_name(), "rust-lang/cargo");

        // Extra path segments are ignored.
        let repo = RepoRef::parse("https://github.com/a/b/tree/main/src").unwrap();
        assert_eq!(repo.full_name(), "a/b");
    }

    #[test]
    fn test_parse_rejects_wrong_host() {
        assert!(RepoRef::parse("https://gitlab.com/a/b").is_err());
        assert!(RepoRef::parse("https://example.com/a/b").is_err());
    }

    #[test]
    fn test_parse_rejects_short_paths() {
        assert!(RepoRef::parse("https://github.com").is_err());
        assert!(RepoRef::parse("https://github.com/onlyowner").is_err());
        assert!(RepoRef::parse("https://github.com//").is_err());
    }

    #[test]
    fn test_parse_rejects_invalid_characters() {
        assert!(RepoRef::parse("https://github.com/own%20er/repo").is_err());
        assert!(RepoRef::parse("https://github.com/owner/re po").is_err());
    }

    #[test]
    fn test_parse_rejects_non_urls() {
        assert!(RepoRef::parse("not a url").is_err());
        assert!(RepoRef::parse("").is_err());
    }

    #[test]
    fn test_tree_response_deserializes_blob_entries() {
        let raw = serde_json::json!({
            "sha": "abc",
            "tree": [
                {"path": "src/main.rs", "sha": "s1", "type": "blob", "size": 120},
                {"path": "src", "sha": "s2", "type": "tree"}
            ],
            "truncated": false
        });
        let parsed: TreeResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.tree.len(), 2);
        assert_eq!(parsed.tree[0].entry_type, "blob");
        assert_eq!(parsed.tree[0].size, Some(120));
        assert_eq!(parsed.tree[1].entry_type, "tree");
        assert_eq!(parsed.tree[1].size, None);
    }
}
