//! Error types for the ingestion pipeline.

use thiserror::Error;

/// Errors that abort a repository ingestion.
///
/// Per-file fetch failures never surface here; they degrade individual
/// files to skipped outcomes instead.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The supplied URL is not a valid GitHub repository URL.
    #[error("invalid GitHub repository URL: {0}")]
    InvalidRepoUrl(String),

    /// The repository (or the requested branch tree) does not exist.
    #[error("repository {owner}/{repo} not found")]
    NotFound { owner: String, repo: String },

    /// The API refused the request (rate limit or access denied).
    #[error("GitHub API rate limit exceeded or access denied")]
    RateLimited,

    /// The API answered with an unexpected status.
    #[error("GitHub API returned status {status} while fetching {context}")]
    Api { status: u16, context: String },

    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("network error while contacting GitHub: {0}")]
    Network(String),

    /// Every candidate file was skipped; there is nothing to analyze.
    #[error("no analyzable files found in the repository")]
    NoAnalyzableFiles,
}

/// Convenience result alias for ingestion operations.
pub type IngestResult<T> = std::result::Result<T, IngestError>;

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        IngestError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_displays_owner_and_repo() {
        let err = IngestError::NotFound {
            owner: "octocat".to_string(),
            repo: "Hello-World".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("octocat"));
        assert!(msg.contains("Hello-World"));
    }

    #[test]
    fn test_api_error_displays_status_and_context() {
        let err = IngestError::Api {
            status: 502,
            context: "repository tree".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("repository tree"));
    }
}
