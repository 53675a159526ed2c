//! Analysis-level error taxonomy.
//!
//! Leaf errors from ingestion and the provider boundary are folded into a
//! single taxonomy here; the orchestrator converts anything that reaches
//! it into a degraded report, so callers never see these directly.

use repolens_ai::ProviderError;
use repolens_github::IngestError;
use thiserror::Error;

/// Request-level analysis failures.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("repository not found: {0}")]
    NotFound(String),

    #[error("rate limited by an upstream API")]
    RateLimited,

    #[error("authentication with an upstream API failed")]
    AuthFailure,

    #[error("network error: {0}")]
    Network(String),

    #[error("no analyzable files found in the repository")]
    NoAnalyzableFiles,

    #[error("provider error: {0}")]
    Provider(ProviderError),
}

/// Convenience result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl From<IngestError> for AnalysisError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::InvalidRepoUrl(url) => AnalysisError::InvalidRepoUrl(url),
            IngestError::NotFound { owner, repo } => {
                AnalysisError::NotFound(format!("{owner}/{repo}"))
            }
            IngestError::RateLimited => AnalysisError::RateLimited,
            IngestError::Api { status, context } => AnalysisError::Network(format!(
                "GitHub returned status {status} while fetching {context}"
            )),
            IngestError::Network(msg) => AnalysisError::Network(msg),
            IngestError::NoAnalyzableFiles => AnalysisError::NoAnalyzableFiles,
        }
    }
}

impl From<ProviderError> for AnalysisError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::AuthFailure => AnalysisError::AuthFailure,
            ProviderError::RateLimited => AnalysisError::RateLimited,
            ProviderError::Network(msg) => AnalysisError::Network(msg),
            other => AnalysisError::Provider(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_errors_fold_into_taxonomy() {
        let err: AnalysisError = IngestError::NotFound {
            owner: "octocat".to_string(),
            repo: "missing".to_string(),
        }
        .into();
        assert!(matches!(err, AnalysisError::NotFound(_)));
        assert!(err.to_string().contains("octocat/missing"));

        let err: AnalysisError = IngestError::RateLimited.into();
        assert!(matches!(err, AnalysisError::RateLimited));

        let err: AnalysisError = IngestError::NoAnalyzableFiles.into();
        assert!(matches!(err, AnalysisError::NoAnalyzableFiles));
    }

    #[test]
    fn test_provider_errors_fold_into_taxonomy() {
        let err: AnalysisError = ProviderError::AuthFailure.into();
        assert!(matches!(err, AnalysisError::AuthFailure));

        let err: AnalysisError = ProviderError::RateLimited.into();
        assert!(matches!(err, AnalysisError::RateLimited));

        let err: AnalysisError = ProviderError::EmptyResponse.into();
        assert!(matches!(err, AnalysisError::Provider(_)));

        let err: AnalysisError = ProviderError::Api(503).into();
        assert!(err.to_string().contains("503"));
    }
}
