//! Trait seam over repository ingestion.
//!
//! The orchestrator depends on this trait rather than the concrete client
//! so analyses can be driven by in-memory fakes in tests.

use async_trait::async_trait;

use crate::client::GithubClient;
use crate::error::IngestResult;
use crate::model::FetchedRepository;

/// Anything that can resolve a repository URL into a bounded set of
/// fetched source files.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn fetch_repository(&self, url: &str) -> IngestResult<FetchedRepository>;
}

#[async_trait]
impl RepositorySource for GithubClient {
    async fn fetch_repository(&self, url: &str) -> IngestResult<FetchedRepository> {
        GithubClient::fetch_repository(self, url).await
    }
}
