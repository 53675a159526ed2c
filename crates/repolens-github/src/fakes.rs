//! In-memory fakes for the ingestion seam (testing only).

use async_trait::async_trait;

use crate::error::{IngestError, IngestResult};
use crate::model::{FetchedRepository, SourceFile};
use crate::source::RepositorySource;

/// Returns the same repository for every URL.
#[derive(Debug, Clone)]
pub struct StaticSource {
    repo: FetchedRepository,
}

impl StaticSource {
    pub fn new(repo: FetchedRepository) -> Self {
        StaticSource { repo }
    }

    /// A small two-file Rust repository, convenient as a test fixture.
    pub fn sample() -> Self {
        let files = vec![
            SourceFile {
                name: "main.rs".to_string(),
                path: "src/main.rs".to_string(),
                content: "fn main() {\n    println!(\"hello\");\n}\n".to_string(),
                language: Some("rust".to_string()),
                size: 38,
            },
            SourceFile {
                name: "README.md".to_string(),
                path: "README.md".to_string(),
                content: "# sample\n".to_string(),
                language: Some("markdown".to_string()),
                size: 9,
            },
        ];
        StaticSource::new(FetchedRepository {
            name: "sample".to_string(),
            full_name: "octocat/sample".to_string(),
            description: Some("a sample repository".to_string()),
            languages: vec!["Rust".to_string()],
            default_branch: "main".to_string(),
            files,
        })
    }
}

#[async_trait]
impl RepositorySource for StaticSource {
    async fn fetch_repository(&self, _url: &str) -> IngestResult<FetchedRepository> {
        Ok(self.repo.clone())
    }
}

/// Fails every fetch with the error produced by the supplied constructor.
#[derive(Debug, Clone)]
pub struct ErrorSource {
    make: fn() -> IngestError,
}

impl ErrorSource {
    pub fn new(make: fn() -> IngestError) -> Self {
        ErrorSource { make }
    }
}

#[async_trait]
impl RepositorySource for ErrorSource {
    async fn fetch_repository(&self, _url: &str) -> IngestResult<FetchedRepository> {
        Err((self.make)())
    }
}
