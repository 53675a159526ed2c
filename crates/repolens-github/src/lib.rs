//! GitHub repository ingestion for Repolens.
//!
//! Resolves a repository URL, derives an extension allow-list and a file
//! budget from the repository's language profile, walks the default
//! branch's tree (with a single `main` → `master` fallback), and fetches
//! eligible file bodies through a bounded worker pool. Individual file
//! failures are absorbed; an empty result is the only terminal failure of
//! the fetch phase.

pub mod client;
pub mod error;
pub mod fakes;
pub mod model;
pub mod source;

pub use client::{GithubClient, GithubConfig, FETCH_CONCURRENCY, MAX_FILE_BYTES};
pub use error::{IngestError, IngestResult};
pub use model::{FetchOutcome, FetchedRepository, RepoRef, SkipReason, SourceFile, TreeEntry};
pub use source::RepositorySource;
