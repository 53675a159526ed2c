//! Repolens Core Library
//!
//! Review schema, response structuring, and analysis orchestration.
//! Re-exports everything a caller needs to run an analysis end to end.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod prompt;
pub mod review;
pub mod structurer;
pub mod telemetry;

pub use config::{looks_like_github_token, looks_like_provider_key, AppConfig, ConfigError};
pub use error::AnalysisError;
pub use orchestrator::{
    AnalysisReport, AnalysisRequest, AnalysisService, HealthReport, RepositorySummary,
};
pub use prompt::{build_review_prompt, ReviewContext};
pub use review::{
    penalty_score, FileScore, IssueKind, ReviewIssue, ReviewSummary, ScoreOrigin, Severity,
    StructuredReview, NEUTRAL_SCORE,
};
pub use structurer::structure_response;
pub use telemetry::init_tracing;

pub use repolens_ai::{AnthropicClient, ProbeReport, ProviderConfig, ProviderError, ReviewProvider};
pub use repolens_github::{
    FetchedRepository, GithubClient, GithubConfig, IngestError, RepositorySource, SourceFile,
};
pub use repolens_lang::{complexity_score, detect_language, is_eligible, relevant_extensions};

/// Repolens version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
