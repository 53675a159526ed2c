//! Analysis orchestration: ingest → prompt → provider → structure →
//! aggregate.
//!
//! The caller-facing contract is "always get a structured report":
//! request-level failures produce a degraded but well-formed report with
//! a human-readable cause, never a bare error.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use repolens_ai::{AnthropicClient, ReviewProvider};
use repolens_github::{FetchedRepository, GithubClient, RepoRef, RepositorySource, SourceFile};
use repolens_lang::complexity_score;

use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::prompt::{build_review_prompt, ReviewContext};
use crate::review::{penalty_score, FileScore, ScoreOrigin, StructuredReview};
use crate::structurer::structure_response;

/// One analysis request: a repository URL plus optional reviewer context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub repository_url: String,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default)]
    pub project_goals: Vec<String>,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
}

impl AnalysisRequest {
    pub fn new(repository_url: impl Into<String>) -> Self {
        AnalysisRequest {
            repository_url: repository_url.into(),
            project_description: None,
            project_goals: Vec::new(),
            focus_areas: Vec::new(),
            experience_level: None,
        }
    }

    fn context(&self) -> ReviewContext {
        ReviewContext {
            project_description: self.project_description.clone(),
            project_goals: self.project_goals.clone(),
            focus_areas: self.focus_areas.clone(),
            experience_level: self.experience_level.clone(),
        }
    }
}

/// The repository block of a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    pub total_files_analyzed: u32,
}

/// The terminal, caller-facing artifact of one analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub repository: RepositorySummary,
    pub review: StructuredReview,
    pub timestamp: DateTime<Utc>,
}

/// Per-service liveness summary.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: String,
    pub services: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Sequences one analysis end to end.
pub struct AnalysisService {
    source: Arc<dyn RepositorySource>,
    provider: Arc<dyn ReviewProvider>,
}

impl AnalysisService {
    pub fn new(source: Arc<dyn RepositorySource>, provider: Arc<dyn ReviewProvider>) -> Self {
        AnalysisService { source, provider }
    }

    /// Wire up the real GitHub and provider clients from configuration.
    pub fn from_config(config: AppConfig) -> Self {
        AnalysisService::new(
            Arc::new(GithubClient::new(config.github)),
            Arc::new(AnthropicClient::new(config.provider)),
        )
    }

    /// Run one full analysis. Never fails: upstream errors produce a
    /// degraded report instead.
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        match self.try_analyze(request).await {
            Ok(report) => report,
            Err(err) => {
                error!(url = %request.repository_url, error = %err, "analysis failed, returning degraded report");
                degraded_report(request, &err)
            }
        }
    }

    async fn try_analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, AnalysisError> {
        let repo = self
            .source
            .fetch_repository(&request.repository_url)
            .await?;
        info!(repo = %repo.full_name, files = repo.files.len(), "repository ingested");

        let prompt = build_review_prompt(&repo.files, &repo.name, &request.context());
        let raw = self.provider.complete(&prompt).await?;
        info!(chars = raw.len(), "provider response received");

        let mut review = structure_response(&raw);
        finalize_scores(&mut review, &repo.files);

        Ok(AnalysisReport {
            repository: summarize_repository(&repo, &request.repository_url),
            review,
            timestamp: Utc::now(),
        })
    }

    /// Probe dependent services and roll the results up.
    pub async fn health_check(&self) -> HealthReport {
        let probe = self.provider.probe().await;
        let mut services = BTreeMap::new();
        services.insert("github".to_string(), true);
        services.insert("provider".to_string(), probe.healthy);
        let all_healthy = services.values().all(|healthy| *healthy);
        HealthReport {
            status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
            services,
            model: probe.model,
            timestamp: Utc::now(),
        }
    }
}

/// Resolve per-file and overall scores after structuring.
///
/// A model-reported score wins for its exact path; every other analyzed
/// file falls back to the complexity heuristic. A defaulted overall score
/// with a non-empty issue list is recomputed from per-issue penalties.
fn finalize_scores(review: &mut StructuredReview, files: &[SourceFile]) {
    let reported = std::mem::take(&mut review.file_scores);
    let resolved: Vec<FileScore> = files
        .iter()
        .map(|file| match reported.iter().find(|fs| fs.file == file.path) {
            Some(fs) => fs.clone(),
            None => FileScore {
                file: file.path.clone(),
                score: complexity_score(&file.content, file.language.as_deref()),
                issues_count: review.issues.iter().filter(|i| i.file == file.path).count() as u32,
            },
        })
        .collect();
    review.file_scores = resolved;

    if review.score_origin == ScoreOrigin::Defaulted && !review.issues.is_empty() {
        review.summary.overall_score = penalty_score(&review.issues);
        review.score_origin = ScoreOrigin::Derived;
    }
}

fn summarize_repository(repo: &FetchedRepository, url: &str) -> RepositorySummary {
    RepositorySummary {
        name: repo.name.clone(),
        url: url.to_string(),
        full_name: Some(repo.full_name.clone()),
        description: repo.description.clone(),
        languages: repo.languages.clone(),
        default_branch: Some(repo.default_branch.clone()),
        total_files_analyzed: repo.files.len() as u32,
    }
}

/// Degraded report: zero files, neutral review, human-readable cause.
fn degraded_report(request: &AnalysisRequest, err: &AnalysisError) -> AnalysisReport {
    let name = RepoRef::parse(&request.repository_url)
        .map(|r| r.name)
        .unwrap_or_else(|_| "repository".to_string());
    let mut review = StructuredReview::neutral();
    review.general_feedback = format!("Analysis could not complete: {err}");
    AnalysisReport {
        repository: RepositorySummary {
            name,
            url: request.repository_url.clone(),
            full_name: None,
            description: None,
            languages: Vec::new(),
            default_branch: None,
            total_files_analyzed: 0,
        },
        review,
        timestamp: Utc::now(),
    }
}
