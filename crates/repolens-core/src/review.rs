//! Review schema: the validated, bounded shape every analysis produces.
//!
//! External input never constructs these types directly; the structurer
//! normalizes, clamps, and truncates everything first.

use serde::{Deserialize, Serialize};

/// Neutral score used when a source omits one.
pub const NEUTRAL_SCORE: u8 = 85;

/// Character caps on free-text fields.
pub const MAX_MESSAGE_CHARS: usize = 500;
pub const MAX_SUGGESTION_CHARS: usize = 1000;
pub const MAX_SNIPPET_CHARS: usize = 2000;
pub const MAX_FEEDBACK_CHARS: usize = 2000;

/// Issue classification. Unknown labels normalize to `Maintainability`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Security,
    Performance,
    Maintainability,
    Style,
    Bug,
}

impl IssueKind {
    /// Normalize a raw label, remapping common synonyms.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "security" | "sec" => IssueKind::Security,
            "performance" | "perf" => IssueKind::Performance,
            "maintainability" | "maint" | "maintain" => IssueKind::Maintainability,
            "style" | "format" | "formatting" => IssueKind::Style,
            "bug" | "error" | "defect" => IssueKind::Bug,
            _ => IssueKind::Maintainability,
        }
    }
}

/// Issue severity. Unknown labels normalize to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Normalize a raw label, remapping common synonyms.
    pub fn normalize(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "critical" | "crit" | "urgent" => Severity::Critical,
            "high" | "major" => Severity::High,
            "medium" | "warning" | "warn" => Severity::Medium,
            "low" | "minor" | "info" => Severity::Low,
            _ => Severity::Medium,
        }
    }

    /// Score penalty carried by one issue of this severity.
    pub fn penalty(&self) -> u32 {
        match self {
            Severity::Critical => 25,
            Severity::High => 15,
            Severity::Medium => 8,
            Severity::Low => 3,
        }
    }
}

/// One reviewed issue, fully normalized and bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewIssue {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(rename = "type")]
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improved_code: Option<String>,
}

/// Issue counts plus the overall 0-100 score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub total_issues: u32,
    pub security_issues: u32,
    pub performance_issues: u32,
    pub maintainability_issues: u32,
    pub style_issues: u32,
    pub bug_issues: u32,
    pub overall_score: u8,
}

impl Default for ReviewSummary {
    fn default() -> Self {
        ReviewSummary {
            total_issues: 0,
            security_issues: 0,
            performance_issues: 0,
            maintainability_issues: 0,
            style_issues: 0,
            bug_issues: 0,
            overall_score: NEUTRAL_SCORE,
        }
    }
}

/// A per-file score entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileScore {
    pub file: String,
    pub score: u8,
    pub issues_count: u32,
}

/// Where the overall score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreOrigin {
    /// The model reported a score itself.
    Reported,
    /// Computed from the response or issue list.
    Derived,
    /// Neutral filler; nothing supplied a score.
    Defaulted,
}

/// The terminal artifact of response structuring. Always well-formed,
/// regardless of what the provider sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReview {
    #[serde(rename = "analysis_summary")]
    pub summary: ReviewSummary,
    #[serde(rename = "detailed_issues")]
    pub issues: Vec<ReviewIssue>,
    pub file_scores: Vec<FileScore>,
    pub general_feedback: String,
    pub score_origin: ScoreOrigin,
}

impl StructuredReview {
    /// Fixed neutral result for empty provider output.
    pub fn neutral() -> Self {
        StructuredReview {
            summary: ReviewSummary::default(),
            issues: Vec::new(),
            file_scores: Vec::new(),
            general_feedback: "No analysis available.".to_string(),
            score_origin: ScoreOrigin::Defaulted,
        }
    }
}

/// Penalty-based overall score: base 100, floor 0.
pub fn penalty_score(issues: &[ReviewIssue]) -> u8 {
    let penalty: u32 = issues.iter().map(|i| i.severity.penalty()).sum();
    100u32.saturating_sub(penalty) as u8
}

/// Truncate to at most `max` characters, respecting char boundaries.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_kind_synonyms() {
        assert_eq!(IssueKind::normalize("sec"), IssueKind::Security);
        assert_eq!(IssueKind::normalize("PERF"), IssueKind::Performance);
        assert_eq!(IssueKind::normalize("maint"), IssueKind::Maintainability);
        assert_eq!(IssueKind::normalize("maintain"), IssueKind::Maintainability);
        assert_eq!(IssueKind::normalize("format"), IssueKind::Style);
        assert_eq!(IssueKind::normalize("formatting"), IssueKind::Style);
        assert_eq!(IssueKind::normalize("error"), IssueKind::Bug);
        assert_eq!(IssueKind::normalize("defect"), IssueKind::Bug);
        assert_eq!(IssueKind::normalize("mystery"), IssueKind::Maintainability);
        assert_eq!(IssueKind::normalize(" Security "), IssueKind::Security);
    }

    #[test]
    fn test_severity_synonyms() {
        assert_eq!(Severity::normalize("crit"), Severity::Critical);
        assert_eq!(Severity::normalize("urgent"), Severity::Critical);
        assert_eq!(Severity::normalize("major"), Severity::High);
        assert_eq!(Severity::normalize("warn"), Severity::Medium);
        assert_eq!(Severity::normalize("warning"), Severity::Medium);
        assert_eq!(Severity::normalize("minor"), Severity::Low);
        assert_eq!(Severity::normalize("info"), Severity::Low);
        assert_eq!(Severity::normalize("??"), Severity::Medium);
    }

    #[test]
    fn test_penalty_score_weights_and_floor() {
        let issue = |severity| ReviewIssue {
            file: "a.rs".to_string(),
            line: None,
            kind: IssueKind::Bug,
            severity,
            message: String::new(),
            suggestion: String::new(),
            code_snippet: None,
            improved_code: None,
        };

        assert_eq!(penalty_score(&[]), 100);
        assert_eq!(penalty_score(&[issue(Severity::Critical)]), 75);
        assert_eq!(
            penalty_score(&[issue(Severity::High), issue(Severity::Medium), issue(Severity::Low)]),
            74
        );
        // Five criticals exhaust the base score.
        let many: Vec<_> = (0..5).map(|_| issue(Severity::Critical)).collect();
        assert_eq!(penalty_score(&many), 0);
    }

    #[test]
    fn test_truncate_chars_is_boundary_safe() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        // Multibyte characters are kept whole.
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }

    #[test]
    fn test_wire_field_names() {
        let review = StructuredReview::neutral();
        let value = serde_json::to_value(&review).unwrap();
        assert!(value.get("analysis_summary").is_some());
        assert!(value.get("detailed_issues").is_some());
        assert_eq!(value["analysis_summary"]["overall_score"], 85);
        assert_eq!(value["score_origin"], "defaulted");
    }
}
