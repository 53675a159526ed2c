//! Response structuring: best-effort JSON extraction with field-by-field
//! validation, falling back to keyword heuristics over the raw text.
//!
//! `structure_response` is total and pure: every input, including
//! adversarial or truncated text, yields a valid `StructuredReview`, and
//! the same input always yields the same output.

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::review::{
    truncate_chars, FileScore, IssueKind, ReviewIssue, ReviewSummary, ScoreOrigin, Severity,
    StructuredReview, MAX_FEEDBACK_CHARS, MAX_MESSAGE_CHARS, MAX_SNIPPET_CHARS,
    MAX_SUGGESTION_CHARS, NEUTRAL_SCORE,
};

/// Characters of raw text kept as feedback in the keyword fallback.
const FALLBACK_FEEDBACK_CHARS: usize = 1000;

/// Convert a provider's raw text into a validated review.
pub fn structure_response(raw: &str) -> StructuredReview {
    if raw.trim().is_empty() {
        return StructuredReview::neutral();
    }
    match extract_json(raw) {
        Some(value) => validate_payload(&value),
        None => {
            warn!("no JSON payload in provider response, using keyword fallback");
            keyword_fallback(raw)
        }
    }
}

/// Ordered extraction strategies; the first one that yields a parseable
/// object wins.
fn extract_json(text: &str) -> Option<Value> {
    let strategies: [fn(&str) -> Option<Value>; 3] =
        [fenced_json_block, any_fenced_block, first_balanced_object];
    strategies.iter().find_map(|strategy| strategy(text))
}

fn fenced_json_block(text: &str) -> Option<Value> {
    let re = Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").ok()?;
    first_object(re.captures_iter(text).filter_map(|c| c.get(1)).map(|m| m.as_str()))
}

fn any_fenced_block(text: &str) -> Option<Value> {
    let re = Regex::new(r"(?s)```\s*(\{.*?\})\s*```").ok()?;
    first_object(re.captures_iter(text).filter_map(|c| c.get(1)).map(|m| m.as_str()))
}

/// Scan for the first balanced `{...}` substring that parses as an
/// object, honoring strings and escapes.
fn first_balanced_object(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    for start in 0..bytes.len() {
        if bytes[start] != b'{' {
            continue;
        }
        if let Some(end) = balanced_end(bytes, start) {
            if let Ok(value @ Value::Object(_)) = serde_json::from_str(&text[start..=end]) {
                return Some(value);
            }
        }
    }
    None
}

fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn first_object<'a, I>(candidates: I) -> Option<Value>
where
    I: Iterator<Item = &'a str>,
{
    for candidate in candidates {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str(candidate) {
            return Some(value);
        }
    }
    None
}

/// Validate an untyped payload field by field. Nothing in the input is
/// trusted: integers are coerced and clamped, strings truncated, enum
/// labels normalized, malformed issue entries dropped.
fn validate_payload(value: &Value) -> StructuredReview {
    let summary_src = value.get("analysis_summary");
    let reported_score = summary_src
        .and_then(|s| s.get("overall_score"))
        .and_then(coerce_int);

    let issues: Vec<ReviewIssue> = value
        .get("detailed_issues")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(validate_issue).collect())
        .unwrap_or_default();

    let file_scores: Vec<FileScore> = value
        .get("file_scores")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(validate_file_score).collect())
        .unwrap_or_default();

    let count = |field: &str| -> u32 {
        summary_src
            .and_then(|s| s.get(field))
            .and_then(coerce_int)
            .map(|n| n.max(0) as u32)
            .unwrap_or(0)
    };

    let summary = ReviewSummary {
        // Dropped malformed entries must not be counted.
        total_issues: issues.len() as u32,
        security_issues: count("security_issues"),
        performance_issues: count("performance_issues"),
        maintainability_issues: count("maintainability_issues"),
        style_issues: count("style_issues"),
        bug_issues: count("bug_issues"),
        overall_score: reported_score.map(clamp_score).unwrap_or(NEUTRAL_SCORE),
    };

    StructuredReview {
        summary,
        issues,
        file_scores,
        general_feedback: truncate_chars(
            &string_or(value.get("general_feedback"), ""),
            MAX_FEEDBACK_CHARS,
        ),
        score_origin: if reported_score.is_some() {
            ScoreOrigin::Reported
        } else {
            ScoreOrigin::Defaulted
        },
    }
}

fn validate_issue(entry: &Value) -> Option<ReviewIssue> {
    let obj = entry.as_object()?;
    Some(ReviewIssue {
        file: string_or(obj.get("file"), "unknown"),
        line: obj
            .get("line")
            .and_then(coerce_int)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0),
        kind: IssueKind::normalize(&string_or(obj.get("type"), "maintainability")),
        severity: Severity::normalize(&string_or(obj.get("severity"), "medium")),
        message: truncate_chars(&string_or(obj.get("message"), ""), MAX_MESSAGE_CHARS),
        suggestion: truncate_chars(&string_or(obj.get("suggestion"), ""), MAX_SUGGESTION_CHARS),
        code_snippet: optional_snippet(obj.get("code_snippet")),
        improved_code: optional_snippet(obj.get("improved_code")),
    })
}

fn validate_file_score(entry: &Value) -> Option<FileScore> {
    let obj = entry.as_object()?;
    Some(FileScore {
        file: string_or(obj.get("file"), "unknown"),
        score: obj
            .get("score")
            .and_then(coerce_int)
            .map(clamp_score)
            .unwrap_or(NEUTRAL_SCORE),
        issues_count: obj
            .get("issues_count")
            .and_then(coerce_int)
            .map(|n| n.max(0) as u32)
            .unwrap_or(0),
    })
}

/// Derive a coarse review from keyword frequency when no JSON payload is
/// present.
fn keyword_fallback(raw: &str) -> StructuredReview {
    let total = keyword_count(raw, &["issue", "problem", "bug", "error", "warning"]);
    let security_mentions = keyword_count(raw, &["security", "vulnerable", "exploit"]);
    let performance_mentions =
        keyword_count(raw, &["performance", "slow", "optimize", "inefficient"]);

    let summary = ReviewSummary {
        total_issues: total as u32,
        security_issues: security_mentions.min(total) as u32,
        performance_issues: performance_mentions.min(total) as u32,
        maintainability_issues: total
            .saturating_sub(security_mentions)
            .saturating_sub(performance_mentions) as u32,
        style_issues: 0,
        bug_issues: 0,
        overall_score: (100i64 - 10 * total as i64).max(50) as u8,
    };

    StructuredReview {
        summary,
        issues: Vec::new(),
        file_scores: Vec::new(),
        general_feedback: truncate_chars(raw, FALLBACK_FEEDBACK_CHARS),
        score_origin: ScoreOrigin::Derived,
    }
}

fn keyword_count(text: &str, keywords: &[&str]) -> usize {
    let pattern = format!(r"(?i)\b(?:{})\b", keywords.join("|"));
    match Regex::new(&pattern) {
        Ok(re) => re.find_iter(text).count(),
        Err(_) => 0,
    }
}

fn clamp_score(n: i64) -> u8 {
    n.clamp(0, 100) as u8
}

/// Coerce a JSON value to an integer the way a lenient validator does:
/// numbers truncate, numeric strings parse, booleans map to 0/1.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(*b as i64),
        _ => None,
    }
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Snippet fields: absent, null, or empty input stays `None`.
fn optional_snippet(value: Option<&Value>) -> Option<String> {
    let value = value?;
    if value.is_null() {
        return None;
    }
    let s = string_or(Some(value), "");
    if s.is_empty() {
        None
    } else {
        Some(truncate_chars(&s, MAX_SNIPPET_CHARS))
    }
}
