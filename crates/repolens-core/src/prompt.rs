//! Prompt construction for the review exchange.
//!
//! The prompt carries a bounded sample of the repository (at most 15
//! files, 2500 characters each) plus optional caller context, and asks
//! for a fenced JSON object in the schema the structurer validates.

use repolens_github::SourceFile;

use crate::review::truncate_chars;

/// Files included in a single prompt.
pub const MAX_PROMPT_FILES: usize = 15;
/// Characters of each file included in the prompt.
pub const MAX_PREVIEW_CHARS: usize = 2500;

/// Optional caller-supplied context threaded into the prompt.
#[derive(Debug, Clone, Default)]
pub struct ReviewContext {
    pub project_description: Option<String>,
    pub project_goals: Vec<String>,
    pub focus_areas: Vec<String>,
    pub experience_level: Option<String>,
}

impl ReviewContext {
    pub fn is_empty(&self) -> bool {
        self.project_description.is_none()
            && self.project_goals.is_empty()
            && self.focus_areas.is_empty()
            && self.experience_level.is_none()
    }
}

/// Build the single-message review prompt.
pub fn build_review_prompt(
    files: &[SourceFile],
    repository_name: &str,
    context: &ReviewContext,
) -> String {
    let mut files_text = String::new();
    for file in files.iter().take(MAX_PROMPT_FILES) {
        let language = file.language.as_deref().unwrap_or("");
        let preview = truncate_chars(&file.content, MAX_PREVIEW_CHARS);
        files_text.push_str(&format!(
            "**File: {}** ({})\n```{}\n{}\n```\n\n",
            file.path,
            if language.is_empty() { "unknown" } else { language },
            language,
            preview
        ));
    }

    let mut context_section = String::new();
    if !context.is_empty() {
        context_section.push_str("## CONTEXT:\n");
        if let Some(description) = &context.project_description {
            context_section.push_str(&format!("**Project:** {description}\n"));
        }
        if !context.project_goals.is_empty() {
            context_section.push_str(&format!("**Goals:** {}\n", context.project_goals.join(", ")));
        }
        if !context.focus_areas.is_empty() {
            context_section.push_str(&format!(
                "**Focus areas:** {}\n",
                context.focus_areas.join(", ")
            ));
        }
        if let Some(level) = &context.experience_level {
            context_section.push_str(&format!("**Developer level:** {level}\n"));
        }
        context_section.push('\n');
    }

    format!(
        r#"You are an experienced code reviewer analyzing the "{repository_name}" repository.

{context_section}## CODE TO REVIEW:
{files_text}## YOUR TASK:
Review the code above for security, performance, maintainability, style, and bug issues.

Respond with a single fenced ```json code block containing exactly this structure:

{{
  "analysis_summary": {{
    "total_issues": <int>,
    "security_issues": <int>,
    "performance_issues": <int>,
    "maintainability_issues": <int>,
    "style_issues": <int>,
    "bug_issues": <int>,
    "overall_score": <int 0-100>
  }},
  "detailed_issues": [
    {{
      "file": "<path>",
      "line": <int or null>,
      "type": "security|performance|maintainability|style|bug",
      "severity": "critical|high|medium|low",
      "message": "<what is wrong>",
      "suggestion": "<how to fix it>",
      "code_snippet": "<offending code or null>",
      "improved_code": "<fixed code or null>"
    }}
  ],
  "file_scores": [
    {{"file": "<path>", "score": <int 0-100>, "issues_count": <int>}}
  ],
  "general_feedback": "<short overall assessment>"
}}

Reference real files and lines from the code above. Be specific and actionable."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file(path: &str, content: &str) -> SourceFile {
        SourceFile {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            content: content.to_string(),
            language: Some("rust".to_string()),
            size: content.len() as u64,
        }
    }

    #[test]
    fn test_prompt_includes_files_and_schema() {
        let files = vec![sample_file("src/main.rs", "fn main() {}")];
        let prompt = build_review_prompt(&files, "demo", &ReviewContext::default());
        assert!(prompt.contains("\"demo\" repository"));
        assert!(prompt.contains("**File: src/main.rs** (rust)"));
        assert!(prompt.contains("fn main() {}"));
        assert!(prompt.contains("analysis_summary"));
        assert!(!prompt.contains("## CONTEXT:"));
    }

    #[test]
    fn test_prompt_caps_file_count_and_preview() {
        let files: Vec<SourceFile> = (0..30)
            .map(|i| sample_file(&format!("src/f{i}.rs"), &"x".repeat(10_000)))
            .collect();
        let prompt = build_review_prompt(&files, "demo", &ReviewContext::default());
        assert!(prompt.contains("src/f14.rs"));
        assert!(!prompt.contains("src/f15.rs"));
        assert!(!prompt.contains(&"x".repeat(MAX_PREVIEW_CHARS + 1)));
    }

    #[test]
    fn test_prompt_context_section() {
        let context = ReviewContext {
            project_description: Some("a web crawler".to_string()),
            project_goals: vec!["reliability".to_string()],
            focus_areas: vec!["security".to_string(), "performance".to_string()],
            experience_level: Some("beginner".to_string()),
        };
        let prompt = build_review_prompt(&[], "demo", &context);
        assert!(prompt.contains("## CONTEXT:"));
        assert!(prompt.contains("**Project:** a web crawler"));
        assert!(prompt.contains("**Focus areas:** security, performance"));
        assert!(prompt.contains("**Developer level:** beginner"));
    }
}
