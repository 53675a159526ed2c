//! Heuristic complexity scoring for a single source file.
//!
//! Produces a 0-100 score (100 = simple) from line count, nesting depth,
//! control-flow keyword density, long lines, and comment ratio. Used as a
//! fallback when the reviewing model does not score a file itself.

use regex::Regex;

/// Languages whose nesting is tracked by brace counting.
const BRACE_LANGUAGES: &[&str] = &[
    "javascript",
    "typescript",
    "tsx",
    "jsx",
    "java",
    "cpp",
    "c",
    "header",
    "csharp",
    "go",
    "rust",
    "php",
    "swift",
    "kotlin",
    "scala",
];

/// Score a file's complexity on a 0-100 scale (higher = simpler).
///
/// Starts at 100 and applies independently capped penalties, then clamps.
/// Empty content scores 100.
pub fn complexity_score(content: &str, language: Option<&str>) -> u8 {
    if content.is_empty() {
        return 100;
    }
    let non_empty: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
    if non_empty.is_empty() {
        return 100;
    }

    let mut score: i64 = 100;

    let lines = non_empty.len() as i64;
    if lines > 100 {
        score -= ((lines - 100) / 20).min(30);
    }

    let depth = max_nesting(content, language) as i64;
    if depth > 3 {
        score -= ((depth - 3) * 5).min(25);
    }

    let keywords = control_keyword_count(content, language) as i64;
    if keywords > 10 {
        score -= ((keywords - 10) * 2).min(20);
    }

    let long_lines = non_empty.iter().filter(|l| l.chars().count() > 120).count() as i64;
    if long_lines > 5 {
        score -= ((long_lines - 5) * 3).min(15);
    }

    let comments = comment_line_count(content, language) as f64;
    let ratio = comments / non_empty.len() as f64;
    if ratio > 0.1 {
        score += ((ratio * 50.0) as i64).min(10);
    }

    score.clamp(0, 100) as u8
}

/// Approximate maximum nesting depth: brace counting for brace languages,
/// indentation tracking for Python, zero otherwise.
fn max_nesting(content: &str, language: Option<&str>) -> i32 {
    let brace = language.is_some_and(|l| BRACE_LANGUAGES.contains(&l));
    let python = language == Some("python");

    let mut max = 0i32;
    let mut current = 0i32;
    for line in content.lines() {
        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }
        if brace {
            current += line.matches('{').count() as i32;
            current -= line.matches('}').count() as i32;
        } else if python {
            let block_keywords = ["if", "for", "while", "def", "class", "try", "with"];
            if stripped.ends_with(':') && block_keywords.iter().any(|k| stripped.contains(k)) {
                current += 1;
            }
            // Assumes 4-space indentation; a dedent resets the level.
            let leading = (line.len() - line.trim_start().len()) as i32;
            if leading < current * 4 {
                current = (leading / 4).max(0);
            }
        }
        max = max.max(current);
    }
    max
}

/// Count control-flow keywords via case-insensitive word-boundary matching.
fn control_keyword_count(content: &str, language: Option<&str>) -> usize {
    let keywords: &[&str] = match language {
        Some("python") => &["if", "elif", "for", "while", "try", "except", "with", "lambda"],
        Some("javascript" | "typescript" | "tsx" | "jsx") => {
            &["if", "for", "while", "switch", "try", "catch", "function"]
        }
        Some("java") => &["if", "for", "while", "switch", "try", "catch"],
        _ => &["if", "for", "while", "try", "catch", "switch"],
    };
    let pattern = format!(r"(?i)\b(?:{})\b", keywords.join("|"));
    match Regex::new(&pattern) {
        Ok(re) => re.find_iter(content).count(),
        Err(_) => 0,
    }
}

/// Count comment lines using per-language line prefixes.
fn comment_line_count(content: &str, language: Option<&str>) -> usize {
    content
        .lines()
        .filter(|line| {
            let s = line.trim();
            if s.is_empty() {
                return false;
            }
            match language {
                Some("python") => s.starts_with('#'),
                Some("yaml") => s.starts_with('#'),
                Some("html") => s.contains("<!--"),
                Some(l) if BRACE_LANGUAGES.contains(&l) => {
                    s.starts_with("//") || s.starts_with("/*")
                }
                _ => {
                    s.starts_with('#')
                        || s.starts_with("//")
                        || s.starts_with("/*")
                        || s.starts_with("<!--")
                }
            }
        })
        .count()
}
