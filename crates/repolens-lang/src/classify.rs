//! File path classification: language tags, eligibility, allow-list
//! derivation.
//!
//! Classification is lookup-only and never fails; an unknown extension
//! simply yields no language tag.

use std::collections::BTreeSet;
use std::path::Path;

/// Baseline documentation/config extensions always worth ingesting.
const BASELINE_EXTENSIONS: &[&str] = &["json", "yaml", "yml", "md", "txt"];

/// Fallback allow-list when the host reports no recognizable languages.
const GENERAL_EXTENSIONS: &[&str] = &[
    "py", "js", "ts", "java", "cpp", "c", "go", "rs", "md", "json",
];

/// Map a file path to a language tag by extension (case-insensitive).
///
/// Conventional extensionless files (`Dockerfile`, `Makefile`, `Rakefile`)
/// are matched by exact lowercase name. Returns `None` for anything
/// unrecognized; that is not an error.
pub fn detect_language(path: &str) -> Option<&'static str> {
    if path.is_empty() {
        return None;
    }

    let p = Path::new(path);
    if let Some(name) = p.file_name().and_then(|n| n.to_str()) {
        match name.to_lowercase().as_str() {
            "dockerfile" => return Some("dockerfile"),
            "makefile" => return Some("makefile"),
            "rakefile" => return Some("rakefile"),
            _ => {}
        }
    }

    let ext = p.extension().and_then(|e| e.to_str())?.to_lowercase();
    let tag = match ext.as_str() {
        "py" | "pyw" | "pyi" => "python",
        "js" | "mjs" => "javascript",
        "ts" => "typescript",
        "tsx" => "tsx",
        "jsx" => "jsx",
        "java" => "java",
        "cpp" | "cc" | "cxx" | "c++" => "cpp",
        "c" => "c",
        "h" | "hpp" | "hxx" | "h++" => "header",
        "cs" => "csharp",
        "php" => "php",
        "rb" => "ruby",
        "go" => "go",
        "rs" => "rust",
        "swift" => "swift",
        "kt" => "kotlin",
        "scala" => "scala",
        "r" => "r",
        "sh" | "bash" | "zsh" => "shell",
        "ps1" => "powershell",
        "bat" | "cmd" => "batch",
        "sql" => "sql",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" => "scss",
        "sass" => "sass",
        "less" => "less",
        "xml" => "xml",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "ini" => "ini",
        "cfg" | "conf" => "config",
        "md" => "markdown",
        "vue" => "vue",
        "svelte" => "svelte",
        _ => return None,
    };
    Some(tag)
}

/// True iff the path's lowercase, dot-stripped extension appears in the
/// allow-list (which is itself lowercased and dot-stripped before the
/// comparison). An empty path or empty allow-list is never eligible.
pub fn is_eligible<S: AsRef<str>>(path: &str, allowed: &[S]) -> bool {
    if path.is_empty() || allowed.is_empty() {
        return false;
    }
    let ext = match Path::new(path).extension().and_then(|e| e.to_str()) {
        Some(e) => e.to_lowercase(),
        None => return false,
    };
    allowed
        .iter()
        .any(|a| a.as_ref().trim_start_matches('.').to_lowercase() == ext)
}

/// Extensions associated with a language name as reported by the source
/// host (GitHub's linguist names, not our internal tags).
fn extensions_for_language(language: &str) -> &'static [&'static str] {
    match language {
        "Python" => &["py", "pyw"],
        "JavaScript" => &["js", "mjs"],
        "TypeScript" => &["ts", "tsx"],
        "Java" => &["java"],
        "C++" => &["cpp", "cc", "cxx", "h", "hpp"],
        "C" => &["c", "h"],
        "C#" => &["cs"],
        "PHP" => &["php"],
        "Ruby" => &["rb"],
        "Go" => &["go"],
        "Rust" => &["rs"],
        "Swift" => &["swift"],
        "Kotlin" => &["kt"],
        "Scala" => &["scala"],
        "HTML" => &["html", "htm"],
        "CSS" => &["css", "scss", "sass"],
        "Shell" => &["sh", "bash"],
        "PowerShell" => &["ps1"],
        _ => &[],
    }
}

/// Derive the ingestion allow-list from a repository's language profile.
///
/// Unions the extension sets of every recognized language and adds the
/// documentation/config baseline. When no language is recognized at all,
/// falls back to a fixed general-purpose set so the allow-list is never
/// empty.
pub fn relevant_extensions<'a, I>(languages: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut extensions: BTreeSet<&str> = BTreeSet::new();
    for language in languages {
        extensions.extend(extensions_for_language(language));
    }

    if extensions.is_empty() {
        return GENERAL_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    }

    extensions.extend(BASELINE_EXTENSIONS);
    extensions.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_language_by_extension() {
        assert_eq!(detect_language("src/main.rs"), Some("rust"));
        assert_eq!(detect_language("app/models/user.rb"), Some("ruby"));
        assert_eq!(detect_language("lib/util.PY"), Some("python"));
        assert_eq!(detect_language("web/index.HTM"), Some("html"));
        assert_eq!(detect_language("include/list.h++"), Some("header"));
    }

    #[test]
    fn test_detect_language_conventional_names() {
        assert_eq!(detect_language("Dockerfile"), Some("dockerfile"));
        assert_eq!(detect_language("docker/Dockerfile"), Some("dockerfile"));
        assert_eq!(detect_language("Makefile"), Some("makefile"));
        assert_eq!(detect_language("RAKEFILE"), Some("rakefile"));
    }

    #[test]
    fn test_detect_language_unknown_is_none() {
        assert_eq!(detect_language("binary.bin"), None);
        assert_eq!(detect_language("no_extension"), None);
        assert_eq!(detect_language(""), None);
        assert_eq!(detect_language(".gitignore"), None);
    }

    #[test]
    fn test_is_eligible_case_and_dot_insensitive() {
        assert!(is_eligible("src/app.PY", &["py"]));
        assert!(is_eligible("src/app.py", &[".PY"]));
        assert!(is_eligible("a/b/c.Rs", &["md", "rs"]));
        assert!(!is_eligible("src/app.py", &["js"]));
    }

    #[test]
    fn test_is_eligible_empty_inputs() {
        let empty: &[&str] = &[];
        assert!(!is_eligible("src/app.py", empty));
        assert!(!is_eligible("", &["py"]));
        assert!(!is_eligible("no_extension", &["py"]));
    }

    #[test]
    fn test_relevant_extensions_union_with_baseline() {
        let allowed = relevant_extensions(["Python", "TypeScript"]);
        for ext in ["py", "pyw", "ts", "tsx", "json", "yaml", "yml", "md", "txt"] {
            assert!(allowed.iter().any(|a| a == ext), "missing {ext}");
        }
        assert!(!allowed.iter().any(|a| a == "rb"));
    }

    #[test]
    fn test_relevant_extensions_empty_profile_falls_back() {
        let allowed = relevant_extensions([]);
        assert!(!allowed.is_empty());
        for ext in ["py", "js", "ts", "java", "cpp", "c", "go", "rs", "md", "json"] {
            assert!(allowed.iter().any(|a| a == ext), "missing {ext}");
        }
    }

    #[test]
    fn test_relevant_extensions_unknown_language_falls_back() {
        let allowed = relevant_extensions(["Befunge"]);
        assert!(allowed.iter().any(|a| a == "py"));
        assert!(allowed.iter().any(|a| a == "rs"));
    }
}
