//! Process configuration, read once at startup and handed to components
//! explicitly. No ambient or global state.

use repolens_ai::ProviderConfig;
use repolens_github::GithubConfig;
use thiserror::Error;
use tracing::warn;

/// Startup configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("CLAUDE_API_KEY environment variable is not set")]
    MissingApiKey,
}

/// Aggregated configuration for one process.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github: GithubConfig,
    pub provider: ProviderConfig,
}

impl AppConfig {
    /// Read configuration from the environment (`CLAUDE_API_KEY`,
    /// `GITHUB_TOKEN`, `REPOLENS_MODELS`).
    pub fn from_env() -> Self {
        AppConfig {
            github: GithubConfig::from_env(),
            provider: ProviderConfig::from_env(),
        }
    }

    /// Validate startup requirements. The provider key is required; a
    /// missing GitHub token only lowers rate limits.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.provider.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if !looks_like_provider_key(&self.provider.api_key) {
            warn!("CLAUDE_API_KEY does not look like a provider key");
        }
        match &self.github.token {
            None => warn!("GITHUB_TOKEN not set, GitHub API rate limits will be lower"),
            Some(token) if !looks_like_github_token(token) => {
                warn!("GITHUB_TOKEN does not look like a GitHub token")
            }
            Some(_) => {}
        }
        Ok(())
    }
}

/// Provider keys start with `sk-ant-` and are long.
pub fn looks_like_provider_key(key: &str) -> bool {
    key.starts_with("sk-ant-") && key.len() > 20
}

/// Modern GitHub tokens carry a known prefix; classic ones are 40 hex
/// characters.
pub fn looks_like_github_token(token: &str) -> bool {
    const PREFIXES: [&str; 5] = ["ghp_", "gho_", "ghu_", "ghs_", "ghr_"];
    if PREFIXES.iter().any(|p| token.starts_with(p)) {
        return token.len() >= 36;
    }
    token.len() == 40 && token.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_key_format() {
        assert!(looks_like_provider_key("sk-ant-0123456789abcdefgh"));
        assert!(!looks_like_provider_key("sk-ant-short"));
        assert!(!looks_like_provider_key("sk-other-0123456789abcdef"));
    }

    #[test]
    fn test_github_token_format() {
        assert!(looks_like_github_token(&format!("ghp_{}", "a".repeat(36))));
        assert!(!looks_like_github_token("ghp_tooshort"));
        assert!(looks_like_github_token(&"0123456789abcdef0123456789abcdef01234567".to_string()));
        assert!(!looks_like_github_token("0123456789abcdef"));
        assert!(!looks_like_github_token(&"z".repeat(40)));
    }

    #[test]
    fn test_validate_requires_api_key() {
        let config = AppConfig {
            github: GithubConfig::default(),
            provider: ProviderConfig::default().with_api_key(""),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingApiKey)
        ));

        let config = AppConfig {
            github: GithubConfig::default(),
            provider: ProviderConfig::default().with_api_key("sk-ant-0123456789abcdefgh"),
        };
        assert!(config.validate().is_ok());
    }
}
