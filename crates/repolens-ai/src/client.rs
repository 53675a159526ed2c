//! Anthropic-style Messages API client.
//!
//! One completion call per analysis: send the prompt, take the first
//! content block of the response as the raw review text. The liveness
//! probe walks an ordered model fallback list with a minimal request.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::ProbeReport;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Default model fallback order, cheapest first. Overridable via the
/// `REPOLENS_MODELS` environment variable.
const DEFAULT_MODELS: &[&str] = &[
    "claude-3-5-haiku-20241022",
    "claude-3-haiku-20240307",
    "claude-3-5-sonnet-20241022",
    "claude-sonnet-4-20250514",
];

/// Provider configuration.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// API key (`CLAUDE_API_KEY`).
    pub api_key: String,
    /// API base URL.
    pub base_url: String,
    /// Model used for completions; first entry of the fallback list.
    pub model: String,
    /// Output token budget per completion.
    pub max_tokens: u32,
    /// Ordered model list for the liveness probe.
    pub fallback_models: Vec<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let fallback_models = std::env::var("REPOLENS_MODELS")
            .ok()
            .map(|raw| parse_model_list(&raw))
            .filter(|models| !models.is_empty())
            .unwrap_or_else(|| DEFAULT_MODELS.iter().map(|m| m.to_string()).collect());
        let model = fallback_models[0].clone();
        ProviderConfig {
            api_key: std::env::var("CLAUDE_API_KEY").unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            fallback_models,
        }
    }
}

impl ProviderConfig {
    /// Create a config from environment variables (`CLAUDE_API_KEY`,
    /// `REPOLENS_MODELS`).
    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Cheap structural check on the key, used before spending a probe
    /// request on it.
    pub fn key_looks_valid(&self) -> bool {
        self.api_key.starts_with("sk-ant-") && self.api_key.len() > 20
    }
}

/// Parse a comma-separated model list.
pub(crate) fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

/// Messages API client.
pub struct AnthropicClient {
    config: ProviderConfig,
    http: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(config: ProviderConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("repolens/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");
        AnthropicClient { config, http }
    }

    pub fn from_env() -> Self {
        Self::new(ProviderConfig::from_env())
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    async fn post_messages(
        &self,
        model: &str,
        max_tokens: u32,
        content: &str,
        timeout: Duration,
    ) -> ProviderResult<reqwest::Response> {
        let request = MessagesRequest {
            model,
            max_tokens,
            messages: vec![Message {
                role: "user",
                content,
            }],
        };
        let resp = self
            .http
            .post(self.messages_url())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .timeout(timeout)
            .send()
            .await?;
        match resp.status().as_u16() {
            200..=299 => Ok(resp),
            401 => Err(ProviderError::AuthFailure),
            429 => Err(ProviderError::RateLimited),
            400 => Err(ProviderError::MalformedRequest),
            status => Err(ProviderError::Api(status)),
        }
    }

    /// Send a prompt, return the raw text of the first content block.
    pub async fn complete(&self, prompt: &str) -> ProviderResult<String> {
        debug!(model = %self.config.model, prompt_chars = prompt.len(), "requesting completion");
        let resp = self
            .post_messages(
                &self.config.model,
                self.config.max_tokens,
                prompt,
                COMPLETION_TIMEOUT,
            )
            .await?;
        let body: MessagesResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        match body.content.first() {
            Some(block) => Ok(block.text.clone()),
            None => Err(ProviderError::EmptyResponse),
        }
    }

    /// Exercise the provider with a minimal request across the fallback
    /// model list; healthy on the first success.
    pub async fn probe(&self) -> ProbeReport {
        if !self.config.key_looks_valid() {
            warn!("provider API key is missing or malformed, skipping probe");
            return ProbeReport::unhealthy(Vec::new());
        }

        let mut attempted = Vec::new();
        for model in &self.config.fallback_models {
            attempted.push(model.clone());
            match self.post_messages(model, 10, "Hi", PROBE_TIMEOUT).await {
                Ok(_) => {
                    info!(%model, "provider probe succeeded");
                    return ProbeReport::healthy(model.clone(), attempted);
                }
                Err(err) => {
                    debug!(%model, error = %err, "provider probe attempt failed");
                }
            }
        }
        warn!("all provider probe attempts failed");
        ProbeReport::unhealthy(attempted)
    }
}
