//! Trait seam over the AI provider exchange.

use async_trait::async_trait;

use crate::client::AnthropicClient;
use crate::error::ProviderResult;

/// Outcome of a liveness probe across the model fallback list.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub healthy: bool,
    /// The model that answered, when healthy.
    pub model: Option<String>,
    /// Models tried, in order.
    pub attempted: Vec<String>,
}

impl ProbeReport {
    pub fn healthy(model: String, attempted: Vec<String>) -> Self {
        ProbeReport {
            healthy: true,
            model: Some(model),
            attempted,
        }
    }

    pub fn unhealthy(attempted: Vec<String>) -> Self {
        ProbeReport {
            healthy: false,
            model: None,
            attempted,
        }
    }
}

/// Anything that can turn a review prompt into raw response text.
#[async_trait]
pub trait ReviewProvider: Send + Sync {
    /// Send the prompt and return the provider's raw text response.
    async fn complete(&self, prompt: &str) -> ProviderResult<String>;

    /// Liveness check; implementations should be cheap.
    async fn probe(&self) -> ProbeReport;
}

#[async_trait]
impl ReviewProvider for AnthropicClient {
    async fn complete(&self, prompt: &str) -> ProviderResult<String> {
        AnthropicClient::complete(self, prompt).await
    }

    async fn probe(&self) -> ProbeReport {
        AnthropicClient::probe(self).await
    }
}
