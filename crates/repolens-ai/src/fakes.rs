//! In-memory fakes for the provider seam (testing only).

use async_trait::async_trait;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ProbeReport, ReviewProvider};

/// Returns a canned response for every prompt.
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    response: String,
}

impl ScriptedProvider {
    pub fn new(response: impl Into<String>) -> Self {
        ScriptedProvider {
            response: response.into(),
        }
    }
}

#[async_trait]
impl ReviewProvider for ScriptedProvider {
    async fn complete(&self, _prompt: &str) -> ProviderResult<String> {
        Ok(self.response.clone())
    }

    async fn probe(&self) -> ProbeReport {
        ProbeReport::healthy("scripted".to_string(), vec!["scripted".to_string()])
    }
}

/// Fails every exchange with the error produced by the supplied
/// constructor.
#[derive(Debug, Clone)]
pub struct FailingProvider {
    make: fn() -> ProviderError,
}

impl FailingProvider {
    pub fn new(make: fn() -> ProviderError) -> Self {
        FailingProvider { make }
    }
}

impl Default for FailingProvider {
    fn default() -> Self {
        FailingProvider {
            make: || ProviderError::Network("scripted transport failure".to_string()),
        }
    }
}

#[async_trait]
impl ReviewProvider for FailingProvider {
    async fn complete(&self, _prompt: &str) -> ProviderResult<String> {
        Err((self.make)())
    }

    async fn probe(&self) -> ProbeReport {
        ProbeReport::unhealthy(vec!["scripted".to_string()])
    }
}
