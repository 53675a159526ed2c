//! AI provider boundary for Repolens.
//!
//! Wraps the provider's Messages API behind a small trait: send prompt
//! text, receive raw response text, or fail within a fixed error
//! taxonomy. Also hosts the liveness probe that walks an ordered,
//! configurable model fallback list.

pub mod client;
pub mod error;
pub mod fakes;
pub mod provider;

pub use client::{AnthropicClient, ProviderConfig};
pub use error::{ProviderError, ProviderResult};
pub use provider::{ProbeReport, ReviewProvider};
