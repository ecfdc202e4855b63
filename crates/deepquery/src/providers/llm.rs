//! Chat LLM provider trait

use async_trait::async_trait;
use futures_util::Stream;
use std::pin::Pin;

use crate::error::Result;

/// Token chunks as they arrive from the provider
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Chat-completion LLM with unary and token-streaming calls.
///
/// Implementations:
/// - `GroqClient`: Groq's OpenAI-compatible API
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// One-shot completion (planning, enrichment)
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Token-streaming completion (answer synthesis)
    async fn stream(&self, system: &str, user: &str) -> Result<TokenStream>;

    /// Model identifier for logging
    fn model(&self) -> &str;
}
