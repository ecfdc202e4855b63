//! Provider abstractions for embeddings, rerank, vector search, and the LLM
//!
//! Trait seams keep the orchestrator and retrieval logic independent of
//! provider SDK shapes; concrete clients live next to their traits.

pub mod embedding;
pub mod groq;
pub mod llm;
pub mod pinecone;
pub mod rerank;
pub mod vector_store;
pub mod voyage;

pub use embedding::EmbeddingProvider;
pub use llm::{LlmProvider, TokenStream};
pub use rerank::{RerankProvider, RerankResult};
pub use vector_store::{QueryMatch, UpsertRecord, VectorIndexProvider, VectorQuery};

use std::time::Duration;
use tokio::time::sleep;

use crate::error::Result;

/// Retry an idempotent provider call with exponential backoff.
///
/// Used only for unary reads (embedding, rerank, one-shot completion);
/// upserts and token streams are never retried automatically.
pub(crate) async fn retry_request<F, Fut, T>(
    max_retries: u32,
    label: &str,
    operation: F,
) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut last_error = None;

    for attempt in 0..=max_retries {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                last_error = Some(e);
                if attempt < max_retries {
                    let delay = Duration::from_secs(2u64.pow(attempt));
                    tracing::warn!(
                        "{} failed (attempt {}/{}), retrying in {:?}",
                        label,
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    sleep(delay).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| crate::error::Error::internal("retry with no attempts")))
}
