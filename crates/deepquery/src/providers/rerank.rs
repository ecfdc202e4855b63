//! Rerank provider trait

use async_trait::async_trait;

use crate::error::Result;

/// One reranked document: position in the submitted list plus its score
#[derive(Debug, Clone, PartialEq)]
pub struct RerankResult {
    /// Index into the submitted documents slice
    pub index: usize,
    /// Cross-encoder relevance score
    pub relevance_score: f32,
}

/// Secondary relevance scoring over an initial retrieval set.
///
/// Implementations:
/// - `VoyageReranker`: Voyage AI rerank-2
#[async_trait]
pub trait RerankProvider: Send + Sync {
    /// Score documents against the query, best first, at most `top_n`
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RerankResult>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
