//! Retrieval service: hybrid embedding, tenant-scoped search, batched store

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingestion::sparse::TermIndex;
use crate::providers::{
    EmbeddingProvider, RerankProvider, UpsertRecord, VectorIndexProvider, VectorQuery,
};
use crate::types::chunk::{ChunkRecord, EnrichedChunk};

/// Matches returned when deep research is off
const TOP_K: usize = 5;
/// Matches fetched before reranking when deep research is on
const DEEP_TOP_K: usize = 10;
/// Matches kept after reranking
const RERANK_KEEP: usize = 3;

/// One retrieved chunk with its scores
#[derive(Debug, Clone)]
pub struct ScoredMatch {
    pub id: String,
    /// Hybrid similarity score from the index
    pub score: f32,
    /// Cross-encoder relevance, present when deep research reranked the set
    pub rerank_score: Option<f32>,
    pub record: ChunkRecord,
}

/// Wraps embedding, vector-store query, optional reranking, and storage
pub struct RetrievalService {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    reranker: Arc<dyn RerankProvider>,
    terms: Arc<TermIndex>,
    upsert_batch_size: usize,
}

impl RetrievalService {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        reranker: Arc<dyn RerankProvider>,
        terms: Arc<TermIndex>,
        upsert_batch_size: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            reranker,
            terms,
            upsert_batch_size,
        }
    }

    /// Dense query embedding; a supplied image switches to the multimodal model
    pub async fn embed_query(&self, text: &str, image_base64: Option<&str>) -> Result<Vec<f32>> {
        self.embedder.embed_query(text, image_base64).await
    }

    /// Order-preserving batch embedding, one vector per chunk
    pub async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let embeddings = self.embedder.embed_documents(texts).await?;
        if embeddings.len() != texts.len() {
            return Err(Error::EmbeddingMismatch {
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }
        Ok(embeddings)
    }

    /// Hybrid search scoped to one user.
    ///
    /// Deep research widens the fetch and reranks it down to the best few;
    /// rerank failure is non-fatal and falls back to the unreranked set.
    pub async fn search(
        &self,
        query: &str,
        user_id: &str,
        deep_research: bool,
    ) -> Result<Vec<ScoredMatch>> {
        let vector = self.embed_query(query, None).await?;
        let sparse = self.terms.build(query);
        let top_k = if deep_research { DEEP_TOP_K } else { TOP_K };

        let matches = self
            .index
            .query(VectorQuery {
                vector,
                sparse: Some(sparse),
                top_k,
                user_id: user_id.to_string(),
            })
            .await?;

        let mut results: Vec<ScoredMatch> = matches
            .into_iter()
            .map(|m| ScoredMatch {
                id: m.id,
                score: m.score,
                rerank_score: None,
                record: m.record,
            })
            .collect();

        if deep_research && !results.is_empty() {
            results = self.rerank_matches(query, results).await;
        }

        Ok(results)
    }

    /// Rerank fetched matches, keeping the top few. Any provider failure or
    /// an empty response leaves the original set untouched.
    async fn rerank_matches(&self, query: &str, matches: Vec<ScoredMatch>) -> Vec<ScoredMatch> {
        let documents: Vec<String> = matches.iter().map(|m| m.record.text.clone()).collect();

        let ranked = match self.reranker.rerank(query, &documents, RERANK_KEEP).await {
            Ok(ranked) if !ranked.is_empty() => ranked,
            Ok(_) => {
                tracing::warn!("Rerank returned no data, keeping original order");
                return matches;
            }
            Err(e) => {
                tracing::warn!("Rerank failed, keeping original order: {}", e);
                return matches;
            }
        };

        let mut reranked = Vec::with_capacity(RERANK_KEEP);
        for result in ranked.into_iter().take(RERANK_KEEP) {
            if let Some(m) = matches.get(result.index) {
                let mut m = m.clone();
                m.rerank_score = Some(result.relevance_score);
                reranked.push(m);
            }
        }
        reranked
    }

    /// Embed and upsert enriched chunks for one user.
    ///
    /// Upserts go out in provider-sized batches; batches are not
    /// transactional, so a failure leaves earlier batches persisted.
    /// Returns the number of chunks stored.
    pub async fn store(&self, chunks: &[EnrichedChunk], user_id: &str) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embed_documents(&texts).await?;

        let records: Vec<UpsertRecord> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, values)| UpsertRecord {
                id: Uuid::new_v4().to_string(),
                values,
                sparse: Some(self.terms.build(&chunk.text)),
                record: ChunkRecord::from_chunk(chunk, user_id),
            })
            .collect();

        let total = records.len();
        for batch in records.chunks(self.upsert_batch_size) {
            self.index.upsert(batch.to_vec()).await?;
        }

        tracing::info!(
            "Stored {} chunks for user {} via {}",
            total,
            user_id,
            self.index.name()
        );

        Ok(total)
    }

    /// Shared term table (query side must agree with the store side)
    pub fn terms(&self) -> &Arc<TermIndex> {
        &self.terms
    }
}
