//! Chunk types for the ingestion and retrieval pipeline

use serde::{Deserialize, Serialize};

/// A document chunk after enrichment, ready for embedding and storage.
/// Produced once by the ingestion pipeline and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedChunk {
    /// Raw chunk text (what gets embedded and quoted as evidence)
    pub text: String,
    /// One-sentence summary from enrichment
    pub summary: String,
    /// Up to a handful of keywords from enrichment
    pub keywords: Vec<String>,
    /// Where the parent document lives
    pub source_url: String,
    /// Position of this chunk within its document
    pub chunk_number: u32,
}

/// Metadata payload persisted alongside each vector in the index.
///
/// This is the enriched chunk plus the owning user, which the retrieval
/// service attaches at store time. `user_id` doubles as the server-side
/// tenant filter on every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRecord {
    pub text: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub source_url: String,
    pub chunk_number: u32,
    pub user_id: String,
}

impl ChunkRecord {
    /// Build the stored record from an enriched chunk and its owner
    pub fn from_chunk(chunk: &EnrichedChunk, user_id: &str) -> Self {
        Self {
            text: chunk.text.clone(),
            summary: chunk.summary.clone(),
            keywords: chunk.keywords.clone(),
            source_url: chunk.source_url.clone(),
            chunk_number: chunk.chunk_number,
            user_id: user_id.to_string(),
        }
    }
}
