//! Vector index provider trait with typed hybrid query and upsert shapes

use async_trait::async_trait;

use crate::error::Result;
use crate::ingestion::sparse::SparseVector;
use crate::types::chunk::ChunkRecord;

/// A hybrid (dense + sparse) similarity query, always tenant-scoped
#[derive(Debug, Clone)]
pub struct VectorQuery {
    pub vector: Vec<f32>,
    pub sparse: Option<SparseVector>,
    pub top_k: usize,
    /// Server-side metadata filter; results never cross tenants
    pub user_id: String,
}

/// One scored match from the index
#[derive(Debug, Clone)]
pub struct QueryMatch {
    pub id: String,
    pub score: f32,
    pub record: ChunkRecord,
}

/// One record to persist
#[derive(Debug, Clone)]
pub struct UpsertRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub sparse: Option<SparseVector>,
    pub record: ChunkRecord,
}

/// Dense+sparse vector index with metadata filtering and batch upsert.
///
/// Implementations:
/// - `PineconeIndex`: Pinecone serverless index over HTTP
#[async_trait]
pub trait VectorIndexProvider: Send + Sync {
    /// Query the index; the `user_id` filter is applied by the provider,
    /// never client-side
    async fn query(&self, query: VectorQuery) -> Result<Vec<QueryMatch>>;

    /// Upsert a single batch. Callers split into provider-sized batches.
    async fn upsert(&self, records: Vec<UpsertRecord>) -> Result<()>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
