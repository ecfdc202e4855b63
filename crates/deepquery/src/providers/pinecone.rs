//! Pinecone serverless index client (hybrid dense+sparse, metadata-filtered)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::VectorIndexConfig;
use crate::error::{Error, Result};
use crate::ingestion::sparse::SparseVector;
use crate::types::chunk::ChunkRecord;

use super::vector_store::{QueryMatch, UpsertRecord, VectorIndexProvider, VectorQuery};

/// Pinecone HTTP client for a single index
pub struct PineconeIndex {
    client: reqwest::Client,
    config: VectorIndexConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireSparse {
    indices: Vec<u32>,
    values: Vec<f32>,
}

impl From<&SparseVector> for WireSparse {
    fn from(sparse: &SparseVector) -> Self {
        Self {
            indices: sparse.indices.clone(),
            // Pinecone expects float sparse values; counts widen losslessly.
            values: sparse.values.iter().map(|&v| v as f32).collect(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireVector {
    id: String,
    values: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sparse_values: Option<WireSparse>,
    metadata: ChunkRecord,
}

#[derive(Serialize)]
struct UpsertBody {
    vectors: Vec<WireVector>,
}

#[derive(Deserialize)]
struct QueryBody {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Deserialize)]
struct WireMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<ChunkRecord>,
}

impl PineconeIndex {
    pub fn new(client: reqwest::Client, config: VectorIndexConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl VectorIndexProvider for PineconeIndex {
    async fn query(&self, query: VectorQuery) -> Result<Vec<QueryMatch>> {
        let url = format!("{}/query", self.config.index_host);

        let mut body = json!({
            "vector": query.vector,
            "topK": query.top_k,
            "includeMetadata": true,
            // Tenant isolation is enforced here, on the provider side;
            // results for other users never reach this process.
            "filter": { "userId": { "$eq": query.user_id } },
        });
        if let Some(sparse) = &query.sparse {
            if !sparse.is_empty() {
                body["sparseVector"] = serde_json::to_value(WireSparse::from(sparse))?;
            }
        }

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::provider(
                "pinecone",
                format!("query returned HTTP {}", response.status()),
            ));
        }

        let body: QueryBody = response
            .json()
            .await
            .map_err(|e| Error::provider("pinecone", format!("malformed response: {}", e)))?;

        let matches = body
            .matches
            .into_iter()
            .filter_map(|m| {
                let record = m.metadata?;
                Some(QueryMatch {
                    id: m.id,
                    score: m.score,
                    record,
                })
            })
            .collect();

        Ok(matches)
    }

    async fn upsert(&self, records: Vec<UpsertRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let url = format!("{}/vectors/upsert", self.config.index_host);
        let vectors = records
            .into_iter()
            .map(|r| WireVector {
                id: r.id,
                values: r.values,
                sparse_values: r.sparse.as_ref().filter(|s| !s.is_empty()).map(WireSparse::from),
                metadata: r.record,
            })
            .collect();

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.config.api_key)
            .json(&UpsertBody { vectors })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::provider(
                "pinecone",
                format!("upsert returned HTTP {}", response.status()),
            ));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "pinecone"
    }
}
