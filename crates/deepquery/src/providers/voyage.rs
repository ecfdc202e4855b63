//! Voyage AI clients: dense embeddings (text and multimodal) and reranking

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::rerank::{RerankProvider, RerankResult};
use super::retry_request;

/// Voyage AI embedding client
pub struct VoyageEmbedder {
    client: reqwest::Client,
    config: EmbeddingConfig,
    max_retries: u32,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    input: &'a [String],
    model: &'a str,
    input_type: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    data: Vec<EmbedDatum>,
}

#[derive(Deserialize)]
struct EmbedDatum {
    embedding: Vec<f32>,
}

impl VoyageEmbedder {
    pub fn new(client: reqwest::Client, config: EmbeddingConfig, max_retries: u32) -> Self {
        Self {
            client,
            config,
            max_retries,
        }
    }

    async fn embed_texts(&self, texts: &[String], input_type: &str) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/v1/embeddings", self.config.base_url);

        let response = retry_request(self.max_retries, "voyage embeddings", || async {
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&EmbedRequest {
                    input: texts,
                    model: &self.config.text_model,
                    input_type,
                })
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Error::provider(
                    "voyage",
                    format!("embeddings returned HTTP {}", response.status()),
                ));
            }

            let body: EmbedResponse = response
                .json()
                .await
                .map_err(|e| Error::provider("voyage", format!("malformed response: {}", e)))?;
            Ok(body)
        })
        .await?;

        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }

    async fn embed_multimodal(&self, text: &str, image_base64: &str) -> Result<Vec<f32>> {
        let url = format!("{}/v1/multimodalembeddings", self.config.base_url);
        let payload = json!({
            "inputs": [{
                "content": [
                    { "type": "text", "text": text },
                    { "type": "image_base64", "image_base64": image_base64 },
                ],
            }],
            "model": self.config.multimodal_model,
            "input_type": "query",
        });

        let response = retry_request(self.max_retries, "voyage multimodal", || async {
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&payload)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Error::provider(
                    "voyage",
                    format!("multimodal embeddings returned HTTP {}", response.status()),
                ));
            }

            let body: EmbedResponse = response
                .json()
                .await
                .map_err(|e| Error::provider("voyage", format!("malformed response: {}", e)))?;
            Ok(body)
        })
        .await?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| Error::embedding("provider returned no multimodal vector"))
    }
}

#[async_trait]
impl EmbeddingProvider for VoyageEmbedder {
    async fn embed_query(&self, text: &str, image_base64: Option<&str>) -> Result<Vec<f32>> {
        if let Some(image) = image_base64 {
            return self.embed_multimodal(text, image).await;
        }

        let vectors = self.embed_texts(&[text.to_string()], "query").await?;
        vectors
            .into_iter()
            .next()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::embedding("provider returned no query vector"))
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.embed_texts(texts, "document").await
    }

    fn name(&self) -> &str {
        "voyage"
    }
}

/// Voyage AI rerank client
pub struct VoyageReranker {
    client: reqwest::Client,
    config: EmbeddingConfig,
    max_retries: u32,
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    query: &'a str,
    documents: &'a [String],
    model: &'a str,
    top_k: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
    #[serde(default)]
    data: Vec<RerankDatum>,
}

#[derive(Deserialize)]
struct RerankDatum {
    index: usize,
    relevance_score: f32,
}

impl VoyageReranker {
    pub fn new(client: reqwest::Client, config: EmbeddingConfig, max_retries: u32) -> Self {
        Self {
            client,
            config,
            max_retries,
        }
    }
}

#[async_trait]
impl RerankProvider for VoyageReranker {
    async fn rerank(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> Result<Vec<RerankResult>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/rerank", self.config.base_url);

        let response = retry_request(self.max_retries, "voyage rerank", || async {
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&RerankRequest {
                    query,
                    documents,
                    model: &self.config.rerank_model,
                    top_k: top_n,
                })
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Error::provider(
                    "voyage",
                    format!("rerank returned HTTP {}", response.status()),
                ));
            }

            let body: RerankResponse = response
                .json()
                .await
                .map_err(|e| Error::provider("voyage", format!("malformed response: {}", e)))?;
            Ok(body)
        })
        .await?;

        Ok(response
            .data
            .into_iter()
            .map(|d| RerankResult {
                index: d.index,
                relevance_score: d.relevance_score,
            })
            .collect())
    }

    fn name(&self) -> &str {
        "voyage"
    }
}
