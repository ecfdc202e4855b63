//! Document ingestion: fetch extracted text, chunk, enrich, hand to retrieval

pub mod chunker;
pub mod sparse;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{ChunkingConfig, WebConfig};
use crate::error::{Error, Result};
use crate::providers::llm::LlmProvider;
use crate::types::chunk::EnrichedChunk;

pub use chunker::chunk_text;
pub use sparse::{SparseVector, TermIndex};

/// Extracted document content from the reader service
#[derive(Debug, Clone)]
pub struct ReadDocument {
    pub title: String,
    pub content: String,
}

/// URL -> extracted plain text. External collaborator with a narrow contract.
#[async_trait]
pub trait ContentReader: Send + Sync {
    async fn read_url(&self, url: &str) -> Result<ReadDocument>;
}

/// Jina Reader client (`r.jina.ai`)
pub struct JinaReader {
    client: reqwest::Client,
    config: WebConfig,
}

#[derive(Serialize)]
struct ReaderRequest<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ReaderResponse {
    data: ReaderResult,
}

#[derive(Deserialize)]
struct ReaderResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

impl JinaReader {
    pub fn new(client: reqwest::Client, config: WebConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ContentReader for JinaReader {
    async fn read_url(&self, url: &str) -> Result<ReadDocument> {
        let response = self
            .client
            .post(&self.config.reader_url)
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .json(&ReaderRequest { url })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::provider(
                "reader",
                format!("HTTP {} for {}", response.status(), url),
            ));
        }

        let body: ReaderResponse = response
            .json()
            .await
            .map_err(|e| Error::provider("reader", format!("malformed response: {}", e)))?;

        if body.data.content.is_empty() {
            return Err(Error::provider(
                "reader",
                format!("no content extracted from {}", url),
            ));
        }

        Ok(ReadDocument {
            title: body.data.title,
            content: body.data.content,
        })
    }
}

const ENRICHMENT_PROMPT: &str = "\
You annotate document excerpts for a search index. Given an excerpt, answer \
with ONLY a JSON object of the form \
{\"summary\": \"<one sentence>\", \"keywords\": [\"k1\", \"k2\"]} \
with at most 5 keywords. No commentary.";

#[derive(Deserialize)]
struct EnrichmentResponse {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Chunk a document and annotate each chunk with a summary and keywords.
pub struct IngestPipeline {
    chunking: ChunkingConfig,
    llm: Arc<dyn LlmProvider>,
}

impl IngestPipeline {
    pub fn new(chunking: ChunkingConfig, llm: Arc<dyn LlmProvider>) -> Self {
        Self { chunking, llm }
    }

    /// Produce enriched chunks for one document.
    ///
    /// Enrichment is best-effort: a failed or malformed annotation falls
    /// back to a text-prefix summary rather than failing the document.
    pub async fn enrich_document(
        &self,
        content: &str,
        source_url: &str,
    ) -> Result<Vec<EnrichedChunk>> {
        let pieces = chunk_text(content, &self.chunking)?;
        let mut chunks = Vec::with_capacity(pieces.len());

        for (i, text) in pieces.into_iter().enumerate() {
            let (summary, keywords) = match self.annotate(&text).await {
                Ok(annotation) => annotation,
                Err(e) => {
                    tracing::warn!("Enrichment failed for chunk {} of {}: {}", i, source_url, e);
                    (fallback_summary(&text), Vec::new())
                }
            };

            chunks.push(EnrichedChunk {
                text,
                summary,
                keywords,
                source_url: source_url.to_string(),
                chunk_number: i as u32,
            });
        }

        Ok(chunks)
    }

    async fn annotate(&self, text: &str) -> Result<(String, Vec<String>)> {
        let raw = self.llm.complete(ENRICHMENT_PROMPT, text).await?;
        let parsed = parse_enrichment(&raw)
            .ok_or_else(|| Error::provider("llm", "unparseable enrichment response"))?;
        let summary = if parsed.summary.is_empty() {
            fallback_summary(text)
        } else {
            parsed.summary
        };
        let mut keywords = parsed.keywords;
        keywords.truncate(5);
        Ok((summary, keywords))
    }
}

/// Pull the JSON object out of the model response, tolerating prose padding
fn parse_enrichment(raw: &str) -> Option<EnrichmentResponse> {
    if let Ok(parsed) = serde_json::from_str::<EnrichmentResponse>(raw) {
        return Some(parsed);
    }
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    serde_json::from_str(&raw[start..=end]).ok()
}

fn fallback_summary(text: &str) -> String {
    let prefix: String = text.chars().take(200).collect();
    if text.chars().count() > 200 {
        format!("{}...", prefix)
    } else {
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrichment_parses_plain_json() {
        let parsed = parse_enrichment(r#"{"summary":"About cats.","keywords":["cats"]}"#).unwrap();
        assert_eq!(parsed.summary, "About cats.");
        assert_eq!(parsed.keywords, vec!["cats"]);
    }

    #[test]
    fn enrichment_tolerates_surrounding_prose() {
        let raw = "Sure! Here you go: {\"summary\":\"S\",\"keywords\":[]} Hope that helps.";
        let parsed = parse_enrichment(raw).unwrap();
        assert_eq!(parsed.summary, "S");
    }

    #[test]
    fn unparseable_enrichment_is_none() {
        assert!(parse_enrichment("no json here").is_none());
    }

    #[test]
    fn fallback_summary_truncates_long_text() {
        let text = "x".repeat(500);
        let summary = fallback_summary(&text);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), 203);
    }
}
