//! Shared mock providers for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use deepquery::error::{Error, Result};
use deepquery::ingestion::{ContentReader, ReadDocument, TermIndex};
use deepquery::providers::{
    EmbeddingProvider, LlmProvider, QueryMatch, RerankProvider, RerankResult, TokenStream,
    UpsertRecord, VectorIndexProvider, VectorQuery,
};
use deepquery::retrieval::RetrievalService;
use deepquery::search::web::{WebSearchProvider, WebSearchResult};
use deepquery::stream::EventSink;
use deepquery::types::chunk::ChunkRecord;

/// LLM that replays canned responses
pub struct MockLlm {
    pub completion: String,
    pub tokens: Vec<String>,
    pub fail_complete: bool,
    pub completions_served: AtomicUsize,
}

impl MockLlm {
    pub fn new(completion: &str, tokens: &[&str]) -> Self {
        Self {
            completion: completion.to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            fail_complete: false,
            completions_served: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            completion: String::new(),
            tokens: Vec::new(),
            fail_complete: true,
            completions_served: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LlmProvider for MockLlm {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        if self.fail_complete {
            return Err(Error::provider("mock-llm", "completion unavailable"));
        }
        self.completions_served.fetch_add(1, Ordering::SeqCst);
        Ok(self.completion.clone())
    }

    async fn stream(&self, _system: &str, _user: &str) -> Result<TokenStream> {
        let tokens = self.tokens.clone();
        Ok(Box::pin(futures_util::stream::iter(
            tokens.into_iter().map(Ok),
        )))
    }

    fn model(&self) -> &str {
        "mock"
    }
}

/// Embedder returning fixed-size vectors; can under-deliver to trigger the
/// mismatch check
pub struct MockEmbedder {
    pub dims: usize,
    pub short_by: usize,
}

impl MockEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims, short_by: 0 }
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed_query(&self, _text: &str, _image_base64: Option<&str>) -> Result<Vec<f32>> {
        Ok(vec![0.1; self.dims])
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let count = texts.len().saturating_sub(self.short_by);
        Ok(vec![vec![0.1; self.dims]; count])
    }

    fn name(&self) -> &str {
        "mock-embedder"
    }
}

/// Index that records every query and upsert and replays canned matches
#[derive(Default)]
pub struct RecordingIndex {
    pub matches: Vec<QueryMatch>,
    pub queries: Mutex<Vec<VectorQuery>>,
    pub upserts: Mutex<Vec<Vec<UpsertRecord>>>,
}

impl RecordingIndex {
    pub fn with_matches(matches: Vec<QueryMatch>) -> Self {
        Self {
            matches,
            ..Default::default()
        }
    }
}

#[async_trait]
impl VectorIndexProvider for RecordingIndex {
    async fn query(&self, query: VectorQuery) -> Result<Vec<QueryMatch>> {
        let top_k = query.top_k;
        self.queries.lock().push(query);
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }

    async fn upsert(&self, records: Vec<UpsertRecord>) -> Result<()> {
        self.upserts.lock().push(records);
        Ok(())
    }

    fn name(&self) -> &str {
        "recording-index"
    }
}

/// Reranker with scripted behavior and a call counter
pub enum RerankBehavior {
    Scores(Vec<(usize, f32)>),
    Empty,
    Fail,
}

pub struct MockReranker {
    pub behavior: RerankBehavior,
    pub calls: AtomicUsize,
}

impl MockReranker {
    pub fn new(behavior: RerankBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RerankProvider for MockReranker {
    async fn rerank(
        &self,
        _query: &str,
        _documents: &[String],
        _top_n: usize,
    ) -> Result<Vec<RerankResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            RerankBehavior::Scores(scores) => Ok(scores
                .iter()
                .map(|&(index, relevance_score)| RerankResult {
                    index,
                    relevance_score,
                })
                .collect()),
            RerankBehavior::Empty => Ok(Vec::new()),
            RerankBehavior::Fail => Err(Error::provider("mock-rerank", "rerank unavailable")),
        }
    }

    fn name(&self) -> &str {
        "mock-rerank"
    }
}

/// Web search with canned results
pub struct MockWeb {
    pub results: Vec<WebSearchResult>,
}

#[async_trait]
impl WebSearchProvider for MockWeb {
    async fn normal_search(&self, _query: &str) -> Vec<WebSearchResult> {
        self.results.clone()
    }

    async fn deep_search(&self, _query: &str, sink: &EventSink) -> Result<()> {
        let chunks: Vec<reqwest::Result<bytes::Bytes>> =
            vec![Ok(bytes::Bytes::from("data: deep research passthrough\n"))];
        sink.forward_raw(futures_util::stream::iter(chunks)).await
    }
}

/// Content reader with canned text or a scripted failure
pub struct MockReader {
    pub content: Option<String>,
}

#[async_trait]
impl ContentReader for MockReader {
    async fn read_url(&self, url: &str) -> Result<ReadDocument> {
        match &self.content {
            Some(content) => Ok(ReadDocument {
                title: "doc".to_string(),
                content: content.clone(),
            }),
            None => Err(Error::provider("mock-reader", format!("cannot read {}", url))),
        }
    }
}

/// A stored chunk record for canned index matches
pub fn record(text: &str, source_url: &str, user_id: &str) -> ChunkRecord {
    ChunkRecord {
        text: text.to_string(),
        summary: format!("summary of {}", text),
        keywords: vec!["kw".to_string()],
        source_url: source_url.to_string(),
        chunk_number: 0,
        user_id: user_id.to_string(),
    }
}

/// A canned index match
pub fn index_match(i: usize, user_id: &str) -> QueryMatch {
    QueryMatch {
        id: format!("chunk-{}", i),
        score: 0.9 - i as f32 * 0.05,
        record: record(
            &format!("internal text {}", i),
            &format!("https://bucket/doc-{}.pdf", i),
            user_id,
        ),
    }
}

/// Retrieval service wired from the given mocks
pub fn retrieval_with(
    embedder: MockEmbedder,
    index: Arc<RecordingIndex>,
    reranker: Arc<MockReranker>,
    batch_size: usize,
) -> RetrievalService {
    RetrievalService::new(
        Arc::new(embedder),
        index,
        reranker,
        Arc::new(TermIndex::new()),
        batch_size,
    )
}
