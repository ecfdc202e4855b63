//! Retrieval service behavior over mock providers

mod common;

use std::sync::Arc;

use common::{
    index_match, record, retrieval_with, MockEmbedder, MockReranker, RecordingIndex,
    RerankBehavior,
};
use deepquery::error::Error;
use deepquery::types::chunk::EnrichedChunk;

fn chunks(n: usize) -> Vec<EnrichedChunk> {
    (0..n)
        .map(|i| EnrichedChunk {
            text: format!("chunk text {}", i),
            summary: format!("summary {}", i),
            keywords: vec!["kw".to_string()],
            source_url: "https://bucket/doc.pdf".to_string(),
            chunk_number: i as u32,
        })
        .collect()
}

#[tokio::test]
async fn shallow_search_asks_for_five_and_never_reranks() {
    let index = Arc::new(RecordingIndex::with_matches(
        (0..10).map(|i| index_match(i, "alice")).collect(),
    ));
    let reranker = Arc::new(MockReranker::new(RerankBehavior::Scores(vec![(0, 0.99)])));
    let retrieval = retrieval_with(
        MockEmbedder::new(8),
        Arc::clone(&index),
        Arc::clone(&reranker),
        100,
    );

    let results = retrieval.search("query", "alice", false).await.unwrap();

    assert!(results.len() <= 5);
    assert_eq!(reranker.call_count(), 0);
    assert!(results.iter().all(|m| m.rerank_score.is_none()));

    let queries = index.queries.lock();
    assert_eq!(queries[0].top_k, 5);
}

#[tokio::test]
async fn deep_search_fetches_ten_and_keeps_the_reranked_top_three() {
    let index = Arc::new(RecordingIndex::with_matches(
        (0..10).map(|i| index_match(i, "alice")).collect(),
    ));
    let reranker = Arc::new(MockReranker::new(RerankBehavior::Scores(vec![
        (7, 0.95),
        (2, 0.80),
        (4, 0.60),
    ])));
    let retrieval = retrieval_with(
        MockEmbedder::new(8),
        Arc::clone(&index),
        Arc::clone(&reranker),
        100,
    );

    let results = retrieval.search("query", "alice", true).await.unwrap();

    assert_eq!(reranker.call_count(), 1);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].id, "chunk-7");
    assert_eq!(results[0].rerank_score, Some(0.95));
    assert!(results.iter().all(|m| m.rerank_score.is_some()));

    let queries = index.queries.lock();
    assert_eq!(queries[0].top_k, 10);
}

#[tokio::test]
async fn rerank_failure_falls_back_to_the_unreranked_set() {
    let index = Arc::new(RecordingIndex::with_matches(
        (0..10).map(|i| index_match(i, "alice")).collect(),
    ));
    let reranker = Arc::new(MockReranker::new(RerankBehavior::Fail));
    let retrieval = retrieval_with(
        MockEmbedder::new(8),
        Arc::clone(&index),
        Arc::clone(&reranker),
        100,
    );

    let results = retrieval.search("query", "alice", true).await.unwrap();

    assert_eq!(reranker.call_count(), 1);
    assert_eq!(results.len(), 10);
    assert!(results.iter().all(|m| m.rerank_score.is_none()));
}

#[tokio::test]
async fn empty_rerank_response_also_falls_back() {
    let index = Arc::new(RecordingIndex::with_matches(
        (0..10).map(|i| index_match(i, "alice")).collect(),
    ));
    let reranker = Arc::new(MockReranker::new(RerankBehavior::Empty));
    let retrieval = retrieval_with(MockEmbedder::new(8), index, Arc::clone(&reranker), 100);

    let results = retrieval.search("query", "alice", true).await.unwrap();
    assert_eq!(results.len(), 10);
}

#[tokio::test]
async fn every_query_carries_the_tenant_filter() {
    let index = Arc::new(RecordingIndex::default());
    let retrieval = retrieval_with(
        MockEmbedder::new(8),
        Arc::clone(&index),
        Arc::new(MockReranker::new(RerankBehavior::Empty)),
        100,
    );

    retrieval.search("q", "alice", false).await.unwrap();
    retrieval.search("q", "bob", true).await.unwrap();

    let queries = index.queries.lock();
    assert_eq!(queries[0].user_id, "alice");
    assert_eq!(queries[1].user_id, "bob");
}

#[tokio::test]
async fn store_batches_upserts_and_stamps_the_owner() {
    let index = Arc::new(RecordingIndex::default());
    let retrieval = retrieval_with(
        MockEmbedder::new(8),
        Arc::clone(&index),
        Arc::new(MockReranker::new(RerankBehavior::Empty)),
        100,
    );

    let stored = retrieval.store(&chunks(250), "carol").await.unwrap();
    assert_eq!(stored, 250);

    let upserts = index.upserts.lock();
    let sizes: Vec<usize> = upserts.iter().map(|batch| batch.len()).collect();
    assert_eq!(sizes, vec![100, 100, 50]);

    for batch in upserts.iter() {
        for record in batch {
            assert_eq!(record.record.user_id, "carol");
            assert!(!record.values.is_empty());
        }
    }
}

#[tokio::test]
async fn store_preserves_chunk_order_within_batches() {
    let index = Arc::new(RecordingIndex::default());
    let retrieval = retrieval_with(
        MockEmbedder::new(8),
        Arc::clone(&index),
        Arc::new(MockReranker::new(RerankBehavior::Empty)),
        100,
    );

    retrieval.store(&chunks(150), "carol").await.unwrap();

    let upserts = index.upserts.lock();
    let all: Vec<u32> = upserts
        .iter()
        .flat_map(|batch| batch.iter().map(|r| r.record.chunk_number))
        .collect();
    let expected: Vec<u32> = (0..150).collect();
    assert_eq!(all, expected);
}

#[tokio::test]
async fn embedding_count_mismatch_is_an_error() {
    let index = Arc::new(RecordingIndex::default());
    let embedder = MockEmbedder {
        dims: 8,
        short_by: 1,
    };
    let retrieval = retrieval_with(
        embedder,
        Arc::clone(&index),
        Arc::new(MockReranker::new(RerankBehavior::Empty)),
        100,
    );

    let err = retrieval.store(&chunks(3), "carol").await.unwrap_err();
    assert!(matches!(
        err,
        Error::EmbeddingMismatch {
            expected: 3,
            actual: 2
        }
    ));
    // Nothing was upserted after the mismatch.
    assert!(index.upserts.lock().is_empty());
}

#[tokio::test]
async fn storing_nothing_is_a_no_op() {
    let index = Arc::new(RecordingIndex::default());
    let retrieval = retrieval_with(
        MockEmbedder::new(8),
        Arc::clone(&index),
        Arc::new(MockReranker::new(RerankBehavior::Empty)),
        100,
    );

    let stored = retrieval.store(&[], "carol").await.unwrap();
    assert_eq!(stored, 0);
    assert!(index.upserts.lock().is_empty());
}

#[tokio::test]
async fn matches_from_the_index_keep_their_records() {
    let index = Arc::new(RecordingIndex::with_matches(vec![deepquery::providers::QueryMatch {
        id: "c1".to_string(),
        score: 0.87,
        record: record("the text", "https://bucket/d.pdf", "alice"),
    }]));
    let retrieval = retrieval_with(
        MockEmbedder::new(8),
        index,
        Arc::new(MockReranker::new(RerankBehavior::Empty)),
        100,
    );

    let results = retrieval.search("q", "alice", false).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 0.87);
    assert_eq!(results[0].record.text, "the text");
    assert_eq!(results[0].record.source_url, "https://bucket/d.pdf");
}
