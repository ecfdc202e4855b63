//! Streaming query endpoint

use std::convert::Infallible;

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use futures_util::StreamExt;

use crate::error::Result;
use crate::orchestrator::QueryInput;
use crate::server::auth::Identity;
use crate::server::state::AppState;
use crate::stream::{EventSink, StreamEvent};
use crate::types::query::QueryRequest;

/// POST /api/query - run the orchestrator, streaming events as NDJSON
pub async fn run_query(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(request): Json<QueryRequest>,
) -> Result<Response> {
    request.validate()?;

    tracing::info!(
        "Query from {}: \"{}\" (deep_research: {})",
        user_id,
        request.prompt,
        request.deep_research
    );

    let input = QueryInput {
        prompt: request.prompt,
        user_id,
        deep_research: request.deep_research,
    };

    let (sink, events) = EventSink::channel(64);
    let orchestrator = state.orchestrator().clone();

    // The run outlives this handler; the response body drains the channel.
    tokio::spawn(async move {
        if let Err(e) = orchestrator.run(&input, &sink).await {
            if e.is_stream_closed() {
                tracing::debug!("Client disconnected mid-query, run cancelled");
                return;
            }
            tracing::error!("Query run failed: {}", e);
            // Failures surface on the stream itself; a truncated stream
            // without a trailing error event would be indistinguishable
            // from success.
            let _ = sink.emit(StreamEvent::Error(e.to_string())).await;
        }
    });

    let body = Body::from_stream(events.map(Ok::<_, Infallible>));
    Ok((
        [(header::CONTENT_TYPE, "application/x-ndjson")],
        body,
    )
        .into_response())
}
