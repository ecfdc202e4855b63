//! Validation endpoint: re-synthesize strictly from supplied context

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use futures_util::StreamExt;

use crate::error::Result;
use crate::orchestrator::prompts;
use crate::server::auth::Identity;
use crate::server::state::AppState;
use crate::types::query::ValidateRequest;

/// POST /api/validate - plain-text token stream, no JSON envelope.
///
/// The caller supplies the exact context (typically the `context` event of a
/// previous query) and gets a concise, context-bound answer back.
pub async fn validate(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Json(request): Json<ValidateRequest>,
) -> Result<Response> {
    request.validate()?;

    tracing::info!("Validation request from {}", user_id);

    let user_message = prompts::build_user_message(&request.prompt, &request.context);
    let tokens = state
        .llm()
        .stream(prompts::VALIDATION_PROMPT, &user_message)
        .await?;

    let body = Body::from_stream(tokens.map(|token| token.map(Bytes::from)));
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response())
}
