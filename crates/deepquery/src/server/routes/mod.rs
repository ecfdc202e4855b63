//! API routes for the query server

pub mod documents;
pub mod jobs;
pub mod query;
pub mod validate;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Query (streaming NDJSON)
        .route("/query", post(query::run_query))
        // Validation (plain-text token stream over supplied context)
        .route("/validate", post(validate::validate))
        // Upload with background ingestion
        .route(
            "/documents/upload",
            post(documents::upload).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Ingestion job progress
        .route("/jobs/:id", get(jobs::get_job_progress))
}
