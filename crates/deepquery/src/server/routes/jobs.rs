//! Ingestion job progress endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::processing::JobProgress;
use crate::server::auth::Identity;
use crate::server::state::AppState;

/// GET /api/jobs/:id - observe a background ingestion job
pub async fn get_job_progress(
    State(state): State<AppState>,
    Identity(_user_id): Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<JobProgress>> {
    state
        .job_queue()
        .get_progress(id)
        .map(Json)
        .ok_or_else(|| Error::NotFound(format!("job {}", id)))
}
