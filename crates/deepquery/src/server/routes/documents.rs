//! Document upload with fire-and-forget ingestion

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::error::{Error, Result};
use crate::processing::IngestJob;
use crate::server::auth::Identity;
use crate::server::state::AppState;
use crate::types::query::UploadResponse;

/// POST /api/documents/upload - store the file, kick off ingestion, return.
///
/// The response confirms only that the object store accepted the file; the
/// ingestion job runs in the background and reports through `/api/jobs/:id`.
pub async fn upload(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut upload: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.bin".to_string());
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("failed to read file: {}", e)))?;

        upload = Some((filename, content_type, data.to_vec()));
        break;
    }

    let (filename, content_type, data) =
        upload.ok_or_else(|| Error::Validation("missing 'file' field".to_string()))?;

    if data.is_empty() {
        return Err(Error::Validation("uploaded file is empty".to_string()));
    }

    tracing::info!(
        "Upload from {}: {} ({} bytes)",
        user_id,
        filename,
        data.len()
    );

    let file_url = state
        .document_store()
        .store_file(&filename, data, &content_type)
        .await?;

    // Ingestion is fire-and-forget relative to this response; its outcome
    // lands on the job record.
    let job = IngestJob::new(&user_id, &file_url, &filename);
    let job_id = state.job_queue().submit(job).await;

    Ok(Json(UploadResponse {
        message: "File upload successful. Ingestion has started in the background.".to_string(),
        file_url,
        job_id,
    }))
}
