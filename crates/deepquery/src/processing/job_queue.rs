//! Job queue for background document ingestion
//!
//! Jobs are fire-and-forget from the uploader's point of view; their fate is
//! observable through the progress registry instead of the HTTP response.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Ingestion stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IngestStage {
    Queued,
    Fetching,
    Chunking,
    Enriching,
    Embedding,
    Storing,
    Complete,
    Failed,
}

/// One document to ingest
#[derive(Debug, Clone)]
pub struct IngestJob {
    pub id: Uuid,
    pub user_id: String,
    /// Public URL of the stored file, readable by the content reader
    pub file_url: String,
    pub title: String,
}

impl IngestJob {
    pub fn new(user_id: impl Into<String>, file_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            file_url: file_url.into(),
            title: title.into(),
        }
    }
}

/// Observable progress for one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobProgress {
    pub job_id: Uuid,
    pub stage: IngestStage,
    pub chunks_stored: usize,
    pub error: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl JobProgress {
    fn new(job_id: Uuid) -> Self {
        let now = chrono::Utc::now();
        Self {
            job_id,
            stage: IngestStage::Queued,
            chunks_stored: 0,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Bounded queue feeding the ingestion workers
pub struct JobQueue {
    jobs: Arc<DashMap<Uuid, JobProgress>>,
    sender: mpsc::Sender<IngestJob>,
}

impl JobQueue {
    /// Create the queue and the receiver handed to the worker pool
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<IngestJob>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (
            Self {
                jobs: Arc::new(DashMap::new()),
                sender,
            },
            receiver,
        )
    }

    /// Submit a job. The caller gets the id back immediately; failures after
    /// this point land in the progress registry, not on the submitter.
    pub async fn submit(&self, job: IngestJob) -> Uuid {
        let job_id = job.id;
        self.jobs.insert(job_id, JobProgress::new(job_id));

        if let Err(e) = self.sender.send(job).await {
            tracing::error!("Failed to enqueue ingestion job {}: {}", job_id, e);
            self.fail(job_id, "queue unavailable");
        }

        job_id
    }

    /// Progress for one job
    pub fn get_progress(&self, job_id: Uuid) -> Option<JobProgress> {
        self.jobs.get(&job_id).map(|p| p.clone())
    }

    /// Move a job to a new stage
    pub fn update_stage(&self, job_id: Uuid, stage: IngestStage) {
        if let Some(mut progress) = self.jobs.get_mut(&job_id) {
            progress.stage = stage;
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Mark a job complete with its chunk count
    pub fn complete(&self, job_id: Uuid, chunks_stored: usize) {
        if let Some(mut progress) = self.jobs.get_mut(&job_id) {
            progress.stage = IngestStage::Complete;
            progress.chunks_stored = chunks_stored;
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Mark a job failed; the error string is the job's reporting channel
    pub fn fail(&self, job_id: Uuid, error: impl Into<String>) {
        if let Some(mut progress) = self.jobs.get_mut(&job_id) {
            progress.stage = IngestStage::Failed;
            progress.error = Some(error.into());
            progress.updated_at = chrono::Utc::now();
        }
    }
}
