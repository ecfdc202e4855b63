//! Ingestion worker pool

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};

use crate::error::Result;
use crate::ingestion::{ContentReader, IngestPipeline};
use crate::processing::job_queue::{IngestJob, IngestStage, JobQueue};
use crate::retrieval::RetrievalService;

/// Consumes ingestion jobs with bounded parallelism
pub struct IngestWorker {
    reader: Arc<dyn ContentReader>,
    pipeline: Arc<IngestPipeline>,
    retrieval: Arc<RetrievalService>,
    queue: Arc<JobQueue>,
    workers: usize,
}

impl IngestWorker {
    pub fn new(
        reader: Arc<dyn ContentReader>,
        pipeline: Arc<IngestPipeline>,
        retrieval: Arc<RetrievalService>,
        queue: Arc<JobQueue>,
        workers: usize,
    ) -> Self {
        Self {
            reader,
            pipeline,
            retrieval,
            queue,
            workers: workers.max(1),
        }
    }

    /// Drain the job channel until the queue side is dropped
    pub async fn run(self: Arc<Self>, mut receiver: mpsc::Receiver<IngestJob>) {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        tracing::info!("Ingestion worker pool started ({} workers)", self.workers);

        while let Some(job) = receiver.recv().await {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break,
            };

            let worker = Arc::clone(&self);
            tokio::spawn(async move {
                let job_id = job.id;
                if let Err(e) = worker.process(job).await {
                    tracing::error!("Ingestion job {} failed: {}", job_id, e);
                    worker.queue.fail(job_id, e.to_string());
                }
                drop(permit);
            });
        }

        tracing::info!("Ingestion worker pool stopped");
    }

    async fn process(&self, job: IngestJob) -> Result<()> {
        tracing::info!("Ingesting '{}' for user {}", job.title, job.user_id);

        self.queue.update_stage(job.id, IngestStage::Fetching);
        let document = self.reader.read_url(&job.file_url).await?;

        // Chunking and enrichment happen together in the pipeline; the
        // stage markers bracket the whole phase for observers.
        self.queue.update_stage(job.id, IngestStage::Chunking);
        self.queue.update_stage(job.id, IngestStage::Enriching);
        let chunks = self
            .pipeline
            .enrich_document(&document.content, &job.file_url)
            .await?;

        self.queue.update_stage(job.id, IngestStage::Embedding);
        self.queue.update_stage(job.id, IngestStage::Storing);
        let stored = self.retrieval.store(&chunks, &job.user_id).await?;

        self.queue.complete(job.id, stored);
        tracing::info!(
            "Ingested '{}': {} chunks stored for user {}",
            job.title,
            stored,
            job.user_id
        );

        Ok(())
    }
}
