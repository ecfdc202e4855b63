//! Background ingestion: bounded worker pool with observable job status

pub mod job_queue;
pub mod worker;

pub use job_queue::{IngestJob, IngestStage, JobProgress, JobQueue};
pub use worker::IngestWorker;
