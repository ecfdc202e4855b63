//! Application state for the query server

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::Result;
use crate::ingestion::{sparse::TermIndex, IngestPipeline, JinaReader};
use crate::orchestrator::Orchestrator;
use crate::processing::{IngestWorker, JobQueue};
use crate::providers::{
    groq::GroqClient, llm::LlmProvider, pinecone::PineconeIndex, voyage::VoyageEmbedder,
    voyage::VoyageReranker,
};
use crate::retrieval::RetrievalService;
use crate::search::web::JinaSearch;
use crate::server::auth::{IdentityProvider, TokenRegistry};
use crate::storage::{DocumentStoreProvider, HttpBucketStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    orchestrator: Arc<Orchestrator>,
    llm: Arc<dyn LlmProvider>,
    document_store: Arc<dyn DocumentStoreProvider>,
    job_queue: Arc<JobQueue>,
    identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    /// Wire providers, retrieval, the orchestrator, and the ingestion pool.
    /// Configuration has already been validated; nothing here performs IO.
    pub fn new(config: AppConfig) -> Result<Self> {
        let request_timeout = Duration::from_secs(config.orchestrator.request_timeout_secs);
        let stream_timeout = Duration::from_secs(config.orchestrator.stream_timeout_secs);
        let max_retries = config.orchestrator.max_retries;

        // One shared client; streaming requests override the deadline
        // per-request.
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .pool_max_idle_per_host(8)
            .build()
            .map_err(|e| crate::error::Error::Config(format!("HTTP client: {}", e)))?;

        let llm: Arc<dyn LlmProvider> = Arc::new(GroqClient::new(
            http.clone(),
            config.llm.clone(),
            max_retries,
            stream_timeout,
        ));
        tracing::info!("LLM provider initialized (model: {})", llm.model());

        let embedder = Arc::new(VoyageEmbedder::new(
            http.clone(),
            config.embedding.clone(),
            max_retries,
        ));
        let reranker = Arc::new(VoyageReranker::new(
            http.clone(),
            config.embedding.clone(),
            max_retries,
        ));
        let index = Arc::new(PineconeIndex::new(http.clone(), config.vector_index.clone()));

        // The term table lives exactly as long as the process; store and
        // query paths share it so sparse ids line up.
        let terms = Arc::new(TermIndex::new());

        let retrieval = Arc::new(RetrievalService::new(
            embedder,
            index,
            reranker,
            terms,
            config.vector_index.upsert_batch_size,
        ));
        tracing::info!("Retrieval service initialized");

        let web = Arc::new(JinaSearch::new(
            http.clone(),
            config.web.clone(),
            stream_timeout,
        ));

        let orchestrator = Arc::new(Orchestrator::new(
            Arc::clone(&llm),
            Arc::clone(&retrieval),
            web,
            config.orchestrator.clone(),
        ));

        let document_store = Arc::new(HttpBucketStore::new(
            http.clone(),
            config.document_store.clone(),
        ));

        let identity = Arc::new(TokenRegistry::new(&config.api_tokens));

        // Background ingestion pool.
        let worker_count = config
            .processing
            .workers
            .unwrap_or_else(|| num_cpus::get().min(4));
        let (job_queue, receiver) = JobQueue::new(config.processing.queue_capacity);
        let job_queue = Arc::new(job_queue);

        let reader = Arc::new(JinaReader::new(http, config.web.clone()));
        let pipeline = Arc::new(IngestPipeline::new(config.chunking.clone(), Arc::clone(&llm)));
        let worker = Arc::new(IngestWorker::new(
            reader,
            pipeline,
            Arc::clone(&retrieval),
            Arc::clone(&job_queue),
            worker_count,
        ));
        tokio::spawn(worker.run(receiver));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                orchestrator,
                llm,
                document_store,
                job_queue,
                identity,
            }),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn orchestrator(&self) -> &Arc<Orchestrator> {
        &self.inner.orchestrator
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm
    }

    pub fn document_store(&self) -> &Arc<dyn DocumentStoreProvider> {
        &self.inner.document_store
    }

    pub fn job_queue(&self) -> &Arc<JobQueue> {
        &self.inner.job_queue
    }

    pub fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.inner.identity
    }
}
