//! Configuration for the query service
//!
//! Tunables come from an optional TOML file (`DEEPQUERY_CONFIG`); provider
//! credentials come from the environment and are validated at startup so a
//! misconfigured process fails fast instead of at first request.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Orchestrator configuration
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Background ingestion configuration
    #[serde(default)]
    pub processing: ProcessingConfig,
    /// Embedding provider (Voyage AI)
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    /// Vector index (Pinecone)
    #[serde(default)]
    pub vector_index: VectorIndexConfig,
    /// Chat LLM (Groq)
    #[serde(default)]
    pub llm: LlmConfig,
    /// Web search and content reader (Jina)
    #[serde(default)]
    pub web: WebConfig,
    /// Object store for uploaded files
    #[serde(default)]
    pub document_store: DocumentStoreConfig,
    /// Bearer token -> user id pairs, `token:user` comma-separated in env
    #[serde(default)]
    pub api_tokens: Vec<TokenEntry>,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 25MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 25 * 1024 * 1024,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in characters
    pub chunk_size: usize,
    /// Overlap between windows in characters (must stay below chunk_size)
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            chunk_overlap: 200,
        }
    }
}

/// Orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Delay between plan event emissions in milliseconds (UX pacing)
    pub plan_delay_ms: u64,
    /// Deadline for unary provider calls in seconds
    pub request_timeout_secs: u64,
    /// Deadline for streaming provider calls in seconds
    pub stream_timeout_secs: u64,
    /// Retries for idempotent unary provider reads
    pub max_retries: u32,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            plan_delay_ms: 200,
            request_timeout_secs: 30,
            stream_timeout_secs: 300,
            max_retries: 2,
        }
    }
}

/// Background ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Number of parallel ingestion workers (default: min(cpus, 4))
    pub workers: Option<usize>,
    /// Job queue capacity
    pub queue_capacity: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            workers: None,
            queue_capacity: 64,
        }
    }
}

/// Embedding provider configuration (Voyage AI)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// API base URL
    pub base_url: String,
    /// Text embedding model
    pub text_model: String,
    /// Multimodal embedding model (used when a query carries an image)
    pub multimodal_model: String,
    /// Rerank model
    pub rerank_model: String,
    /// API key (from VOYAGE_API_KEY)
    #[serde(skip)]
    pub api_key: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.voyageai.com".to_string(),
            text_model: "voyage-2".to_string(),
            multimodal_model: "voyage-multimodal-3".to_string(),
            rerank_model: "rerank-2".to_string(),
            api_key: String::new(),
        }
    }
}

/// Vector index configuration (Pinecone serverless index)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndexConfig {
    /// Index host URL, e.g. "https://my-index-abc123.svc.us-east-1.pinecone.io"
    /// (from PINECONE_INDEX_HOST)
    #[serde(skip)]
    pub index_host: String,
    /// API key (from PINECONE_API_KEY)
    #[serde(skip)]
    pub api_key: String,
    /// Upsert batch size (provider limit hiding)
    pub upsert_batch_size: usize,
}

impl Default for VectorIndexConfig {
    fn default() -> Self {
        Self {
            index_host: String::new(),
            api_key: String::new(),
            upsert_batch_size: 100,
        }
    }
}

/// Chat LLM configuration (Groq, OpenAI-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API base URL
    pub base_url: String,
    /// Model used for planning, enrichment, and synthesis
    pub model: String,
    /// API key (from GROQ_API_KEY)
    #[serde(skip)]
    pub api_key: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai".to_string(),
            model: "llama3-8b-8192".to_string(),
            api_key: String::new(),
        }
    }
}

/// Web search and content reader configuration (Jina)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// Search endpoint
    pub search_url: String,
    /// Deep research (streaming) endpoint
    pub deep_search_url: String,
    /// Content reader endpoint (URL -> extracted text)
    pub reader_url: String,
    /// Deep research model
    pub deep_search_model: String,
    /// API key (from JINA_API_KEY)
    #[serde(skip)]
    pub api_key: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            search_url: "https://s.jina.ai/".to_string(),
            deep_search_url: "https://deepsearch.jina.ai/v1/chat/completions".to_string(),
            reader_url: "https://r.jina.ai/".to_string(),
            deep_search_model: "jina-deepsearch-v1".to_string(),
            api_key: String::new(),
        }
    }
}

/// Object store configuration (S3-compatible bucket behind a narrow contract)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStoreConfig {
    /// Upload base URL (from DOCUMENT_STORE_URL)
    #[serde(skip)]
    pub base_url: String,
    /// Public base URL returned to clients; falls back to base_url
    #[serde(skip)]
    pub public_base_url: String,
    /// Access token (from DOCUMENT_STORE_TOKEN)
    #[serde(skip)]
    pub api_token: String,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            public_base_url: String::new(),
            api_token: String::new(),
        }
    }
}

/// One bearer token and the user it resolves to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenEntry {
    pub token: String,
    pub user_id: String,
}

impl AppConfig {
    /// Load configuration: optional TOML file for tunables, then environment
    /// for credentials. Missing required credentials fail here.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("DEEPQUERY_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("cannot read {}: {}", path, e)))?;
                toml::from_str(&raw)
                    .map_err(|e| Error::Config(format!("invalid config {}: {}", path, e)))?
            }
            Err(_) => Self::default(),
        };

        config.embedding.api_key = require_env("VOYAGE_API_KEY")?;
        config.vector_index.api_key = require_env("PINECONE_API_KEY")?;
        config.vector_index.index_host = require_env("PINECONE_INDEX_HOST")?;
        config.llm.api_key = require_env("GROQ_API_KEY")?;
        config.web.api_key = require_env("JINA_API_KEY")?;
        config.document_store.base_url = require_env("DOCUMENT_STORE_URL")?;
        config.document_store.public_base_url = std::env::var("DOCUMENT_STORE_PUBLIC_URL")
            .unwrap_or_else(|_| config.document_store.base_url.clone());
        config.document_store.api_token =
            std::env::var("DOCUMENT_STORE_TOKEN").unwrap_or_default();

        // DEEPQUERY_API_TOKENS="token1:alice,token2:bob"
        if let Ok(raw) = std::env::var("DEEPQUERY_API_TOKENS") {
            for pair in raw.split(',').filter(|p| !p.trim().is_empty()) {
                let (token, user_id) = pair.trim().split_once(':').ok_or_else(|| {
                    Error::Config("DEEPQUERY_API_TOKENS entries must be token:user".to_string())
                })?;
                config.api_tokens.push(TokenEntry {
                    token: token.to_string(),
                    user_id: user_id.to_string(),
                });
            }
        }
        if config.api_tokens.is_empty() {
            return Err(Error::Config(
                "no API tokens configured (set DEEPQUERY_API_TOKENS)".to_string(),
            ));
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field invariants
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.vector_index.upsert_batch_size == 0 {
            return Err(Error::Config("upsert_batch_size must be positive".to_string()));
        }
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("missing required environment variable {}", name)))
}
