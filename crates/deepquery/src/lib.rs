//! deepquery: retrieval-augmented question answering with streaming, cited answers
//!
//! The crate wires a planning/executing/synthesizing query orchestrator over
//! narrow provider adapters (embeddings, hybrid vector search, rerank, web
//! search, token-streaming LLM) and ships the result to the client as a
//! newline-delimited JSON event stream.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod orchestrator;
pub mod processing;
pub mod providers;
pub mod retrieval;
pub mod search;
pub mod server;
pub mod storage;
pub mod stream;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use orchestrator::Orchestrator;
pub use stream::{EventSink, StreamEvent};
pub use types::{
    chunk::{ChunkRecord, EnrichedChunk},
    plan::{PlanStep, StepKind},
    source::{Source, SourceKind},
};
