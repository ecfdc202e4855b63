//! Core types for the query service

pub mod chunk;
pub mod plan;
pub mod query;
pub mod source;

pub use chunk::{ChunkRecord, EnrichedChunk};
pub use plan::{PlanStep, StepKind};
pub use query::{QueryRequest, UploadResponse, ValidateRequest};
pub use source::{Source, SourceKind};
