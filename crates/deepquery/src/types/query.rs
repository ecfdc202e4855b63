//! Request and response bodies for the HTTP API

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Body of `POST /api/query`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// The user's question
    pub prompt: String,
    /// Broader retrieval plus rerank, and the provider's streaming
    /// deep-research path for web steps
    #[serde(default)]
    pub deep_research: bool,
}

impl QueryRequest {
    /// Reject empty prompts before any provider call is made
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(Error::Validation("prompt must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Body of `POST /api/validate`: re-synthesize an answer strictly from the
/// supplied context, streamed back as plain text.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateRequest {
    pub prompt: String,
    pub context: String,
}

impl ValidateRequest {
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(Error::Validation("prompt must not be empty".to_string()));
        }
        if self.context.trim().is_empty() {
            return Err(Error::Validation("context must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Body returned by `POST /api/documents/upload`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub file_url: String,
    /// Background ingestion job, observable via `GET /api/jobs/:id`
    pub job_id: uuid::Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_research_defaults_to_false() {
        let request: QueryRequest = serde_json::from_str(r#"{"prompt":"hi"}"#).unwrap();
        assert!(!request.deep_research);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let request: QueryRequest = serde_json::from_str(r#"{"prompt":"  "}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
