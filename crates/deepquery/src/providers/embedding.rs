//! Embedding provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Dense text/multimodal embeddings.
///
/// Implementations:
/// - `VoyageEmbedder`: Voyage AI (voyage-2 text, voyage-multimodal-3)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a query. Supplying an image switches to the multimodal model.
    async fn embed_query(&self, text: &str, image_base64: Option<&str>) -> Result<Vec<f32>>;

    /// Embed a batch of document chunks, order-preserving, one vector per
    /// input. Callers check the count against the input length.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
