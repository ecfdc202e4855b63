//! Object storage for uploaded files, behind a narrow contract
//!
//! The service only needs two things from the store: accept bytes under a
//! key and hand back a URL the content reader can fetch. Everything else
//! about storage stays on the provider's side of the line.

use async_trait::async_trait;
use uuid::Uuid;

use crate::config::DocumentStoreConfig;
use crate::error::{Error, Result};

/// Store a file, get back its public URL
#[async_trait]
pub trait DocumentStoreProvider: Send + Sync {
    async fn store_file(&self, filename: &str, data: Vec<u8>, content_type: &str)
        -> Result<String>;
}

/// HTTP bucket client: PUT to `{base_url}/{key}`, public URL at
/// `{public_base_url}/{key}` (S3-compatible gateways, R2 workers, etc.)
pub struct HttpBucketStore {
    client: reqwest::Client,
    config: DocumentStoreConfig,
}

impl HttpBucketStore {
    pub fn new(client: reqwest::Client, config: DocumentStoreConfig) -> Self {
        Self { client, config }
    }

    /// Object keys are unique per upload; the original filename survives as
    /// a suffix for debuggability.
    fn object_key(filename: &str) -> String {
        let safe: String = filename
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        format!("{}-{}", Uuid::new_v4(), safe)
    }
}

#[async_trait]
impl DocumentStoreProvider for HttpBucketStore {
    async fn store_file(
        &self,
        filename: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        let key = Self::object_key(filename);
        let upload_url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            key
        );

        let mut request = self
            .client
            .put(&upload_url)
            .header("Content-Type", content_type)
            .body(data);
        if !self.config.api_token.is_empty() {
            request = request.bearer_auth(&self.config.api_token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Error::provider(
                "document-store",
                format!("upload returned HTTP {}", response.status()),
            ));
        }

        Ok(format!(
            "{}/{}",
            self.config.public_base_url.trim_end_matches('/'),
            key
        ))
    }
}
