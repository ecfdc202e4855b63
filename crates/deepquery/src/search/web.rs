//! Web search: sync results and streaming deep research

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::WebConfig;
use crate::error::{Error, Result};
use crate::stream::{EventSink, StreamEvent};

/// One web search hit
#[derive(Debug, Clone, Deserialize)]
pub struct WebSearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<WebSearchResult>,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
}

/// Web search with a sync and a streaming deep-research variant.
///
/// Implementations:
/// - `JinaSearch`: Jina search + deepsearch APIs
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Search the web. Provider failures degrade to an empty result list;
    /// callers cannot distinguish "no results" from "search down".
    async fn normal_search(&self, query: &str) -> Vec<WebSearchResult>;

    /// Streaming deep research: the provider's response body is forwarded
    /// into the sink byte-for-byte. Failures emit a single `error` event
    /// instead of returning Err.
    async fn deep_search(&self, query: &str, sink: &EventSink) -> Result<()>;
}

/// Jina web search client
pub struct JinaSearch {
    client: reqwest::Client,
    config: WebConfig,
    /// Deadline for the deep-research stream, overriding the client default
    stream_timeout: std::time::Duration,
}

impl JinaSearch {
    pub fn new(
        client: reqwest::Client,
        config: WebConfig,
        stream_timeout: std::time::Duration,
    ) -> Self {
        Self {
            client,
            config,
            stream_timeout,
        }
    }

    async fn try_normal_search(&self, query: &str) -> Result<Vec<WebSearchResult>> {
        let response = self
            .client
            .post(&self.config.search_url)
            .bearer_auth(&self.config.api_key)
            .header("Accept", "application/json")
            .json(&SearchRequest { q: query })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::provider(
                "web-search",
                format!("search returned HTTP {}", response.status()),
            ));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::provider("web-search", format!("malformed response: {}", e)))?;

        Ok(body.data)
    }
}

#[async_trait]
impl WebSearchProvider for JinaSearch {
    async fn normal_search(&self, query: &str) -> Vec<WebSearchResult> {
        match self.try_normal_search(query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Web search failed, returning no results: {}", e);
                Vec::new()
            }
        }
    }

    async fn deep_search(&self, query: &str, sink: &EventSink) -> Result<()> {
        let payload = json!({
            "model": self.config.deep_search_model,
            "messages": [{ "role": "user", "content": query }],
            "stream": true,
        });

        let attempt = async {
            let response = self
                .client
                .post(&self.config.deep_search_url)
                .timeout(self.stream_timeout)
                .bearer_auth(&self.config.api_key)
                .json(&payload)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(Error::provider(
                    "deep-search",
                    format!("deep search returned HTTP {}", response.status()),
                ));
            }

            sink.forward_raw(response.bytes_stream()).await
        };

        match attempt.await {
            Ok(()) => Ok(()),
            // Client gone: stop, don't try to report into a closed channel.
            Err(Error::StreamClosed) => Err(Error::StreamClosed),
            Err(e) => {
                tracing::error!("Deep search failed: {}", e);
                sink.emit(StreamEvent::Error("Deep search failed.".to_string()))
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_parses_provider_shape() {
        let raw = r#"{"data":[{"title":"T","url":"https://t","content":"body","description":"d"}]}"#;
        let body: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].title, "T");
        assert_eq!(body.data[0].url, "https://t");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let raw = r#"{"data":[{"url":"https://t"}]}"#;
        let body: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(body.data[0].title, "");
        assert_eq!(body.data[0].content, "");
    }

    #[test]
    fn empty_response_yields_no_results() {
        let body: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(body.data.is_empty());
    }
}
