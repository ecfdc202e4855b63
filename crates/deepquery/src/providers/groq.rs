//! Groq chat-completion client (OpenAI-compatible API, SSE token streaming)

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::stream::stream_lines;

use super::llm::{LlmProvider, TokenStream};
use super::retry_request;

/// Groq API client
pub struct GroqClient {
    client: reqwest::Client,
    config: LlmConfig,
    max_retries: u32,
    stream_timeout: std::time::Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

impl GroqClient {
    pub fn new(
        client: reqwest::Client,
        config: LlmConfig,
        max_retries: u32,
        stream_timeout: std::time::Duration,
    ) -> Self {
        Self {
            client,
            config,
            max_retries,
            stream_timeout,
        }
    }

    fn chat_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }
}

/// Parse a single SSE line from the streaming endpoint. Returns:
/// - Some(Ok(content)) for content deltas
/// - Some(Err(e)) for parse errors
/// - None to skip (non-data lines, [DONE], empty deltas)
fn parse_sse_line(line: &str) -> Option<Result<String>> {
    let line = line.trim();
    let data = line.strip_prefix("data: ")?.trim();
    if data == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => {
            let content = chunk
                .choices
                .first()
                .and_then(|c| c.delta.content.clone())
                .unwrap_or_default();
            if content.is_empty() {
                return None;
            }
            Some(Ok(content))
        }
        Err(e) => Some(Err(Error::provider(
            "groq",
            format!("unparseable stream chunk: {}", e),
        ))),
    }
}

#[async_trait]
impl LlmProvider for GroqClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = self.chat_url();

        let response = retry_request(self.max_retries, "groq completion", || async {
            let request = ChatRequest {
                model: &self.config.model,
                messages: vec![
                    ChatMessage {
                        role: "system",
                        content: system,
                    },
                    ChatMessage {
                        role: "user",
                        content: user,
                    },
                ],
                stream: false,
            };

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.config.api_key)
                .json(&request)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::provider(
                    "groq",
                    format!("completion returned HTTP {}: {}", status, body),
                ));
            }

            let body: ChatResponse = response
                .json()
                .await
                .map_err(|e| Error::provider("groq", format!("malformed response: {}", e)))?;
            Ok(body)
        })
        .await?;

        Ok(response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default())
    }

    async fn stream(&self, system: &str, user: &str) -> Result<TokenStream> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            stream: true,
        };

        let response = self
            .client
            .post(self.chat_url())
            .timeout(self.stream_timeout)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider(
                "groq",
                format!("stream returned HTTP {}: {}", status, body),
            ));
        }

        let tokens = stream_lines(response.bytes_stream()).filter_map(|line| async move {
            match line {
                Ok(line) => parse_sse_line(&line),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Box::pin(tokens))
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
