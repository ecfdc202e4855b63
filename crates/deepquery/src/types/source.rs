//! Sources gathered during plan execution, in citation order

use serde::{Deserialize, Serialize};

/// Where a source came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Private knowledge base (vector store)
    Internal,
    /// Public web search
    Web,
}

/// A single piece of evidence collected by a tool call.
///
/// Sources accumulate in execution order; the 1-based position in that list
/// is the citation index the synthesized answer refers to as `[Source N]`.
/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
}

impl Source {
    /// Source backed by an internal document chunk
    pub fn internal(source_url: impl Into<String>, content: impl Into<String>) -> Self {
        let source_url = source_url.into();
        Self {
            kind: SourceKind::Internal,
            title: Some(format!("Internal Document: {}", source_url)),
            source_url: Some(source_url),
            content: content.into(),
        }
    }

    /// Source backed by a web search result
    pub fn web(
        url: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            kind: SourceKind::Web,
            source_url: Some(url.into()),
            title: Some(title.into()),
            content: content.into(),
        }
    }

    /// Title shown in the numbered context block, with a fallback
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled source")
    }
}
