//! Stream transport: newline-delimited JSON events from orchestrator to client
//!
//! Each event is one JSON object on its own line. The consumer buffers
//! partial lines across chunk boundaries; the end of the stream is the
//! completion signal (no explicit done event).

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::{Error, Result};
use crate::types::source::Source;

/// One unit of the wire protocol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum StreamEvent {
    /// A plan step, emitted once per step before execution begins
    Plan(String),
    /// A tool call is starting (human-readable status)
    ToolStart(String),
    /// A tool call finished (human-readable status, e.g. result count)
    ToolEnd(String),
    /// One collected source, emitted as soon as it is found
    Source(Source),
    /// The concatenated evidence block, emitted exactly once after execution
    Context(String),
    /// One synthesized token chunk
    Response(String),
    /// Terminal failure notice; the stream closes after this
    Error(String),
}

/// Writer half of the event channel.
///
/// Backed by a bounded mpsc channel; the HTTP response body drains the
/// receiver. A dropped receiver (client disconnect) turns every further
/// write into `Error::StreamClosed`, which the orchestrator treats as
/// cancellation.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<Bytes>,
}

impl EventSink {
    /// Create a sink and the byte stream feeding the HTTP response body
    pub fn channel(capacity: usize) -> (Self, impl Stream<Item = Bytes>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, ReceiverStream::new(rx))
    }

    /// Serialize and write one event line
    pub async fn emit(&self, event: StreamEvent) -> Result<()> {
        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        self.tx
            .send(Bytes::from(line))
            .await
            .map_err(|_| Error::StreamClosed)
    }

    /// Forward raw bytes untouched (deep-research provider passthrough)
    pub async fn forward_raw<S, E>(&self, body: S) -> Result<()>
    where
        S: Stream<Item = std::result::Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        futures_util::pin_mut!(body);
        while let Some(chunk) = body.next().await {
            let bytes =
                chunk.map_err(|e| Error::provider("deep-search", format!("stream error: {}", e)))?;
            self.tx.send(bytes).await.map_err(|_| Error::StreamClosed)?;
        }
        Ok(())
    }

    /// True once the consumer has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Convert a provider byte stream into complete lines, buffering partial
/// lines across chunk boundaries. Used for SSE/NDJSON token streams.
pub fn stream_lines(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
) -> impl Stream<Item = Result<String>> + Send {
    futures_util::stream::unfold(
        (Box::pin(byte_stream), String::new()),
        |(mut stream, mut buffer)| async move {
            loop {
                if let Some(newline_pos) = buffer.find('\n') {
                    let line = buffer[..newline_pos].to_string();
                    buffer = buffer[newline_pos + 1..].to_string();
                    if !line.trim().is_empty() {
                        return Some((Ok(line), (stream, buffer)));
                    }
                    continue;
                }

                match stream.next().await {
                    Some(Ok(bytes)) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));
                    }
                    Some(Err(e)) => {
                        return Some((
                            Err(Error::provider("llm", format!("stream read error: {}", e))),
                            (stream, buffer),
                        ));
                    }
                    None => {
                        if !buffer.trim().is_empty() {
                            let remaining = std::mem::take(&mut buffer);
                            return Some((Ok(remaining), (stream, buffer)));
                        }
                        return None;
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::source::SourceKind;

    #[test]
    fn event_tags_match_the_wire_protocol() {
        let cases = vec![
            (StreamEvent::Plan("1. step".into()), "plan"),
            (StreamEvent::ToolStart("starting".into()), "tool-start"),
            (StreamEvent::ToolEnd("done".into()), "tool-end"),
            (StreamEvent::Context("all".into()), "context"),
            (StreamEvent::Response("tok".into()), "response"),
            (StreamEvent::Error("boom".into()), "error"),
        ];
        for (event, tag) in cases {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["type"], tag);
        }
    }

    #[test]
    fn source_event_nests_the_source_object() {
        let event = StreamEvent::Source(Source::web("https://x", "X", "body"));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "source");
        assert_eq!(json["data"]["type"], "web");
        assert_eq!(json["data"]["content"], "body");
    }

    #[test]
    fn events_round_trip() {
        let event = StreamEvent::Source(Source {
            kind: SourceKind::Internal,
            source_url: Some("u".into()),
            title: Some("t".into()),
            content: "c".into(),
        });
        let line = serde_json::to_string(&event).unwrap();
        let back: StreamEvent = serde_json::from_str(&line).unwrap();
        assert_eq!(back, event);
    }

    #[tokio::test]
    async fn emit_writes_one_line_per_event() {
        let (sink, stream) = EventSink::channel(8);
        sink.emit(StreamEvent::Plan("1. a".into())).await.unwrap();
        sink.emit(StreamEvent::Response("hi".into())).await.unwrap();
        drop(sink);

        let chunks: Vec<Bytes> = stream.collect().await;
        let text: String = chunks
            .iter()
            .map(|b| String::from_utf8_lossy(b).to_string())
            .collect();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"plan\""));
        assert!(lines[1].contains("\"response\""));
    }

    #[tokio::test]
    async fn emit_fails_once_receiver_is_dropped() {
        let (sink, stream) = EventSink::channel(1);
        drop(stream);
        let err = sink.emit(StreamEvent::Plan("1. a".into())).await.unwrap_err();
        assert!(err.is_stream_closed());
        assert!(sink.is_closed());
    }

    #[tokio::test]
    async fn stream_lines_buffers_partial_lines() {
        let chunks: Vec<reqwest::Result<Bytes>> = vec![
            Ok(Bytes::from("data: {\"a\"")),
            Ok(Bytes::from(":1}\ndata: ")),
            Ok(Bytes::from("{\"b\":2}\n")),
        ];
        let lines: Vec<String> = stream_lines(futures_util::stream::iter(chunks))
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(lines, vec!["data: {\"a\":1}", "data: {\"b\":2}"]);
    }

    #[tokio::test]
    async fn stream_lines_flushes_trailing_line_without_newline() {
        let chunks: Vec<reqwest::Result<Bytes>> = vec![Ok(Bytes::from("tail without newline"))];
        let lines: Vec<String> = stream_lines(futures_util::stream::iter(chunks))
            .map(|r| r.unwrap())
            .collect()
            .await;
        assert_eq!(lines, vec!["tail without newline"]);
    }
}
