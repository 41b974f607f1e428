//! Parser for Ollama's newline-delimited JSON chat stream.
//!
//! Each line is a complete JSON object carrying a `message.content` fragment;
//! the last one has `"done": true`. Errors arrive as `{"error": "..."}` lines.

use bytes::Bytes;
use futures_util::Stream;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, TranslateError, classify_message};

#[derive(Debug, Deserialize)]
struct StreamLine {
    #[serde(default)]
    message: Option<StreamMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, PartialEq, Eq)]
enum LineEvent {
    Text(String),
    Done(Option<String>),
    Failed(String),
    Skip,
}

/// Converts a raw NDJSON byte stream into a stream of text fragments.
///
/// Stops after the `done` line. If `cancel` fires first, yields a single
/// [`TranslateError::Cancelled`] and ends.
pub fn ndjson_to_text_stream(
    byte_stream: impl Stream<Item = reqwest::Result<Bytes>> + Send + 'static,
    cancel: CancellationToken,
) -> impl Stream<Item = Result<String>> + Send {
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        // raw bytes; a chunk may end inside a multi-byte character
        let mut buffer: Vec<u8> = Vec::new();

        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                chunk = byte_stream.next() => Some(chunk),
            };

            let Some(next) = next else {
                yield Err(TranslateError::Cancelled);
                return;
            };

            let Some(chunk_result) = next else {
                break;
            };

            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(TranslateError::from_transport(&e));
                    return;
                }
            };

            buffer.extend_from_slice(&chunk);

            while let Some(line_end) = buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=line_end).collect();

                match parse_line(String::from_utf8_lossy(&line).trim()) {
                    LineEvent::Text(text) => {
                        yield Ok(text);
                    }
                    LineEvent::Done(tail) => {
                        if let Some(text) = tail {
                            yield Ok(text);
                        }
                        return;
                    }
                    LineEvent::Failed(message) => {
                        yield Err(classify_message(&message));
                        return;
                    }
                    LineEvent::Skip => {}
                }
            }
        }

        // trailing line without a newline
        match parse_line(String::from_utf8_lossy(&buffer).trim()) {
            LineEvent::Text(text) | LineEvent::Done(Some(text)) => {
                yield Ok(text);
            }
            LineEvent::Failed(message) => {
                yield Err(classify_message(&message));
            }
            LineEvent::Done(None) | LineEvent::Skip => {}
        }
    }
}

fn parse_line(line: &str) -> LineEvent {
    if line.is_empty() {
        return LineEvent::Skip;
    }

    let Ok(parsed) = serde_json::from_str::<StreamLine>(line) else {
        return LineEvent::Skip;
    };

    if let Some(error) = parsed.error {
        return LineEvent::Failed(error);
    }

    let content = parsed
        .message
        .map(|m| m.content)
        .filter(|c| !c.is_empty());

    if parsed.done {
        LineEvent::Done(content)
    } else {
        content.map_or(LineEvent::Skip, LineEvent::Text)
    }
}
