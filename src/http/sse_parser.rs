//! Server-Sent Events decoding for streaming Watson endpoints.
//!
//! Watson's streaming endpoints frame each event as an `event:` line followed
//! by a `data:` line carrying one JSON document:
//!
//! ```text
//! event: message
//! data: {"partial_item": {"text": "hi"}}
//!
//! ```
//!
//! [`SseDecoder`] is the line-level state machine. [`decode_lines`] runs it
//! lazily over any iterator of lines, and [`parse_sse_stream`] over a chunked
//! HTTP body.
//!
//! # Pairing rules
//!
//! An event is emitted only once an event name and a data payload have both
//! been seen since the last emitted event. The name must come first:
//!
//! - a `data:` line with no pending event name is discarded on the spot and
//!   never pairs with a later `event:` line;
//! - an `event:` line replaces any pending name and clears pending data.
//!
//! Malformed JSON after `data:` is an error, even for a line that would be
//! discarded. Blank lines and other fields (`id:`, `retry:`, `: comment`) are
//! ignored.

use super::loud_wire;
use crate::errors::WatsonError;
use async_stream::try_stream;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::str;

const EVENT_PREFIX: &str = "event:";
const DATA_PREFIX: &str = "data:";

/// One decoded event.
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    /// The name from the `event:` line (e.g. `message`).
    pub event: String,
    /// The parsed JSON from the `data:` line.
    pub data: Value,
}

impl SseEvent {
    /// Decodes the payload into a typed value.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, WatsonError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

/// Incremental decoder state for one response stream.
#[derive(Debug, Default)]
pub struct SseDecoder {
    pending_event: Option<String>,
    pending_data: Option<Value>,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes one line (without its terminator; a trailing `\r` is
    /// tolerated) and returns the event it completes, if any.
    ///
    /// # Errors
    ///
    /// Returns [`WatsonError::Json`] if a `data:` payload is not valid JSON.
    pub fn feed_line(&mut self, line: &str) -> Result<Option<SseEvent>, WatsonError> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(rest) = line.strip_prefix(EVENT_PREFIX) {
            if self.pending_data.take().is_some() {
                tracing::warn!("SSE event line arrived with unpaired data pending - data dropped");
            }
            self.pending_event = Some(field_value(rest).to_string());
        } else if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
            let data: Value = serde_json::from_str(field_value(rest))?;
            if self.pending_event.is_some() {
                self.pending_data = Some(data);
            } else {
                tracing::warn!("SSE data line without preceding event line - data dropped");
            }
        }

        match (self.pending_event.take(), self.pending_data.take()) {
            (Some(event), Some(data)) => Ok(Some(SseEvent { event, data })),
            (event, data) => {
                self.pending_event = event;
                self.pending_data = data;
                Ok(None)
            }
        }
    }

    /// Returns `true` if an event name is waiting for its data.
    #[must_use]
    pub fn has_pending_event(&self) -> bool {
        self.pending_event.is_some()
    }
}

/// Strips the single optional space that separates a field name from its
/// value.
fn field_value(rest: &str) -> &str {
    rest.strip_prefix(' ').unwrap_or(rest)
}

/// Lazily decodes events from an iterator of lines.
///
/// The iterator stops after the first error.
pub fn decode_lines<I, S>(lines: I) -> SseEvents<I::IntoIter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    SseEvents {
        lines: lines.into_iter(),
        decoder: SseDecoder::new(),
        failed: false,
    }
}

/// Iterator returned by [`decode_lines`].
#[derive(Debug)]
pub struct SseEvents<I> {
    lines: I,
    decoder: SseDecoder,
    failed: bool,
}

impl<I, S> Iterator for SseEvents<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<SseEvent, WatsonError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        for line in self.lines.by_ref() {
            match self.decoder.feed_line(line.as_ref()) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => {}
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

/// Parses an SSE byte stream into a stream of [`SseEvent`]s.
///
/// This function handles the low-level framing:
/// - Buffers incoming bytes
/// - Splits on newlines, decoding each line as UTF-8
/// - Feeds lines to an [`SseDecoder`]
/// - Processes a final unterminated line when the body ends
///
/// `request_id` correlates SSE chunks with their request in wire logs.
///
/// # Example
///
/// ```ignore
/// let byte_stream = response.bytes_stream();
/// let events = parse_sse_stream(byte_stream, request_id);
/// futures_util::pin_mut!(events);
///
/// while let Some(event) = events.next().await {
///     let event = event?;
///     println!("{}: {}", event.event, event.data);
/// }
/// ```
pub fn parse_sse_stream<E>(
    byte_stream: impl Stream<Item = Result<Bytes, E>> + Send,
    request_id: usize,
) -> impl Stream<Item = Result<SseEvent, WatsonError>> + Send
where
    WatsonError: From<E>,
    E: Send,
{
    try_stream! {
        futures_util::pin_mut!(byte_stream);
        let mut buffer = Vec::new();
        let mut decoder = SseDecoder::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk: Bytes = chunk_result?;
            buffer.extend_from_slice(&chunk);

            while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                let line_bytes = buffer.drain(..=newline_pos).collect::<Vec<u8>>();
                let line = str::from_utf8(&line_bytes)?.trim_end_matches(['\n', '\r']);

                if let Some(event) = decoder.feed_line(line)? {
                    loud_wire::log_sse_event(request_id, &event.event, &event.data);
                    yield event;
                }
            }
        }

        if !buffer.is_empty() {
            let line = str::from_utf8(&buffer)?.trim_end_matches('\r');
            if let Some(event) = decoder.feed_line(line)? {
                loud_wire::log_sse_event(request_id, &event.event, &event.data);
                yield event;
            }
        }
    }
}

/// Like [`parse_sse_stream`], decoding each payload into `T`.
pub fn parse_sse_stream_as<T, E>(
    byte_stream: impl Stream<Item = Result<Bytes, E>> + Send,
    request_id: usize,
) -> impl Stream<Item = Result<T, WatsonError>> + Send
where
    T: DeserializeOwned + Send,
    WatsonError: From<E>,
    E: Send,
{
    parse_sse_stream(byte_stream, request_id)
        .map(|event| event.and_then(|e| Ok(serde_json::from_value(e.data)?)))
}
