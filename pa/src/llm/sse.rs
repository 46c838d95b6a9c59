//! Server-sent event decoding for streamed chat completions
//!
//! A streaming completion arrives as `data: <json>` lines, one chunk per
//! line, terminated by a `data: [DONE]` sentinel. HTTP chunk boundaries can
//! fall anywhere, including inside a multi-byte UTF-8 sequence, so the
//! decoder buffers raw bytes and only interprets complete lines.

use serde::Deserialize;
use tracing::debug;

/// Payload that cleanly terminates a stream
const DONE_SENTINEL: &str = "[DONE]";

/// Incremental decoder for one streamed chat completion
///
/// Feed it response bytes as they arrive; it yields the text fragments
/// completed by each feed. Lines that are not `data: ` events and chunk
/// payloads that fail to parse are skipped, since the endpoint may
/// interleave comments or malformed frames with real deltas.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: Vec<u8>,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw response bytes, returning any newly completed fragments
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(bytes);

        let mut fragments = Vec::new();
        while let Some(line_end) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=line_end).collect();
            if self.done {
                continue;
            }

            // A '\n' can never split a UTF-8 sequence, so the line is whole
            let line = String::from_utf8_lossy(&line);
            let Some(payload) = line.trim().strip_prefix("data: ") else {
                continue;
            };

            if payload == DONE_SENTINEL {
                debug!("feed: stream sentinel received");
                self.done = true;
                continue;
            }

            if let Ok(chunk) = serde_json::from_str::<StreamChunk>(payload) {
                if let Some(content) = chunk.choices.into_iter().next().and_then(|c| c.delta.content) {
                    fragments.push(content);
                }
            } else {
                debug!(payload_len = payload.len(), "feed: skipping malformed chunk");
            }
        }

        fragments
    }

    /// Whether the `[DONE]` sentinel has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }
}

// Streaming chunk wire types

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}
