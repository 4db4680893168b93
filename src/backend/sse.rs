//! Incremental decoder for the `data: {json}` frames of the chat stream.
//!
//! The response body arrives in arbitrary byte chunks. A frame, or a
//! single multi-byte character inside it, may be split across any
//! number of them. The decoder keeps the unterminated tail between
//! calls and only decodes complete lines, so feeding the same bytes in
//! any chunking yields the same events.
//!
//! Splitting happens on the raw `\n` byte. That byte never occurs inside
//! a multi-byte UTF-8 sequence, so every line handed to the UTF-8
//! decoder is whole.

use log::{debug, warn};

use super::types::StreamEvent;

/// Marker introducing a JSON payload on a line.
pub const DATA_PREFIX: &str = "data: ";

#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the current, not yet terminated line.
    pending: Vec<u8>,
    /// Frames dropped because their JSON didn't parse.
    skipped: usize,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk, returning the events of every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        let mut rest = chunk;

        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            if self.pending.is_empty() {
                self.decode_line(&rest[..pos], &mut events);
            } else {
                self.pending.extend_from_slice(&rest[..pos]);
                let line = std::mem::take(&mut self.pending);
                self.decode_line(&line, &mut events);
            }
            rest = &rest[pos + 1..];
        }
        self.pending.extend_from_slice(rest);

        events
    }

    /// Flushes the final line when the body ended without a newline.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.decode_line(&line, &mut events);
        }
        events
    }

    pub fn skipped_frames(&self) -> usize {
        self.skipped
    }

    fn decode_line(&mut self, raw: &[u8], events: &mut Vec<StreamEvent>) {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = String::from_utf8_lossy(raw);

        let Some(data) = line.strip_prefix(DATA_PREFIX) else {
            if !line.is_empty() {
                debug!("Ignoring non-data line: {}", line);
            }
            return;
        };

        match serde_json::from_str::<StreamEvent>(data) {
            Ok(event) => events.push(event),
            Err(e) => {
                self.skipped += 1;
                warn!("Skipping malformed frame ({}): {}", e, data);
            }
        }
    }
}
