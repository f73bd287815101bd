// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental Server-Sent Events parser
//!
//! Bytes arrive in arbitrary chunks; complete frames come out. Follows the
//! `text/event-stream` interpretation rules: `\n`, `\r\n` and `\r` line
//! endings, `:` comments, `data`/`event` fields, blank line dispatch, and an
//! optional leading byte-order mark. `id` and `retry` only matter to a
//! reconnecting client and are skipped.

const BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// One dispatched SSE frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name; empty when the server sent no `event:` field
    pub event: String,
    /// Data lines joined with `\n`
    pub data: String,
}

impl SseFrame {
    /// Whether this frame would fire `onmessage` (unnamed or `message`)
    pub fn is_message(&self) -> bool {
        self.event.is_empty() || self.event == "message"
    }
}

/// Stateful parser fed with raw response bytes
#[derive(Debug, Default)]
pub struct SseParser {
    line: Vec<u8>,
    pending_cr: bool,
    seen_first_line: bool,
    event: String,
    data: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk, returning every frame it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        let mut frames = Vec::new();

        for &byte in chunk {
            if self.pending_cr {
                self.pending_cr = false;
                if byte == b'\n' {
                    continue;
                }
            }

            match byte {
                b'\n' => self.end_line(&mut frames),
                b'\r' => {
                    self.pending_cr = true;
                    self.end_line(&mut frames);
                }
                _ => self.line.push(byte),
            }
        }

        frames
    }

    fn end_line(&mut self, frames: &mut Vec<SseFrame>) {
        let mut bytes = std::mem::take(&mut self.line);
        if !self.seen_first_line {
            self.seen_first_line = true;
            if bytes.starts_with(BOM) {
                bytes.drain(..BOM.len());
            }
        }

        let line = String::from_utf8_lossy(&bytes);
        if line.is_empty() {
            if let Some(frame) = self.dispatch() {
                frames.push(frame);
            }
            return;
        }
        if line.starts_with(':') {
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line.as_ref(), ""),
        };

        match field {
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "event" => self.event = value.to_string(),
            other => tracing::trace!(field = other, "ignoring sse field"),
        }
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = std::mem::take(&mut self.event);
        if self.data.is_empty() {
            return None;
        }

        let mut data = std::mem::take(&mut self.data);
        data.pop();
        Some(SseFrame { event, data })
    }
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;
