// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP event-stream transport
//!
//! Issues `GET <url>` with `Accept: text/event-stream` on the current tokio
//! runtime and feeds `onmessage` frames into the sink until the server ends
//! the stream, an error occurs, or the channel detaches.

use futures_util::StreamExt;
use notichan_core::{Connection, FrameSink, SseParser, Transport, TransportError};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Url};
use tokio::task::JoinHandle;

/// Streaming transport backed by `reqwest`
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for HttpTransport {
    type Connection = HttpConnection;

    fn connect(&self, url: &str, sink: FrameSink) -> Result<HttpConnection, TransportError> {
        let parsed = Url::parse(url)
            .map_err(|e| TransportError::Connect(format!("invalid url {}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::Unsupported(format!(
                "scheme `{}` cannot carry an event stream",
                parsed.scheme()
            )));
        }

        // Precondition: the read loop needs a runtime to live on
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|_| TransportError::Unsupported("no tokio runtime available".to_string()))?;

        let request = self
            .client
            .get(parsed)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache");

        let task = runtime.spawn(run(request, url.to_string(), sink));
        Ok(HttpConnection { task })
    }
}

/// Handle to the read task; closing or dropping it aborts the request
#[derive(Debug)]
pub struct HttpConnection {
    task: JoinHandle<()>,
}

impl Connection for HttpConnection {
    fn close(self) {
        self.task.abort();
    }
}

impl Drop for HttpConnection {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(request: RequestBuilder, url: String, sink: FrameSink) {
    if let Err(err) = read_stream(request, &url, &sink).await {
        sink.fail(err);
    }
}

/// Returns `Ok` only when the sink detached; every other exit is an error
async fn read_stream(
    request: RequestBuilder,
    url: &str,
    sink: &FrameSink,
) -> Result<(), TransportError> {
    let response = request
        .send()
        .await
        .map_err(|e| TransportError::Connect(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !is_event_stream(content_type) {
        return Err(TransportError::Connect(format!(
            "{} answered with content type `{}`, not text/event-stream",
            url, content_type
        )));
    }
    tracing::debug!(url, "event stream connected");

    let mut parser = SseParser::new();
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| TransportError::Stream(e.to_string()))?;
        for frame in parser.push(&chunk) {
            if !frame.is_message() {
                tracing::debug!(event = %frame.event, "ignoring named event");
                continue;
            }
            if !sink.frame(frame.data) {
                tracing::debug!(url, "sink detached, stopping read");
                return Ok(());
            }
        }
    }

    Err(TransportError::Ended)
}

/// `text/event-stream`, ignoring case and parameters such as `charset`
fn is_event_stream(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/event-stream"))
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
