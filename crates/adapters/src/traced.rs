// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced transport wrapper for consistent observability

use notichan_core::{Connection, FrameSink, Transport, TransportError};
use std::time::Instant;

/// Wrapper that adds tracing to any Transport
#[derive(Clone, Debug, Default)]
pub struct TracedTransport<T> {
    inner: T,
}

impl<T> TracedTransport<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Transport> Transport for TracedTransport<T> {
    type Connection = TracedConnection<T::Connection>;

    fn connect(&self, url: &str, sink: FrameSink) -> Result<Self::Connection, TransportError> {
        let span = tracing::info_span!("transport.connect", url, generation = sink.generation());
        let _guard = span.enter();

        tracing::info!("connecting");
        let start = Instant::now();
        let result = self.inner.connect(url, sink);
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::info!(elapsed_ms, "connected"),
            // Unsupported is an environment fact, not a fault
            Err(TransportError::Unsupported(reason)) => {
                tracing::warn!(elapsed_ms, %reason, "transport unsupported")
            }
            Err(e) => tracing::error!(elapsed_ms, error = %e, "connect failed"),
        }

        result.map(|inner| TracedConnection {
            inner,
            url: url.to_string(),
            opened_at: Instant::now(),
        })
    }
}

/// Connection wrapper that logs its lifetime on close
#[derive(Debug)]
pub struct TracedConnection<C> {
    inner: C,
    url: String,
    opened_at: Instant,
}

impl<C: Connection> Connection for TracedConnection<C> {
    fn close(self) {
        let span = tracing::info_span!("transport.close", url = %self.url);
        let _guard = span.enter();

        let open_ms = self.opened_at.elapsed().as_millis() as u64;
        self.inner.close();
        tracing::info!(open_ms, "closed");
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
