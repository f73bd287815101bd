// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::error::TransportError;
use crate::transport::{Connection, FrameSink, Transport, TransportEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Recorded connect call
#[derive(Debug, Clone)]
pub struct ConnectCall {
    pub url: String,
    pub sink: FrameSink,
    closed: Arc<AtomicBool>,
}

impl ConnectCall {
    /// Whether the channel closed this connection
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct FakeState {
    calls: Vec<ConnectCall>,
    unsupported: Option<String>,
    next_error: Option<TransportError>,
    on_connect: Vec<TransportEvent>,
}

/// Fake transport: records connects and lets tests push frames by hand.
///
/// Deliveries run synchronously on the calling thread.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose every connect reports `Unsupported`
    pub fn unsupported(reason: impl Into<String>) -> Self {
        let transport = Self::new();
        transport.lock().unsupported = Some(reason.into());
        transport
    }

    /// Fail the next connect with `err`
    pub fn fail_next_connect(&self, err: TransportError) {
        self.lock().next_error = Some(err);
    }

    /// Events delivered from inside the next connect, before it returns
    pub fn deliver_on_connect(&self, events: Vec<TransportEvent>) {
        self.lock().on_connect = events;
    }

    /// All recorded connect calls
    pub fn calls(&self) -> Vec<ConnectCall> {
        self.lock().calls.clone()
    }

    /// URLs connected to, in order
    pub fn urls(&self) -> Vec<String> {
        self.lock().calls.iter().map(|c| c.url.clone()).collect()
    }

    pub fn latest(&self) -> Option<ConnectCall> {
        self.lock().calls.last().cloned()
    }

    /// Push a frame payload through the latest connection
    pub fn push_frame(&self, data: impl Into<String>) -> bool {
        match self.latest() {
            Some(call) => call.sink.frame(data),
            None => false,
        }
    }

    /// Fail the latest connection
    pub fn push_failure(&self, err: TransportError) -> bool {
        match self.latest() {
            Some(call) => call.sink.fail(err),
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Connection handed out by [`FakeTransport`]
#[derive(Debug)]
pub struct FakeConnection {
    closed: Arc<AtomicBool>,
}

impl Connection for FakeConnection {
    fn close(self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl Transport for FakeTransport {
    type Connection = FakeConnection;

    fn connect(&self, url: &str, sink: FrameSink) -> Result<FakeConnection, TransportError> {
        let closed = Arc::new(AtomicBool::new(false));
        let on_connect = {
            let mut state = self.lock();
            if let Some(reason) = &state.unsupported {
                return Err(TransportError::Unsupported(reason.clone()));
            }
            if let Some(err) = state.next_error.take() {
                return Err(err);
            }
            state.calls.push(ConnectCall {
                url: url.to_string(),
                sink: sink.clone(),
                closed: Arc::clone(&closed),
            });
            std::mem::take(&mut state.on_connect)
        };

        for event in on_connect {
            sink.deliver(event);
        }

        Ok(FakeConnection { closed })
    }
}
