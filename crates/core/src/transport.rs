// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Streaming transport port
//!
//! A [`Transport`] opens a server-push connection and feeds what it receives
//! into a [`FrameSink`]. The sink is bound to one connection generation of
//! one channel; once that channel closes or reopens, the sink goes inert and
//! anything pushed into it is dropped.

use crate::error::TransportError;
use std::sync::Weak;

/// What a transport reports for its connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Payload of one `onmessage`-style frame
    Frame(String),
    /// The connection failed or ended; no further events follow
    Failed(TransportError),
}

/// Receiving side of a connection, implemented by the channel
pub(crate) trait SinkTarget: Send + Sync {
    fn deliver(&self, generation: u64, event: TransportEvent) -> bool;
    fn is_current(&self, generation: u64) -> bool;
}

/// Handle a transport uses to push frames into its channel
#[derive(Clone)]
pub struct FrameSink {
    target: Weak<dyn SinkTarget>,
    generation: u64,
}

impl FrameSink {
    pub(crate) fn new(target: Weak<dyn SinkTarget>, generation: u64) -> Self {
        Self { target, generation }
    }

    /// A sink attached to nothing; every delivery is dropped
    pub fn detached() -> Self {
        Self {
            target: Weak::<Detached>::new(),
            generation: 0,
        }
    }

    /// Push one event. Returns false once the sink is detached, which tells
    /// the transport to stop reading.
    pub fn deliver(&self, event: TransportEvent) -> bool {
        match self.target.upgrade() {
            Some(target) => target.deliver(self.generation, event),
            None => false,
        }
    }

    pub fn frame(&self, data: impl Into<String>) -> bool {
        self.deliver(TransportEvent::Frame(data.into()))
    }

    pub fn fail(&self, err: TransportError) -> bool {
        self.deliver(TransportEvent::Failed(err))
    }

    /// Whether deliveries still reach the channel
    pub fn is_attached(&self) -> bool {
        self.target
            .upgrade()
            .is_some_and(|target| target.is_current(self.generation))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl std::fmt::Debug for FrameSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSink")
            .field("generation", &self.generation)
            .field("attached", &self.is_attached())
            .finish()
    }
}

struct Detached;

impl SinkTarget for Detached {
    fn deliver(&self, _generation: u64, _event: TransportEvent) -> bool {
        false
    }

    fn is_current(&self, _generation: u64) -> bool {
        false
    }
}

/// A live connection owned by a channel
pub trait Connection: Send + 'static {
    /// Tear the connection down immediately
    fn close(self);
}

/// Adapter for establishing streaming connections
pub trait Transport: Send + Sync + 'static {
    type Connection: Connection;

    /// Open a connection to `url`, delivering into `sink` until closed.
    ///
    /// Returns [`TransportError::Unsupported`] when the host cannot stream at
    /// all. Failures after the connection is set up go through the sink.
    fn connect(&self, url: &str, sink: FrameSink) -> Result<Self::Connection, TransportError>;
}
