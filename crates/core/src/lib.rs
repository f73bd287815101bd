// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! notichan-core: typed event channel over a server-push stream
//!
//! This crate provides:
//! - `Channel` - Open a stream, decode frames, dispatch by `event.<type>`
//! - `SubscriptionRegistry` - Ordered callbacks per key
//! - `SseParser` - Incremental `text/event-stream` framing
//! - `Transport` - Port for the streaming connection itself

pub mod api_root;
pub mod channel;
pub mod config;
pub mod envelope;
pub mod error;
pub mod events;
pub mod sse;
pub mod transport;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub mod fake;

// Re-exports
pub use api_root::{ApiRoot, ApiRootFn};
pub use channel::Channel;
pub use config::{ChannelConfig, DEFAULT_ENDPOINT_PATH};
pub use envelope::{decode, DecodeResult, EventEnvelope};
pub use error::{ChannelError, ConfigError, TransportError};
pub use events::{
    event_key, subscriber, Notification, NotificationReceiver, Subscriber, SubscriptionRegistry,
    ALL_EVENTS_KEY, ERROR_KEY, EVENT_PREFIX,
};
pub use sse::{SseFrame, SseParser};
pub use transport::{Connection, FrameSink, Transport, TransportEvent};

#[cfg(any(test, feature = "test-support"))]
pub use fake::{ConnectCall, FakeConnection, FakeTransport};
