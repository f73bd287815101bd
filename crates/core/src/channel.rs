// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification channel
//!
//! Owns one streaming connection at a time, decodes each frame into an
//! [`EventEnvelope`](crate::envelope::EventEnvelope) and dispatches it under
//! `event.<type>`. Malformed frames and transport failures go to `error`.
//! There is no automatic reconnection; call [`Channel::open`] again.

use crate::api_root::ApiRoot;
use crate::config::ChannelConfig;
use crate::envelope::{decode, DecodeResult};
use crate::error::{ChannelError, TransportError};
use crate::events::{
    event_key, subscriber, Notification, NotificationReceiver, Subscriber, SubscriptionRegistry,
    ALL_EVENTS_KEY, ERROR_KEY,
};
use crate::transport::{Connection, FrameSink, SinkTarget, Transport, TransportEvent};
use std::sync::{Arc, Mutex, Weak};

/// Connection bookkeeping.
///
/// `current` is the generation whose sink may dispatch; `None` when closed.
struct State<C> {
    connection: Option<C>,
    current: Option<u64>,
    next_generation: u64,
}

struct Inner<T: Transport> {
    config: ChannelConfig,
    api_root: Box<dyn ApiRoot>,
    transport: T,
    registry: SubscriptionRegistry,
    state: Mutex<State<T::Connection>>,
}

/// Typed event channel over a long-lived streaming connection.
///
/// Clones share the same connection and registry.
pub struct Channel<T: Transport> {
    inner: Arc<Inner<T>>,
}

impl<T: Transport> Channel<T> {
    pub fn new(config: ChannelConfig, api_root: impl ApiRoot, transport: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                api_root: Box::new(api_root),
                transport,
                registry: SubscriptionRegistry::new(),
                state: Mutex::new(State {
                    connection: None,
                    current: None,
                    next_generation: 0,
                }),
            }),
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.inner.config
    }

    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.inner.registry
    }

    /// URL the next `open` will connect to
    pub fn stream_url(&self) -> String {
        self.inner.config.stream_url(&self.inner.api_root.api_root())
    }

    /// Open the stream.
    ///
    /// An already-open connection is closed first. Failures are reported on
    /// `error` and leave the channel closed.
    pub fn open(&self) {
        if let Some(previous) = self.inner.detach() {
            tracing::debug!("closing previous connection before reopening");
            previous.close();
        }

        let url = self.stream_url();
        let generation = self.inner.attach();
        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        let target: Weak<dyn SinkTarget> = weak;
        let sink = FrameSink::new(target, generation);

        match self.inner.transport.connect(&url, sink) {
            Ok(connection) => {
                let mut state = self.inner.lock_state();
                if state.current == Some(generation) {
                    state.connection = Some(connection);
                    tracing::info!(%url, generation, "channel open");
                } else {
                    // Closed or failed while connecting
                    drop(state);
                    connection.close();
                }
            }
            Err(err) => {
                self.inner.release(generation);
                match &err {
                    TransportError::Unsupported(reason) => {
                        tracing::warn!(%url, %reason, "event stream is not supported here")
                    }
                    other => tracing::error!(%url, error = %other, "failed to open event stream"),
                }
                self.inner
                    .registry
                    .emit(ERROR_KEY, &Notification::Error(ChannelError::from(err)));
            }
        }
    }

    /// Close the stream. No-op when already closed.
    pub fn close(&self) {
        if let Some(connection) = self.inner.detach() {
            connection.close();
            tracing::info!("channel closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock_state().current.is_some()
    }

    pub fn subscribe(&self, key: impl Into<String>, subscriber: &Subscriber) {
        self.inner.registry.subscribe(key, subscriber);
    }

    /// Remove every registration of `subscriber` under `key`
    pub fn unsubscribe(&self, key: &str, subscriber: &Subscriber) -> usize {
        self.inner.registry.unsubscribe(key, subscriber)
    }

    /// Subscribe a closure to envelopes of `event_type`
    pub fn on_event<F>(&self, event_type: &str, f: F) -> Subscriber
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let sub = subscriber(f);
        self.subscribe(event_key(event_type), &sub);
        sub
    }

    /// Subscribe a closure to the `error` key
    pub fn on_error<F>(&self, f: F) -> Subscriber
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        let sub = subscriber(f);
        self.subscribe(ERROR_KEY, &sub);
        sub
    }

    /// Receive notifications for `key` through a tokio channel
    pub fn subscribe_channel(&self, key: impl Into<String>) -> (Subscriber, NotificationReceiver) {
        self.inner.registry.subscribe_channel(key)
    }
}

impl<T: Transport> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> Inner<T> {
    fn lock_state(&self) -> std::sync::MutexGuard<'_, State<T::Connection>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a new generation and make it current
    fn attach(&self) -> u64 {
        let mut state = self.lock_state();
        state.next_generation += 1;
        state.current = Some(state.next_generation);
        state.next_generation
    }

    /// Stop dispatching and hand back the connection for closing
    fn detach(&self) -> Option<T::Connection> {
        let mut state = self.lock_state();
        state.current = None;
        state.connection.take()
    }

    /// Stop dispatching for `generation` if it is still current
    fn release(&self, generation: u64) {
        let mut state = self.lock_state();
        if state.current == Some(generation) {
            state.current = None;
        }
    }

    fn dispatch_frame(&self, generation: u64, data: &str) {
        let attached = || self.is_current(generation);

        match decode(data) {
            DecodeResult::Envelope(envelope) => {
                let key = envelope.key();
                let notification = Notification::Event(envelope);

                let mut delivered = self.registry.emit_while(&key, &notification, attached);
                if key != ALL_EVENTS_KEY {
                    delivered += self
                        .registry
                        .emit_while(ALL_EVENTS_KEY, &notification, attached);
                }
                if delivered == 0 {
                    tracing::trace!(%key, "no subscribers for event");
                }
            }
            DecodeResult::Malformed { raw, reason } => {
                tracing::warn!(%reason, %raw, "invalid JSON from event stream");
                let notification = Notification::Error(ChannelError::MalformedFrame { raw, reason });
                self.registry.emit_while(ERROR_KEY, &notification, attached);
            }
        }
    }
}

impl<T: Transport> SinkTarget for Inner<T> {
    fn deliver(&self, generation: u64, event: TransportEvent) -> bool {
        if !self.is_current(generation) {
            tracing::trace!(generation, "dropping event from detached connection");
            return false;
        }

        match event {
            TransportEvent::Frame(data) => {
                self.dispatch_frame(generation, &data);
                self.is_current(generation)
            }
            TransportEvent::Failed(err) => {
                let connection = {
                    let mut state = self.lock_state();
                    if state.current != Some(generation) {
                        return false;
                    }
                    state.current = None;
                    // Still `None` if the failure came in while connecting;
                    // `open` closes that connection when it sees the generation gone
                    state.connection.take()
                };

                tracing::error!(generation, error = %err, "event stream failed");
                if let Some(connection) = connection {
                    connection.close();
                }
                self.registry
                    .emit(ERROR_KEY, &Notification::Error(ChannelError::from(err)));
                false
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock_state().current == Some(generation)
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
