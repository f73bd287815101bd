// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription registry routing notifications to callbacks by key

use super::notification::Notification;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// A subscriber callback. Identity (for unsubscribe) is the `Arc` pointer.
pub type Subscriber = Arc<dyn Fn(&Notification) + Send + Sync>;
/// Sender side of a channel-backed subscription
type NotificationSender = mpsc::UnboundedSender<Notification>;
/// Receiver side of a channel-backed subscription
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

/// Wrap a closure as a [`Subscriber`]
pub fn subscriber<F>(f: F) -> Subscriber
where
    F: Fn(&Notification) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Ordered callbacks per key.
///
/// Callbacks under one key run in subscription order. Clones share state.
#[derive(Clone, Default)]
pub struct SubscriptionRegistry {
    entries: Arc<RwLock<HashMap<String, Vec<Subscriber>>>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `subscriber` under `key`. Registering twice means two invocations.
    pub fn subscribe(&self, key: impl Into<String>, subscriber: &Subscriber) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries
            .entry(key.into())
            .or_default()
            .push(Arc::clone(subscriber));
    }

    /// Remove every registration of `subscriber` under `key`.
    ///
    /// Returns how many registrations were removed.
    pub fn unsubscribe(&self, key: &str, subscriber: &Subscriber) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let Some(subs) = entries.get_mut(key) else {
            return 0;
        };

        let before = subs.len();
        subs.retain(|s| !Arc::ptr_eq(s, subscriber));
        let removed = before - subs.len();

        if subs.is_empty() {
            entries.remove(key);
        }
        removed
    }

    /// Subscribe a channel sender under `key` and return the receiving end
    /// together with the subscriber handle (for unsubscribing).
    pub fn subscribe_channel(&self, key: impl Into<String>) -> (Subscriber, NotificationReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let forward = sender_subscriber(tx);
        self.subscribe(key, &forward);
        (forward, rx)
    }

    /// Deliver `notification` to every subscriber of `key`.
    ///
    /// Returns the number of subscribers invoked.
    pub fn emit(&self, key: &str, notification: &Notification) -> usize {
        self.emit_while(key, notification, || true)
    }

    /// Like [`emit`](Self::emit), but checks `keep_going` before each
    /// subscriber and stops once it returns false.
    ///
    /// No lock is held while subscribers run, so they may subscribe,
    /// unsubscribe or tear down the owner re-entrantly.
    pub fn emit_while(
        &self,
        key: &str,
        notification: &Notification,
        keep_going: impl Fn() -> bool,
    ) -> usize {
        let subs: Vec<Subscriber> = {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            match entries.get(key) {
                Some(subs) => subs.clone(),
                None => return 0,
            }
        };

        let mut delivered = 0;
        for sub in subs {
            if !keep_going() {
                tracing::debug!(key, delivered, "dispatch stopped");
                break;
            }
            if catch_unwind(AssertUnwindSafe(|| sub(notification))).is_err() {
                tracing::error!(key, "subscriber panicked");
            }
            delivered += 1;
        }
        delivered
    }

    /// Number of registrations under `key`
    pub fn subscriber_count(&self, key: &str) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .map_or(0, Vec::len)
    }

    /// All keys with at least one subscriber, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Drop every registration
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

fn sender_subscriber(tx: NotificationSender) -> Subscriber {
    subscriber(move |notification| {
        // Receiver dropped: nothing left to deliver to
        let _ = tx.send(notification.clone());
    })
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
