// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local event dispatch
//!
//! This module provides:
//! - `SubscriptionRegistry` - Route notifications to callbacks by key
//! - `Notification` - What a subscriber receives
//! - Key helpers for the `event.<type>` namespace and the reserved `error` key

pub mod keys;
mod notification;
mod registry;

pub use keys::{event_key, event_type_of, ALL_EVENTS_KEY, ERROR_KEY, EVENT_PREFIX};
pub use notification::Notification;
pub use registry::{subscriber, NotificationReceiver, Subscriber, SubscriptionRegistry};
