// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry keys
//!
//! Keys are plain strings:
//!   - `event.<type>`: envelopes whose `type` field equals `<type>`
//!   - `event.*`: every envelope, after the exact-key subscribers
//!   - `error`: malformed frames and transport failures

/// Namespace prefix for envelope keys
pub const EVENT_PREFIX: &str = "event.";

/// Reserved key receiving every envelope
pub const ALL_EVENTS_KEY: &str = "event.*";

/// Reserved key for failures
pub const ERROR_KEY: &str = "error";

/// Key under which envelopes of `event_type` are dispatched
pub fn event_key(event_type: &str) -> String {
    format!("{}{}", EVENT_PREFIX, event_type)
}

/// Inverse of [`event_key`]; `None` for reserved or foreign keys
pub fn event_type_of(key: &str) -> Option<&str> {
    if key == ALL_EVENTS_KEY {
        return None;
    }
    key.strip_prefix(EVENT_PREFIX)
}

#[cfg(test)]
#[path = "keys_tests.rs"]
mod tests;
