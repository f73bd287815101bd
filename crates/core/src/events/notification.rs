// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! What subscribers receive

use crate::envelope::EventEnvelope;
use crate::error::ChannelError;

/// A dispatched item: either a decoded envelope or a failure on `error`
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Event(EventEnvelope),
    Error(ChannelError),
}

impl Notification {
    pub fn as_event(&self) -> Option<&EventEnvelope> {
        match self {
            Notification::Event(envelope) => Some(envelope),
            Notification::Error(_) => None,
        }
    }

    pub fn as_error(&self) -> Option<&ChannelError> {
        match self {
            Notification::Error(err) => Some(err),
            Notification::Event(_) => None,
        }
    }
}
