// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types surfaced by the notification channel

use thiserror::Error;

/// Failures delivered to subscribers of the `error` key.
///
/// The channel never returns these from its public operations; they flow
/// through the registry so one code path handles every failure. `Clone`
/// because a single failure fans out to every `error` subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// The host cannot provide a streaming connection
    #[error("streaming transport unsupported: {0}")]
    UnsupportedTransport(String),
    /// A frame payload was not a JSON object with a string `type`
    #[error("malformed frame ({reason}): {raw}")]
    MalformedFrame { raw: String, reason: String },
    /// The connection failed or ended; the channel is closed afterwards
    #[error("transport failure: {0}")]
    TransportFailure(String),
}

impl ChannelError {
    /// Raw frame text for malformed-frame errors
    pub fn raw_frame(&self) -> Option<&str> {
        match self {
            ChannelError::MalformedFrame { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Errors reported by a [`Transport`](crate::transport::Transport)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("stream error: {0}")]
    Stream(String),
    #[error("stream ended by server")]
    Ended,
}

impl From<TransportError> for ChannelError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Unsupported(reason) => ChannelError::UnsupportedTransport(reason),
            other => ChannelError::TransportFailure(other.to_string()),
        }
    }
}

/// Errors from loading a [`ChannelConfig`](crate::config::ChannelConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
