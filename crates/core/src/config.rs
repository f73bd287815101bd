// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel configuration
//!
//! Loaded from TOML or built in code:
//!
//! ```toml
//! endpoint_path = "/notification/stream"
//! timeout = "30s"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default stream endpoint, relative to the api root
pub const DEFAULT_ENDPOINT_PATH: &str = "/notification/stream";

/// Configuration for a [`Channel`](crate::channel::Channel)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    endpoint_path: String,
    /// Idle timeout requested from the server
    #[serde(with = "humantime_serde")]
    timeout: Option<Duration>,
}

impl ChannelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint_path(mut self, path: impl Into<String>) -> Self {
        self.endpoint_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_timeout_secs(self, secs: u64) -> Self {
        self.with_timeout(Duration::from_secs(secs))
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn endpoint_path(&self) -> &str {
        &self.endpoint_path
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Timeout in whole seconds, or `None` when no timeout should be requested.
    ///
    /// Zero (including sub-second durations) counts as unset.
    pub fn timeout_secs(&self) -> Option<u64> {
        self.timeout.map(|t| t.as_secs()).filter(|secs| *secs > 0)
    }

    /// Build the stream URL: `<api_root><endpoint_path>[?timeout=N]`
    pub fn stream_url(&self, api_root: &str) -> String {
        let mut url = format!("{}{}", api_root, self.endpoint_path);
        if let Some(secs) = self.timeout_secs() {
            let separator = if self.endpoint_path.contains('?') {
                '&'
            } else {
                '?'
            };
            url.push(separator);
            url.push_str(&format!("timeout={}", secs));
        }
        url
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            timeout: None,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
