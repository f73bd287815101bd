// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event envelopes decoded from stream frames

use crate::events::event_key;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A decoded frame: a JSON object with a string `type` discriminator.
///
/// The full object, `type` included, is kept as the body so subscribers see
/// exactly what the server sent.
#[derive(Debug, Clone, PartialEq)]
pub struct EventEnvelope {
    event_type: String,
    body: Map<String, Value>,
}

impl EventEnvelope {
    /// Build an envelope from a decoded object, if it carries a string `type`
    pub fn from_object(body: Map<String, Value>) -> Option<Self> {
        let event_type = body.get("type")?.as_str()?.to_string();
        Some(Self { event_type, body })
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Registry key this envelope is dispatched under
    pub fn key(&self) -> String {
        event_key(&self.event_type)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.body.get(field)
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.body.clone())
    }

    /// Deserialize the envelope into a typed payload
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&Value::Object(self.body.clone()))
    }
}

impl Serialize for EventEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

/// Outcome of decoding one frame payload
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeResult {
    Envelope(EventEnvelope),
    Malformed { raw: String, reason: String },
}

impl DecodeResult {
    pub fn is_envelope(&self) -> bool {
        matches!(self, DecodeResult::Envelope(_))
    }
}

/// Decode a frame payload into an envelope.
///
/// Never fails loudly: anything that is not a JSON object with a string
/// `type` field comes back as [`DecodeResult::Malformed`] carrying the raw text.
pub fn decode(raw: &str) -> DecodeResult {
    let malformed = |reason: String| DecodeResult::Malformed {
        raw: raw.to_string(),
        reason,
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(body)) => match EventEnvelope::from_object(body) {
            Some(envelope) => DecodeResult::Envelope(envelope),
            None => malformed("missing string `type` field".to_string()),
        },
        Ok(other) => malformed(format!("expected JSON object, got {}", json_kind(&other))),
        Err(e) => malformed(e.to_string()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
