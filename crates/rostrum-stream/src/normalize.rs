// SPDX-FileCopyrightText: 2026 Rostrum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consumer-facing payload normalization.
//!
//! Upstream event payloads carry a free-form `output` field that is
//! usually structured data serialized as text, sometimes a text blob
//! with an embedded structured fragment, and sometimes plain prose.
//! Three fallback tiers guarantee every event reaches downstream
//! readers as structured data: direct parse, first brace-delimited
//! block, then a `{"text": ...}` wrap. Never fatal.

use serde_json::{Value, json};

/// Normalize one raw event payload.
///
/// The payload itself is expected to be a JSON object; its `output`
/// field, when present as a string, is rewritten through
/// [`normalize_output`]. A payload that is not JSON at all is treated
/// as a bare output value.
pub fn normalize_payload(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(mut map)) => {
            if let Some(Value::String(output)) = map.get("output") {
                let structured = normalize_output(&output.clone());
                map.insert("output".to_string(), structured);
            }
            Value::Object(map)
        }
        Ok(other) => other,
        Err(_) => normalize_output(raw),
    }
}

/// Three-tier recovery of structured data from free-form output text.
pub fn normalize_output(output: &str) -> Value {
    if let Ok(value) = serde_json::from_str::<Value>(output) {
        return value;
    }
    if let (Some(start), Some(end)) = (output.find('{'), output.rfind('}')) {
        if end > start {
            if let Ok(value) = serde_json::from_str::<Value>(&output[start..=end]) {
                return value;
            }
        }
    }
    json!({ "text": output })
}
