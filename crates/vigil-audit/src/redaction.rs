// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Sensitive-field redaction.
//!
//! Credential fields must never reach the log store, encrypted or not.
//! Redaction runs at the encode choke point, so every persisted record has
//! it applied regardless of which producer built the event.

use serde_json::{Map, Value};

/// The fixed placeholder written in place of a sensitive value.
pub const REDACTED_PLACEHOLDER: &str = "[PROTECTED]";

/// Field names whose values are always redacted.
const SENSITIVE_FIELDS: &[&str] = &["password", "password2", "pass"];

/// Returns true if a field with this exact name must be redacted.
pub fn is_sensitive_field(name: &str) -> bool {
	SENSITIVE_FIELDS.contains(&name)
}

/// Recursively redacts sensitive fields in a JSON value, at any nesting
/// depth, including inside arrays.
pub fn redact_value(value: &mut Value) {
	match value {
		Value::Object(map) => redact_map(map),
		Value::Array(items) => {
			for item in items.iter_mut() {
				redact_value(item);
			}
		}
		_ => {}
	}
}

/// Recursively redacts sensitive fields in an object map.
pub fn redact_map(map: &mut Map<String, Value>) {
	for (key, value) in map.iter_mut() {
		if is_sensitive_field(key) {
			*value = Value::String(REDACTED_PLACEHOLDER.to_string());
		} else {
			redact_value(value);
		}
	}
}
